//! Container formats, registry and sniffer.
//!
//! Responsibilities:
//! - Frame raw codec blocks into each format's on-wire layout
//! - Decode frames with strict validation, one chunk at a time
//! - Map names to formats and identify formats from leading bytes
//!
//! Non-responsibilities:
//! - The block codec itself
//! - Opening files or standard streams
//! - Driving a whole run (see `pipeline`)

pub mod types;
pub mod registry;
pub mod sniff;
pub mod framing;
pub mod hadoop;
pub mod io;

pub use types::{ChunkStream, ContainerFormat, Direction, FormatName, FormatSelector};
pub use registry::{all_names, default_name, resolve, resolve_name, resolve_selector};
pub use sniff::{classify, sniff, sniff_as, SniffResult};
