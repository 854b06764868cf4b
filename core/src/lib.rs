//! snappy-core
//!
//! Container framing, format sniffing and streaming transform pipeline for the
//! snappy block codec. No CLI, no file handling.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

pub mod compression;
pub mod container;
pub mod telemetry;

// Stream driver
pub mod pipeline;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::container::{
        registry, sniff, sniff_as, ContainerFormat, Direction, FormatName, FormatSelector, SniffResult,
    };
    pub use crate::pipeline::{run, run_with, PipelineConfig};
    pub use crate::telemetry::RunStats;
    pub use crate::types::StreamError;
}
