//! telemetry/mod.rs
//! Counters collected while a pipeline run streams chunks.
//!
//! Notes:
//! - Counters are plain integers owned by the run; nothing is shared.
//! - Serializable so the CLI can report them as JSON.

pub mod counters;

pub use counters::*;
