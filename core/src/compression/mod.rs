//! compression/mod.rs
//! Codec primitive used by every container format.
//!
//! Notes:
//! - One block in, one block out. No framing, checksums or I/O live here.
//! - Container formats hold the codec as a trait object so the framing code
//!   never names the concrete codec.

pub mod types;
pub mod codecs;

pub use types::*;

use crate::compression::codecs::{SnappyCompressor, SnappyDecompressor};

pub fn create_compressor() -> Box<dyn Compressor> {
    Box::new(SnappyCompressor::new())
}

pub fn create_decompressor() -> Box<dyn Decompressor> {
    Box::new(SnappyDecompressor::new())
}
