//! Snappy framing format (the default container).
//!
//! Layout:
//! - Stream identifier chunk `ff 06 00 00 "sNaPpY"`, written once.
//! - Chunks of `type:u8 | len:u24 LE | payload`.
//! - Data chunks carry a masked CRC-32C of the uncompressed bytes ahead of the
//!   (possibly compressed) body and hold at most 64 KiB of uncompressed data.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{ChunkHeader, ChunkKind, ChunkType};
pub use encode::{encode_chunk, frame_chunk, FramingEncoder};
pub use decode::{DecodeState, FramingDecoder};

use crate::constants::framing::STREAM_IDENTIFIER;

/// True when `prefix` starts with the full stream identifier.
pub fn matches_header(prefix: &[u8]) -> bool {
    prefix.starts_with(&STREAM_IDENTIFIER)
}

/// True when `prefix` is consistent with a stream identifier, even if short.
pub fn matches_partial_header(prefix: &[u8]) -> bool {
    STREAM_IDENTIFIER.starts_with(prefix) || matches_header(prefix)
}
