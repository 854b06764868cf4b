//! compression/types.rs
//! Codec primitive seam: one-shot block compress/decompress, no framing, no I/O.
use std::fmt;

#[derive(Debug)]
pub enum CompressionError {
    /// The codec rejected its input (corrupt block, bad varint, ...).
    CodecProcessFailed { codec: &'static str, msg: String },
    /// Input exceeds what the codec can represent in a single block.
    BlockTooLarge { have: usize, max: usize },
}

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CompressionError::*;
        match self {
            CodecProcessFailed { codec, msg } =>
                write!(f, "codec {} process failed: {}", codec, msg),
            BlockTooLarge { have, max } =>
                write!(f, "block too large: {} > {}", have, max),
        }
    }
}

impl std::error::Error for CompressionError {}

pub trait Compressor {
    /// Compress a single block into `out`, replacing its contents.
    fn compress_block(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
}

pub trait Decompressor {
    /// Decoded length announced by a compressed block, without decoding it.
    fn decompressed_len(&self, input: &[u8]) -> Result<usize, CompressionError>;

    /// Decompress a single block into `out`, replacing its contents.
    fn decompress_block(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
}
