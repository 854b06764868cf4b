//! codecs/snappy.rs
//! Raw snappy block codec over `snap::raw`.
//!
//! Each call encodes or decodes exactly one independent block. The container
//! formats own framing, checksums and chunk sizing.
use snap::raw::{Decoder, Encoder};

use crate::compression::types::{CompressionError, Compressor, Decompressor};

const CODEC: &str = "snappy";

/// Worst-case compressed size of `input_len` bytes; 0 when the block is too large
/// to be represented at all.
#[inline]
pub fn max_compressed_len(input_len: usize) -> usize {
    snap::raw::max_compress_len(input_len)
}

fn process_failed(e: snap::Error) -> CompressionError {
    CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() }
}

pub struct SnappyCompressor {
    encoder: Encoder,
}

impl SnappyCompressor {
    pub fn new() -> Self {
        Self { encoder: Encoder::new() }
    }
}

impl Default for SnappyCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for SnappyCompressor {
    fn compress_block(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let bound = max_compressed_len(input.len());
        if bound == 0 {
            return Err(CompressionError::BlockTooLarge {
                have: input.len(),
                max: u32::MAX as usize,
            });
        }

        out.clear();
        if input.is_empty() {
            // Varint length 0, no elements.
            out.push(0);
            return Ok(());
        }
        out.resize(bound, 0);
        let written = self.encoder.compress(input, out).map_err(process_failed)?;
        out.truncate(written);
        Ok(())
    }
}

pub struct SnappyDecompressor {
    decoder: Decoder,
}

impl SnappyDecompressor {
    pub fn new() -> Self {
        Self { decoder: Decoder::new() }
    }
}

impl Default for SnappyDecompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Decompressor for SnappyDecompressor {
    fn decompressed_len(&self, input: &[u8]) -> Result<usize, CompressionError> {
        snap::raw::decompress_len(input).map_err(process_failed)
    }

    fn decompress_block(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let len = self.decompressed_len(input)?;
        out.clear();
        out.resize(len, 0);
        let written = self.decoder.decompress(input, out).map_err(process_failed)?;
        out.truncate(written);
        Ok(())
    }
}
