use std::io::Read;

use log::{debug, trace};

use crate::compression::{create_compressor, Compressor};
use crate::constants::framing::{
    CHECKSUM_LEN, MAX_UNCOMPRESSED_CHUNK_LEN, MIN_SAVING_DIVISOR, STREAM_IDENTIFIER,
};
use crate::container::framing::types::{ChunkHeader, ChunkType};
use crate::container::io::read_full;
use crate::types::StreamError;
use crate::utils::masked_crc32c;

/// Assemble one chunk: header, optional checksum, body.
pub fn frame_chunk(chunk_type: u8, checksum: Option<u32>, body: &[u8]) -> Vec<u8> {
    let checksum_len = if checksum.is_some() { CHECKSUM_LEN } else { 0 };
    let payload_len = checksum_len + body.len();

    let mut chunk = Vec::with_capacity(ChunkHeader::LEN + payload_len);
    chunk.extend_from_slice(&ChunkHeader::encode(chunk_type, payload_len));
    if let Some(crc) = checksum {
        chunk.extend_from_slice(&crc.to_le_bytes());
    }
    chunk.extend_from_slice(body);
    chunk
}

/// Encode up to 64 KiB of input as one data chunk.
///
/// Falls back to an uncompressed chunk when compression saves less than 1/8.
/// `scratch` is reused across calls to hold the compressed block.
pub fn encode_chunk(
    compressor: &mut dyn Compressor,
    data: &[u8],
    scratch: &mut Vec<u8>,
) -> Result<Vec<u8>, StreamError> {
    debug_assert!(data.len() <= MAX_UNCOMPRESSED_CHUNK_LEN);

    let checksum = masked_crc32c(data);
    compressor.compress_block(data, scratch)?;

    let worthwhile = scratch.len() < data.len() - data.len() / MIN_SAVING_DIVISOR;
    let chunk = if worthwhile {
        frame_chunk(ChunkType::Compressed as u8, Some(checksum), scratch)
    } else {
        frame_chunk(ChunkType::Uncompressed as u8, Some(checksum), data)
    };
    Ok(chunk)
}

/// Pull-based framing encoder.
///
/// Yields the stream identifier first, then one chunk per `chunk_size` bytes of
/// input. Empty input yields only the identifier.
pub struct FramingEncoder<R> {
    source: R,
    compressor: Box<dyn Compressor>,
    input: Vec<u8>,
    scratch: Vec<u8>,
    wrote_identifier: bool,
    done: bool,
}

impl<R: Read> FramingEncoder<R> {
    pub fn new(source: R, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.clamp(1, MAX_UNCOMPRESSED_CHUNK_LEN);
        Self {
            source,
            compressor: create_compressor(),
            input: vec![0u8; chunk_size],
            scratch: Vec::new(),
            wrote_identifier: false,
            done: false,
        }
    }

    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        let n = read_full(&mut self.source, &mut self.input)?;
        if n == 0 {
            return Ok(None);
        }
        let chunk = encode_chunk(self.compressor.as_mut(), &self.input[..n], &mut self.scratch)?;
        trace!("framing: encoded {} bytes into {} byte chunk", n, chunk.len());
        Ok(Some(chunk))
    }
}

impl<R: Read> Iterator for FramingEncoder<R> {
    type Item = Result<Vec<u8>, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.wrote_identifier {
            self.wrote_identifier = true;
            return Some(Ok(STREAM_IDENTIFIER.to_vec()));
        }

        match self.next_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                debug!("framing: encoder reached end of input");
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
