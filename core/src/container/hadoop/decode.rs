use std::io::Read;

use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace};

use crate::compression::codecs::max_compressed_len;
use crate::compression::{create_decompressor, CompressionError, Decompressor};
use crate::constants::hadoop::{LENGTH_FIELD_LEN, MAX_BLOCK_LEN};
use crate::container::io::ChunkReader;
use crate::container::FormatName;
use crate::types::StreamError;

const FORMAT: FormatName = FormatName::HadoopSnappy;

/// Decoder position. `remaining` counts uncompressed bytes still owed by the
/// current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    AwaitingBlockHeader,
    AwaitingSubBlockHeader { remaining: usize },
    AwaitingSubBlockPayload { remaining: usize, len: usize, start: u64 },
    Done,
    Failed,
}

/// Pull-based Hadoop decoder yielding one output buffer per sub-block.
pub struct HadoopDecoder<R> {
    reader: ChunkReader<R>,
    decompressor: Box<dyn Decompressor>,
    state: BlockState,
    payload: Vec<u8>,
}

impl<R: Read> HadoopDecoder<R> {
    pub fn new(source: R, offset: u64) -> Self {
        Self {
            reader: ChunkReader::new(source, FORMAT, offset),
            decompressor: create_decompressor(),
            state: BlockState::AwaitingBlockHeader,
            payload: Vec::new(),
        }
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    fn read_length(&mut self, start: u64, allow_eof: bool) -> Result<Option<usize>, StreamError> {
        let mut buf = [0u8; LENGTH_FIELD_LEN];
        if !self.reader.read_exact_at(&mut buf, start, allow_eof)? {
            return Ok(None);
        }
        Ok(Some(BigEndian::read_u32(&buf) as usize))
    }

    fn advance(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        match self.state {
            BlockState::AwaitingBlockHeader => {
                let start = self.reader.offset();
                let Some(block_len) = self.read_length(start, true)? else {
                    debug!("hadoop_snappy: clean end of stream at offset {}", start);
                    self.state = BlockState::Done;
                    return Ok(None);
                };
                if block_len > MAX_BLOCK_LEN {
                    return Err(corrupt(start, format!(
                        "block length {} exceeds limit {}", block_len, MAX_BLOCK_LEN
                    )));
                }
                if block_len > 0 {
                    self.state = BlockState::AwaitingSubBlockHeader { remaining: block_len };
                }
                Ok(None)
            }
            BlockState::AwaitingSubBlockHeader { remaining } => {
                let start = self.reader.offset();
                // allow_eof is off, so a missing length is already TruncatedStream.
                let len = self.read_length(start, false)?.unwrap_or(0);
                let bound = max_compressed_len(remaining);
                if len == 0 || len > bound {
                    return Err(corrupt(start, format!(
                        "sub-block length {} outside 1..={} for {} remaining bytes", len, bound, remaining
                    )));
                }
                self.state = BlockState::AwaitingSubBlockPayload { remaining, len, start };
                Ok(None)
            }
            BlockState::AwaitingSubBlockPayload { remaining, len, start } => {
                self.payload.clear();
                self.payload.resize(len, 0);
                self.reader.read_exact_at(&mut self.payload, start, false)?;

                let decoded_len = self.decompressor
                    .decompressed_len(&self.payload)
                    .map_err(|e| uncompress(start, e))?;
                if decoded_len > remaining {
                    return Err(corrupt(start, format!(
                        "sub-block decodes to {} bytes but block has {} left", decoded_len, remaining
                    )));
                }

                let mut out = Vec::with_capacity(decoded_len);
                self.decompressor
                    .decompress_block(&self.payload, &mut out)
                    .map_err(|e| uncompress(start, e))?;

                let remaining = remaining - out.len();
                self.state = if remaining == 0 {
                    BlockState::AwaitingBlockHeader
                } else {
                    BlockState::AwaitingSubBlockHeader { remaining }
                };
                trace!("hadoop_snappy: sub-block at offset {} -> {} bytes", start, out.len());
                Ok(if out.is_empty() { None } else { Some(out) })
            }
            BlockState::Done | BlockState::Failed => Ok(None),
        }
    }
}

impl<R: Read> Iterator for HadoopDecoder<R> {
    type Item = Result<Vec<u8>, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if matches!(self.state, BlockState::Done | BlockState::Failed) {
                return None;
            }
            match self.advance() {
                Ok(Some(out)) => return Some(Ok(out)),
                Ok(None) => continue,
                Err(e) => {
                    self.state = BlockState::Failed;
                    return Some(Err(e));
                }
            }
        }
    }
}

fn corrupt(offset: u64, reason: impl Into<String>) -> StreamError {
    StreamError::CorruptChunk { format: FORMAT, offset, reason: reason.into() }
}

fn uncompress(offset: u64, source: CompressionError) -> StreamError {
    StreamError::Uncompress { format: FORMAT, offset, source }
}
