use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace};

use crate::compression::{create_decompressor, CompressionError, Decompressor};
use crate::constants::framing::{
    CHECKSUM_LEN, MAX_UNCOMPRESSED_CHUNK_LEN, STREAM_IDENTIFIER, STREAM_IDENTIFIER_BODY,
};
use crate::container::framing::types::{
    max_compressed_payload_len, max_uncompressed_payload_len, ChunkHeader, ChunkKind, ChunkType,
};
use crate::container::io::ChunkReader;
use crate::container::FormatName;
use crate::types::StreamError;
use crate::utils::masked_crc32c;

const FORMAT: FormatName = FormatName::Framing;

/// Decoder position within the framing stream.
///
/// `Done` is only reached on a clean end of stream at a chunk boundary;
/// every error moves to `Failed`, and both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    AwaitingHeader,
    AwaitingChunkHeader,
    AwaitingChunkPayload { header: ChunkHeader, start: u64 },
    Done,
    Failed,
}

/// Pull-based framing decoder yielding one output buffer per data chunk.
pub struct FramingDecoder<R> {
    reader: ChunkReader<R>,
    decompressor: Box<dyn Decompressor>,
    state: DecodeState,
    payload: Vec<u8>,
}

impl<R: Read> FramingDecoder<R> {
    /// `offset` is the stream position of `source`'s first byte. When
    /// `identifier_validated` is false the decoder reads and checks the stream
    /// identifier itself.
    pub fn new(source: R, offset: u64, identifier_validated: bool) -> Self {
        let state = if identifier_validated {
            DecodeState::AwaitingChunkHeader
        } else {
            DecodeState::AwaitingHeader
        };
        Self {
            reader: ChunkReader::new(source, FORMAT, offset),
            decompressor: create_decompressor(),
            state,
            payload: Vec::new(),
        }
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Run one state transition. Returns decoded bytes when a data chunk completes.
    fn advance(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        match self.state {
            DecodeState::AwaitingHeader => {
                self.read_identifier()?;
                self.state = DecodeState::AwaitingChunkHeader;
                Ok(None)
            }
            DecodeState::AwaitingChunkHeader => {
                let start = self.reader.offset();
                let mut buf = [0u8; ChunkHeader::LEN];
                if !self.reader.read_exact_at(&mut buf, start, true)? {
                    debug!("framing: clean end of stream at offset {}", start);
                    self.state = DecodeState::Done;
                    return Ok(None);
                }
                let header = ChunkHeader::parse(&buf);
                validate_header(&header, start)?;
                self.state = DecodeState::AwaitingChunkPayload { header, start };
                Ok(None)
            }
            DecodeState::AwaitingChunkPayload { header, start } => {
                let out = self.read_payload(header, start)?;
                self.state = DecodeState::AwaitingChunkHeader;
                Ok(out)
            }
            DecodeState::Done | DecodeState::Failed => Ok(None),
        }
    }

    fn read_identifier(&mut self) -> Result<(), StreamError> {
        let start = self.reader.offset();
        let mut buf = [0u8; STREAM_IDENTIFIER.len()];
        let complete = self.reader.read_exact_at(&mut buf, start, true)?;
        if !complete || buf != STREAM_IDENTIFIER {
            let consumed = if complete { buf.to_vec() } else { Vec::new() };
            return Err(StreamError::UnrecognizedFormat { expected: Some(FORMAT), consumed });
        }
        Ok(())
    }

    fn read_payload(&mut self, header: ChunkHeader, start: u64) -> Result<Option<Vec<u8>>, StreamError> {
        match header.kind {
            ChunkKind::Known(ChunkType::Padding) | ChunkKind::ReservedSkippable(_) => {
                trace!("framing: skipping {:?} chunk of {} bytes at offset {}", header.kind, header.len, start);
                self.reader.skip(header.len, start)?;
                Ok(None)
            }
            ChunkKind::Known(ChunkType::StreamIdentifier) => {
                let mut body = [0u8; STREAM_IDENTIFIER_BODY.len()];
                self.reader.read_exact_at(&mut body, start, false)?;
                if body != STREAM_IDENTIFIER_BODY {
                    return Err(corrupt(start, "stream identifier body mismatch"));
                }
                Ok(None)
            }
            ChunkKind::Known(ChunkType::Compressed) => {
                self.fill_payload(header.len, start)?;
                let expected = LittleEndian::read_u32(&self.payload[..CHECKSUM_LEN]);
                let block = &self.payload[CHECKSUM_LEN..];

                let len = self.decompressor.decompressed_len(block).map_err(|e| uncompress(start, e))?;
                if len > MAX_UNCOMPRESSED_CHUNK_LEN {
                    return Err(corrupt(start, format!(
                        "decoded length {} exceeds chunk limit {}", len, MAX_UNCOMPRESSED_CHUNK_LEN
                    )));
                }

                let mut out = Vec::with_capacity(len);
                self.decompressor.decompress_block(block, &mut out).map_err(|e| uncompress(start, e))?;
                verify_checksum(expected, &out, start)?;
                trace!("framing: compressed chunk at offset {} -> {} bytes", start, out.len());
                Ok(non_empty(out))
            }
            ChunkKind::Known(ChunkType::Uncompressed) => {
                self.fill_payload(header.len, start)?;
                let expected = LittleEndian::read_u32(&self.payload[..CHECKSUM_LEN]);
                let data = &self.payload[CHECKSUM_LEN..];
                verify_checksum(expected, data, start)?;
                trace!("framing: uncompressed chunk at offset {} -> {} bytes", start, data.len());
                Ok(non_empty(data.to_vec()))
            }
            // Rejected by validate_header before the payload is read.
            ChunkKind::ReservedUnskippable(raw) => Err(corrupt(start, format!(
                "reserved unskippable chunk type 0x{:02x}", raw
            ))),
        }
    }

    fn fill_payload(&mut self, len: usize, start: u64) -> Result<(), StreamError> {
        self.payload.clear();
        self.payload.resize(len, 0);
        self.reader.read_exact_at(&mut self.payload, start, false)?;
        Ok(())
    }
}

impl<R: Read> Iterator for FramingDecoder<R> {
    type Item = Result<Vec<u8>, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if matches!(self.state, DecodeState::Done | DecodeState::Failed) {
                return None;
            }
            match self.advance() {
                Ok(Some(out)) => return Some(Ok(out)),
                Ok(None) => continue,
                Err(e) => {
                    self.state = DecodeState::Failed;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Reject lengths that violate the chunk type's bounds before reading the payload.
fn validate_header(header: &ChunkHeader, start: u64) -> Result<(), StreamError> {
    let (min, max) = match header.kind {
        ChunkKind::Known(ChunkType::Compressed) => (CHECKSUM_LEN, max_compressed_payload_len()),
        ChunkKind::Known(ChunkType::Uncompressed) => (CHECKSUM_LEN, max_uncompressed_payload_len()),
        ChunkKind::Known(ChunkType::StreamIdentifier) => {
            (STREAM_IDENTIFIER_BODY.len(), STREAM_IDENTIFIER_BODY.len())
        }
        ChunkKind::Known(ChunkType::Padding) | ChunkKind::ReservedSkippable(_) => return Ok(()),
        ChunkKind::ReservedUnskippable(raw) => {
            return Err(corrupt(start, format!("reserved unskippable chunk type 0x{:02x}", raw)));
        }
    };

    if header.len < min || header.len > max {
        return Err(corrupt(start, format!(
            "{:?} chunk length {} outside {}..={}", header.kind, header.len, min, max
        )));
    }
    Ok(())
}

fn verify_checksum(expected: u32, data: &[u8], start: u64) -> Result<(), StreamError> {
    let actual = masked_crc32c(data);
    if expected != actual {
        return Err(corrupt(start, format!(
            "checksum mismatch: stored {:08x}, computed {:08x}", expected, actual
        )));
    }
    Ok(())
}

fn corrupt(offset: u64, reason: impl Into<String>) -> StreamError {
    StreamError::CorruptChunk { format: FORMAT, offset, reason: reason.into() }
}

fn uncompress(offset: u64, source: CompressionError) -> StreamError {
    StreamError::Uncompress { format: FORMAT, offset, source }
}

fn non_empty(out: Vec<u8>) -> Option<Vec<u8>> {
    if out.is_empty() { None } else { Some(out) }
}
