use byteorder::{ByteOrder, LittleEndian};
use num_enum::TryFromPrimitive;

use crate::compression::codecs::max_compressed_len;
use crate::constants::framing::{
    CHECKSUM_LEN, CHUNK_HEADER_LEN, MAX_CHUNK_PAYLOAD_LEN, MAX_UNCOMPRESSED_CHUNK_LEN,
};

/// Chunk types with a defined meaning.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum ChunkType {
    Compressed       = 0x00,
    Uncompressed     = 0x01,
    Padding          = 0xfe,
    StreamIdentifier = 0xff,
}

/// Classification of any chunk type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Known(ChunkType),
    /// `0x80..=0xfd`: must be skipped by decoders.
    ReservedSkippable(u8),
    /// `0x02..=0x7f`: decoders must reject the stream.
    ReservedUnskippable(u8),
}

impl ChunkKind {
    pub fn from_byte(raw: u8) -> Self {
        match ChunkType::try_from_primitive(raw) {
            Ok(t) => ChunkKind::Known(t),
            Err(_) if raw >= 0x80 => ChunkKind::ReservedSkippable(raw),
            Err(_) => ChunkKind::ReservedUnskippable(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub kind: ChunkKind,
    /// Payload length following the 4-byte header.
    pub len: usize,
}

impl ChunkHeader {
    pub const LEN: usize = CHUNK_HEADER_LEN;

    pub fn parse(buf: &[u8; CHUNK_HEADER_LEN]) -> Self {
        Self {
            kind: ChunkKind::from_byte(buf[0]),
            len: LittleEndian::read_u24(&buf[1..]) as usize,
        }
    }

    pub fn encode(chunk_type: u8, len: usize) -> [u8; CHUNK_HEADER_LEN] {
        debug_assert!(len <= MAX_CHUNK_PAYLOAD_LEN);
        let mut buf = [0u8; CHUNK_HEADER_LEN];
        buf[0] = chunk_type;
        LittleEndian::write_u24(&mut buf[1..], len as u32);
        buf
    }
}

/// Largest payload a compressed data chunk may declare.
pub fn max_compressed_payload_len() -> usize {
    CHECKSUM_LEN + max_compressed_len(MAX_UNCOMPRESSED_CHUNK_LEN)
}

/// Largest payload an uncompressed data chunk may declare.
pub const fn max_uncompressed_payload_len() -> usize {
    CHECKSUM_LEN + MAX_UNCOMPRESSED_CHUNK_LEN
}
