//! Wire constants for every registered container format.
//!
//! These values are fixed by the on-wire layouts and must match streams
//! produced by other snappy implementations bit for bit.

/// Snappy framing format.
pub mod framing {
    /// Stream identifier chunk: type `0xff`, length 6, body `sNaPpY`.
    pub const STREAM_IDENTIFIER: [u8; 10] = [
        0xff, 0x06, 0x00, 0x00,
        b's', b'N', b'a', b'P', b'p', b'Y',
    ];
    pub const STREAM_IDENTIFIER_BODY: [u8; 6] = *b"sNaPpY";

    /// Type byte + 24-bit little-endian payload length.
    pub const CHUNK_HEADER_LEN: usize = 4;
    pub const CHECKSUM_LEN: usize = 4;

    /// Uncompressed bytes allowed in one data chunk.
    pub const MAX_UNCOMPRESSED_CHUNK_LEN: usize = 65_536;
    /// Largest payload a 24-bit length field can describe.
    pub const MAX_CHUNK_PAYLOAD_LEN: usize = (1 << 24) - 1;

    pub const CRC_MASK_DELTA: u32 = 0xa282_ead8;

    /// A chunk is stored uncompressed unless compression saves at least 1/8.
    pub const MIN_SAVING_DIVISOR: usize = 8;
}

/// Hadoop snappy block format.
pub mod hadoop {
    /// Every length field is a big-endian u32.
    pub const LENGTH_FIELD_LEN: usize = 4;
    /// Block length + first sub-block length.
    pub const HEADER_LEN: usize = 2 * LENGTH_FIELD_LEN;

    /// Hadoop's `io.compression.codec.snappy.buffersize` default.
    pub const DEFAULT_BLOCK_SIZE: usize = 256 * 1024;
    /// Largest declared block length accepted when decoding.
    pub const MAX_BLOCK_LEN: usize = 64 * 1024 * 1024;
}
