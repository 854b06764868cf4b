//! Hadoop snappy block format.
//!
//! Layout, repeated until end of stream:
//! - `block_len: u32 BE` (uncompressed bytes in this block)
//! - one or more sub-blocks `compressed_len: u32 BE | raw snappy block`, whose
//!   decoded lengths add up to `block_len`.
//!
//! There is no stream signature and no checksum; sniffing relies on the first
//! block header being structurally plausible.

pub mod encode;
pub mod decode;

pub use encode::{encode_block, HadoopEncoder};
pub use decode::{BlockState, HadoopDecoder};

use byteorder::{BigEndian, ByteOrder};

use crate::compression::codecs::max_compressed_len;
use crate::constants::hadoop::{HEADER_LEN, LENGTH_FIELD_LEN, MAX_BLOCK_LEN};

fn block_len_plausible(block_len: usize) -> bool {
    (1..=MAX_BLOCK_LEN).contains(&block_len)
}

fn sub_block_len_plausible(block_len: usize, compressed_len: usize) -> bool {
    (1..=max_compressed_len(block_len)).contains(&compressed_len)
}

/// Block length in `1..=64 MiB` followed by a sub-block length that a block of
/// that size could compress to.
pub fn matches_header(prefix: &[u8]) -> bool {
    if prefix.len() < HEADER_LEN {
        return false;
    }
    let block_len = BigEndian::read_u32(&prefix[..LENGTH_FIELD_LEN]) as usize;
    let compressed_len = BigEndian::read_u32(&prefix[LENGTH_FIELD_LEN..HEADER_LEN]) as usize;
    block_len_plausible(block_len) && sub_block_len_plausible(block_len, compressed_len)
}

/// Looser check used when the caller names this format: a zero-length block
/// is valid (the decoder skips it), so the first length only has to be in
/// range. The bytes after a zero-length block are the next block header and
/// are left to the decoder.
pub fn matches_forced_header(prefix: &[u8]) -> bool {
    if prefix.len() < HEADER_LEN {
        return false;
    }
    match BigEndian::read_u32(&prefix[..LENGTH_FIELD_LEN]) as usize {
        0 => true,
        _ => matches_header(prefix),
    }
}

/// Any prefix too short to hold a block length is consistent; a complete block
/// length must be in `0..=64 MiB`.
pub fn matches_partial_header(prefix: &[u8]) -> bool {
    if prefix.len() >= HEADER_LEN {
        return matches_forced_header(prefix);
    }
    if prefix.len() < LENGTH_FIELD_LEN {
        return true;
    }
    BigEndian::read_u32(&prefix[..LENGTH_FIELD_LEN]) as usize <= MAX_BLOCK_LEN
}
