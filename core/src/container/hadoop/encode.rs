use std::io::Read;

use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace};

use crate::compression::{create_compressor, Compressor};
use crate::constants::hadoop::{HEADER_LEN, LENGTH_FIELD_LEN, MAX_BLOCK_LEN};
use crate::container::io::read_full;
use crate::types::StreamError;

/// Encode one block as a single sub-block.
pub fn encode_block(
    compressor: &mut dyn Compressor,
    data: &[u8],
    scratch: &mut Vec<u8>,
) -> Result<Vec<u8>, StreamError> {
    debug_assert!(data.len() <= MAX_BLOCK_LEN);
    compressor.compress_block(data, scratch)?;

    let mut block = vec![0u8; HEADER_LEN];
    BigEndian::write_u32(&mut block[..LENGTH_FIELD_LEN], data.len() as u32);
    BigEndian::write_u32(&mut block[LENGTH_FIELD_LEN..], scratch.len() as u32);
    block.extend_from_slice(scratch);
    Ok(block)
}

/// Pull-based Hadoop encoder: one block per `block_size` bytes of input, and
/// nothing at all for empty input.
pub struct HadoopEncoder<R> {
    source: R,
    compressor: Box<dyn Compressor>,
    input: Vec<u8>,
    scratch: Vec<u8>,
    done: bool,
}

impl<R: Read> HadoopEncoder<R> {
    pub fn new(source: R, block_size: usize) -> Self {
        let block_size = block_size.clamp(1, MAX_BLOCK_LEN);
        Self {
            source,
            compressor: create_compressor(),
            input: vec![0u8; block_size],
            scratch: Vec::new(),
            done: false,
        }
    }
}

impl<R: Read> Iterator for HadoopEncoder<R> {
    type Item = Result<Vec<u8>, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let n = match read_full(&mut self.source, &mut self.input) {
            Ok(n) => n,
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        };
        if n == 0 {
            debug!("hadoop_snappy: encoder reached end of input");
            self.done = true;
            return None;
        }

        let block = encode_block(self.compressor.as_mut(), &self.input[..n], &mut self.scratch);
        match &block {
            Ok(bytes) => trace!("hadoop_snappy: encoded {} bytes into {} byte block", n, bytes.len()),
            Err(_) => self.done = true,
        }
        Some(block)
    }
}
