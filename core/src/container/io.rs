//! Blocking read helpers shared by the sniffer and the container decoders.

use std::io::{self, ErrorKind, Read};

use crate::container::FormatName;
use crate::types::StreamError;

/// Fill `buf` from `r`, stopping early only at end of stream.
///
/// Returns the number of bytes read. `Interrupted` is retried; any other error
/// is returned as is.
pub fn read_full<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Reader wrapper that tracks the absolute offset within a container stream
/// and turns short reads into `TruncatedStream`.
pub struct ChunkReader<R> {
    inner: R,
    format: FormatName,
    offset: u64,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R, format: FormatName, offset: u64) -> Self {
        Self { inner, format, offset }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read exactly `buf.len()` bytes of the chunk starting at `chunk_start`.
    ///
    /// Returns `Ok(false)` if the stream ended cleanly before the first byte and
    /// `allow_eof` is set; any other short read is `TruncatedStream`.
    pub fn read_exact_at(
        &mut self,
        buf: &mut [u8],
        chunk_start: u64,
        allow_eof: bool,
    ) -> Result<bool, StreamError> {
        let needed = buf.len();
        let result = read_full(&mut self.inner, buf);
        let got = result.map_err(|e| self.map_io(e, chunk_start, needed))?;
        self.offset += got as u64;

        if got == buf.len() {
            return Ok(true);
        }
        if got == 0 && allow_eof {
            return Ok(false);
        }
        Err(StreamError::TruncatedStream {
            format: self.format,
            offset: chunk_start,
            needed: buf.len(),
            got,
        })
    }

    /// Discard `len` bytes without buffering them whole.
    pub fn skip(&mut self, len: usize, chunk_start: u64) -> Result<(), StreamError> {
        let result = {
            let mut limited = (&mut self.inner).take(len as u64);
            io::copy(&mut limited, &mut io::sink())
        };
        let copied = result.map_err(|e| self.map_io(e, chunk_start, len))?;
        self.offset += copied;

        if copied < len as u64 {
            return Err(StreamError::TruncatedStream {
                format: self.format,
                offset: chunk_start,
                needed: len,
                got: copied as usize,
            });
        }
        Ok(())
    }

    // A source closed underneath us reports UnexpectedEof; that is truncation,
    // not a generic I/O failure.
    fn map_io(&self, e: io::Error, chunk_start: u64, needed: usize) -> StreamError {
        if e.kind() == ErrorKind::UnexpectedEof {
            StreamError::TruncatedStream {
                format: self.format,
                offset: chunk_start,
                needed,
                got: 0,
            }
        } else {
            StreamError::Io(e)
        }
    }
}

/// Counts bytes pulled through a reader.
pub struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> CountingReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out one byte per read and interrupts every other call.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        interrupt: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::new(ErrorKind::Interrupted, "again"));
            }
            if self.pos == self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn read_full_loops_over_short_and_interrupted_reads() {
        let mut r = Trickle { data: b"abcdef".to_vec(), pos: 0, interrupt: false };
        let mut buf = [0u8; 4];
        assert_eq!(read_full(&mut r, &mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");

        let mut rest = [0u8; 8];
        assert_eq!(read_full(&mut r, &mut rest).unwrap(), 2);
        assert_eq!(&rest[..2], b"ef");
    }

    #[test]
    fn short_chunk_is_truncation_with_offset() {
        let mut r = ChunkReader::new(&b"xyz"[..], FormatName::Framing, 10);
        let mut buf = [0u8; 5];
        match r.read_exact_at(&mut buf, 10, true) {
            Err(StreamError::TruncatedStream { offset: 10, needed: 5, got: 3, .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(r.offset(), 13);
    }

    #[test]
    fn clean_eof_only_when_allowed() {
        let mut buf = [0u8; 4];
        let mut r = ChunkReader::new(&b""[..], FormatName::HadoopSnappy, 0);
        assert!(!r.read_exact_at(&mut buf, 0, true).unwrap());
        assert!(matches!(
            r.read_exact_at(&mut buf, 0, false),
            Err(StreamError::TruncatedStream { got: 0, .. })
        ));
    }

    #[test]
    fn skip_discards_and_detects_short_payload() {
        let mut r = ChunkReader::new(&[7u8; 100][..], FormatName::Framing, 0);
        r.skip(60, 0).unwrap();
        assert_eq!(r.offset(), 60);
        assert!(matches!(
            r.skip(60, 60),
            Err(StreamError::TruncatedStream { needed: 60, got: 40, .. })
        ));
    }
}
