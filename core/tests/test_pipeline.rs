// End-to-end pipeline runs:

// * ✅ round trips for every selector
// * ✅ bounded chunk sizes (memory follows chunk size, not stream size)
// * ✅ configuration validation before any I/O
// * ✅ I/O failure mapping (Interrupted, UnexpectedEof, other errors, sink errors)
// * ✅ run statistics

#[cfg(test)]
mod tests {
    use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};

    use snappy_core::compression::codecs::max_compressed_len;
    use snappy_core::constants::framing::MAX_UNCOMPRESSED_CHUNK_LEN;
    use snappy_core::container::registry::resolve;
    use snappy_core::container::{Direction, FormatName, FormatSelector};
    use snappy_core::pipeline::{run, run_with, PipelineConfig};
    use snappy_core::types::StreamError;

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------
    fn sample(len: usize) -> Vec<u8> {
        let mut x = 0x2545_f491_4f6c_dd1du64;
        (0..len)
            .map(|i| {
                // Half noise, half runs, so both chunk kinds appear.
                if (i / 4096) % 2 == 0 {
                    x ^= x << 13;
                    x ^= x >> 7;
                    x ^= x << 17;
                    x as u8
                } else {
                    b'a' + (i % 7) as u8
                }
            })
            .collect()
    }

    fn roundtrip(data: &[u8], compress_as: FormatSelector, decompress_as: FormatSelector) -> Vec<u8> {
        let mut packed = Vec::new();
        run(Direction::Compress, compress_as, &mut &data[..], &mut packed).unwrap();
        let mut plain = Vec::new();
        run(Direction::Decompress, decompress_as, &mut &packed[..], &mut plain).unwrap();
        plain
    }

    /// Yields `data`, then fails every read with `kind`.
    struct FailAfter {
        data: Vec<u8>,
        pos: usize,
        kind: ErrorKind,
    }

    impl Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos == self.data.len() {
                return Err(io::Error::new(self.kind, "source failed"));
            }
            let n = buf.len().min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    /// Interrupts every other read and hands out at most 7 bytes otherwise.
    struct Stutter<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Stutter<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::new(ErrorKind::Interrupted, "signal"));
            }
            let n = buf.len().min(self.data.len()).min(7);
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Untouchable;

    impl Read for Untouchable {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            panic!("stream must not be read");
        }
    }

// # ✅ 1. Round trips

    #[test]
    fn every_format_round_trips_through_auto_and_forced_decode() {
        let data = sample(300_000);
        for &name in snappy_core::container::all_names() {
            assert_eq!(roundtrip(&data, name.into(), FormatSelector::Auto), data, "{}", name);
            assert_eq!(roundtrip(&data, name.into(), name.into()), data, "{}", name);
        }
    }

    #[test]
    fn auto_compress_writes_framing() {
        let mut packed = Vec::new();
        let stats = run(Direction::Compress, FormatSelector::Auto, &mut &b"abc"[..], &mut packed).unwrap();
        assert_eq!(stats.format, FormatName::Framing);
        assert_eq!(&packed[..4], &[0xff, 0x06, 0x00, 0x00]);
    }

    #[test]
    fn small_inputs_round_trip() {
        for len in [0usize, 1, 2, 7, 8, 9, 10, 11, 100] {
            let data = sample(len);
            assert_eq!(roundtrip(&data, FormatName::Framing.into(), FormatSelector::Auto), data);
            assert_eq!(roundtrip(&data, FormatName::HadoopSnappy.into(), FormatName::HadoopSnappy.into()), data);
        }
    }

    #[test]
    fn interrupted_and_short_reads_are_retried() {
        let data = sample(150_000);
        for &name in snappy_core::container::all_names() {
            let mut packed = Vec::new();
            run(Direction::Compress, name.into(), &mut Stutter { data: &data, interrupt: false }, &mut packed).unwrap();

            let mut plain = Vec::new();
            run(Direction::Decompress, FormatSelector::Auto, &mut Stutter { data: &packed, interrupt: false }, &mut plain)
                .unwrap();
            assert_eq!(plain, data);
        }
    }

    #[test]
    fn file_backed_streams() {
        let data = sample(200_000);
        let mut packed = tempfile::tempfile().unwrap();
        run(Direction::Compress, FormatSelector::Auto, &mut &data[..], &mut packed).unwrap();

        packed.seek(SeekFrom::Start(0)).unwrap();
        let mut plain = Vec::new();
        run(Direction::Decompress, FormatSelector::Auto, &mut packed, &mut plain).unwrap();
        assert_eq!(plain, data);
    }

// # ✅ 2. Memory is bounded by the chunk size

    #[test]
    fn chunks_stay_within_format_ceiling() {
        let data = sample(1 << 20);

        let mut packed = Vec::new();
        let stats = run(Direction::Compress, FormatName::Framing.into(), &mut &data[..], &mut packed).unwrap();
        assert!(stats.chunks >= 16);
        assert!(stats.max_chunk_len as usize <= 8 + max_compressed_len(MAX_UNCOMPRESSED_CHUNK_LEN));

        let mut plain = Vec::new();
        let stats = run(Direction::Decompress, FormatSelector::Auto, &mut &packed[..], &mut plain).unwrap();
        assert_eq!(stats.chunks, 16);
        assert_eq!(stats.max_chunk_len as usize, MAX_UNCOMPRESSED_CHUNK_LEN);
    }

    #[test]
    fn smaller_chunk_size_means_smaller_chunks() {
        let data = sample(10_000);
        let config = PipelineConfig::new(Some(1024));

        let mut packed = Vec::new();
        run_with(&config, Direction::Compress, FormatSelector::Auto, &mut &data[..], &mut packed).unwrap();

        let mut plain = Vec::new();
        let stats = run(Direction::Decompress, FormatSelector::Auto, &mut &packed[..], &mut plain).unwrap();
        assert_eq!(plain, data);
        assert_eq!(stats.chunks, 10);
        assert!(stats.max_chunk_len <= 1024);
    }

// # ❌ 3. Configuration validation

    #[test]
    fn chunk_size_is_validated_against_format() {
        let framing = resolve(FormatName::Framing);
        let hadoop = resolve(FormatName::HadoopSnappy);

        assert_eq!(PipelineConfig::default().chunk_size_for(framing).unwrap(), 65_536);
        assert_eq!(PipelineConfig::default().chunk_size_for(hadoop).unwrap(), 256 * 1024);
        assert!(matches!(PipelineConfig::new(Some(0)).chunk_size_for(framing), Err(StreamError::Validation(_))));
        assert!(matches!(PipelineConfig::new(Some(65_537)).chunk_size_for(framing), Err(StreamError::Validation(_))));
        assert_eq!(PipelineConfig::new(Some(65_537)).chunk_size_for(hadoop).unwrap(), 65_537);
    }

    #[test]
    fn invalid_config_fails_before_reading() {
        let mut sink = Vec::new();
        let err = run_with(
            &PipelineConfig::new(Some(1 << 20)),
            Direction::Compress,
            FormatSelector::Auto,
            &mut Untouchable,
            &mut sink,
        )
        .unwrap_err();

        assert!(matches!(err, StreamError::Validation(_)));
        assert!(!err.is_content_error());
        assert!(sink.is_empty());
    }

// # ❌ 4. I/O failures

    #[test]
    fn source_error_passes_through_as_io() {
        let mut source = FailAfter { data: sample(1000), pos: 0, kind: ErrorKind::PermissionDenied };
        let err = run(Direction::Compress, FormatSelector::Auto, &mut source, &mut Vec::new()).unwrap_err();
        match err {
            StreamError::Io(e) => assert_eq!(e.kind(), ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn source_error_while_sniffing_is_io() {
        let mut source = FailAfter { data: vec![0xff, 0x06], pos: 0, kind: ErrorKind::Other };
        let err = run(Direction::Decompress, FormatSelector::Auto, &mut source, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, StreamError::Io(_)));
    }

    #[test]
    fn unexpected_eof_inside_chunk_is_truncation() {
        let mut packed = Vec::new();
        run(Direction::Compress, FormatSelector::Auto, &mut &sample(5000)[..], &mut packed).unwrap();

        let mut source = FailAfter { data: packed[..30].to_vec(), pos: 0, kind: ErrorKind::UnexpectedEof };
        let err = run(Direction::Decompress, FormatSelector::Auto, &mut source, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, StreamError::TruncatedStream { format: FormatName::Framing, offset: 10, .. }));
    }

    #[test]
    fn sink_error_is_io() {
        let err = run(Direction::Compress, FormatSelector::Auto, &mut &b"data"[..], &mut BrokenSink).unwrap_err();
        assert!(matches!(err, StreamError::Io(ref e) if e.kind() == ErrorKind::BrokenPipe));
        assert!(!err.is_content_error());
    }

    #[test]
    fn unrecognized_input_writes_nothing() {
        let mut sink = Vec::new();
        let err = run(Direction::Decompress, FormatSelector::Auto, &mut &b"plain text, not compressed"[..], &mut sink)
            .unwrap_err();
        assert!(matches!(err, StreamError::UnrecognizedFormat { .. }));
        assert!(sink.is_empty());
    }

// # ✅ 5. Statistics

    #[test]
    fn stats_count_both_sides() {
        let data = sample(100_000);
        let mut packed = Vec::new();
        let enc = run(Direction::Compress, FormatName::HadoopSnappy.into(), &mut &data[..], &mut packed).unwrap();
        assert_eq!(enc.direction, Direction::Compress);
        assert_eq!(enc.bytes_in, data.len() as u64);
        assert_eq!(enc.bytes_out, packed.len() as u64);

        let mut plain = Vec::new();
        let dec = run(Direction::Decompress, FormatSelector::Auto, &mut &packed[..], &mut plain).unwrap();
        assert_eq!(dec.format, FormatName::HadoopSnappy);
        assert_eq!(dec.bytes_in, packed.len() as u64);
        assert_eq!(dec.bytes_out, data.len() as u64);
    }

    #[test]
    fn stats_serialize_with_wire_names() {
        let mut packed = Vec::new();
        let stats = run(Direction::Compress, FormatName::HadoopSnappy.into(), &mut &b""[..], &mut packed).unwrap();
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["direction"], "compress");
        assert_eq!(json["format"], "hadoop_snappy");
        assert_eq!(json["chunks"], 0);
        assert_eq!(json["bytes_in"], 0);
    }
}
