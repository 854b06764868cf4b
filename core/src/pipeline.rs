//! Streaming pipeline: one lazy chunk sequence in, one sink out.
//!
//! Single-threaded and blocking. At most one chunk is held in memory at a time,
//! so memory use follows the chunk size, not the stream size. Bytes already
//! written stay written when a later chunk fails.

use std::io::{Read, Write};

use log::debug;

use crate::container::io::CountingReader;
use crate::container::registry::{compress_target, resolve};
use crate::container::{
    sniff, sniff_as, ChunkStream, ContainerFormat, Direction, FormatSelector, SniffResult,
};
use crate::telemetry::RunStats;
use crate::types::StreamError;

/// Run-level knobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Uncompressed bytes per chunk when compressing. `None` uses the format
    /// default; values above the format ceiling are rejected.
    pub chunk_size: Option<usize>,
}

impl PipelineConfig {
    pub fn new(chunk_size: Option<usize>) -> Self {
        Self { chunk_size }
    }

    /// Chunk size for `format`, validated against its ceiling.
    pub fn chunk_size_for(&self, format: &ContainerFormat) -> Result<usize, StreamError> {
        match self.chunk_size {
            None => Ok(format.default_chunk_size),
            Some(size) if size == 0 || size > format.max_chunk_size => Err(StreamError::Validation(format!(
                "chunk size {} out of range for {}: must be 1..={}",
                size, format.name, format.max_chunk_size
            ))),
            Some(size) => Ok(size),
        }
    }
}

// ============================================================
// Entry points
// ============================================================

/// Run one transform with the default configuration.
pub fn run<R, W>(
    direction: Direction,
    selector: FormatSelector,
    source: &mut R,
    sink: &mut W,
) -> Result<RunStats, StreamError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    run_with(&PipelineConfig::default(), direction, selector, source, sink)
}

pub fn run_with<R, W>(
    config: &PipelineConfig,
    direction: Direction,
    selector: FormatSelector,
    source: &mut R,
    sink: &mut W,
) -> Result<RunStats, StreamError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    match direction {
        Direction::Compress => compress(config, selector, source, sink),
        Direction::Decompress => decompress(selector, source, sink),
    }
}

/// Compress into the selected format (`auto` means the registry default).
pub fn compress<R, W>(
    config: &PipelineConfig,
    selector: FormatSelector,
    source: &mut R,
    sink: &mut W,
) -> Result<RunStats, StreamError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let format = compress_target(selector);
    let chunk_size = config.chunk_size_for(format)?;
    debug!("pipeline: compress as {} (selector {}, chunk size {})", format.name, selector, chunk_size);

    let mut counting = CountingReader::new(source);
    let mut stats = RunStats::new(Direction::Compress, format.name);
    {
        let chunks = format.compress_stream(&mut counting, chunk_size);
        drain(chunks, sink, &mut stats)?;
    }
    stats.bytes_in = counting.count();
    Ok(stats)
}

/// Decompress, sniffing the format for `auto` and validating the header
/// against the named format otherwise.
pub fn decompress<R, W>(
    selector: FormatSelector,
    source: &mut R,
    sink: &mut W,
) -> Result<RunStats, StreamError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut counting = CountingReader::new(source);

    let SniffResult { format, consumed } = match selector {
        FormatSelector::Auto => sniff(&mut counting)?,
        FormatSelector::Format(name) => sniff_as(&mut counting, name)?,
    };
    debug!("pipeline: decompress as {} (selector {})", format, selector);

    let mut stats = RunStats::new(Direction::Decompress, format);
    {
        let chunks = resolve(format).decompress_stream(&mut counting, consumed);
        drain(chunks, sink, &mut stats)?;
    }
    stats.bytes_in = counting.count();
    Ok(stats)
}

// ============================================================
// Pump
// ============================================================

fn drain<W: Write + ?Sized>(
    chunks: ChunkStream<'_>,
    sink: &mut W,
    stats: &mut RunStats,
) -> Result<(), StreamError> {
    for chunk in chunks {
        let chunk = chunk?;
        sink.write_all(&chunk)?;
        stats.add_chunk(chunk.len());
    }
    sink.flush()?;
    debug!(
        "pipeline: {} chunks, {} bytes written, largest chunk {} bytes",
        stats.chunks, stats.bytes_out, stats.max_chunk_len
    );
    Ok(())
}
