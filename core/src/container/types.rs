//! container/types.rs
//! Format identifiers, selectors and the container descriptor.
use std::fmt;
use std::io::{Cursor, Read};
use std::str::FromStr;

use serde::Serialize;

use crate::container::{framing, hadoop};
use crate::types::StreamError;

/// Lazy, finite, non-restartable sequence of output chunks.
pub type ChunkStream<'a> = Box<dyn Iterator<Item = Result<Vec<u8>, StreamError>> + 'a>;

/// Closed set of registered container formats, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatName {
    #[serde(rename = "framing")]
    Framing,
    #[serde(rename = "hadoop_snappy")]
    HadoopSnappy,
}

impl FormatName {
    pub const ALL: [FormatName; 2] = [FormatName::Framing, FormatName::HadoopSnappy];

    pub const fn as_str(self) -> &'static str {
        match self {
            FormatName::Framing => "framing",
            FormatName::HadoopSnappy => "hadoop_snappy",
        }
    }
}

impl fmt::Display for FormatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatName {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| StreamError::UnsupportedFormat { name: s.to_string() })
    }
}

/// What the caller asked for: a concrete format, or "auto".
///
/// Compression maps `Auto` to the registry default; decompression sniffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatSelector {
    #[default]
    Auto,
    Format(FormatName),
}

impl FormatSelector {
    pub const AUTO_NAME: &'static str = "auto";
}

impl fmt::Display for FormatSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatSelector::Auto => f.write_str(Self::AUTO_NAME),
            FormatSelector::Format(name) => fmt::Display::fmt(name, f),
        }
    }
}

impl FromStr for FormatSelector {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::AUTO_NAME {
            return Ok(FormatSelector::Auto);
        }
        s.parse().map(FormatSelector::Format)
    }
}

impl From<FormatName> for FormatSelector {
    fn from(name: FormatName) -> Self {
        FormatSelector::Format(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Compress,
    Decompress,
}

/// Immutable description of one container format.
///
/// Entries live in the static registry table and are shared for the whole
/// process; they hold no per-stream state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerFormat {
    pub name: FormatName,
    /// Bytes the header predicate needs before it can decide.
    pub header_len: usize,
    /// Leading bytes that are pure signature and carry no chunk data.
    pub signature_len: usize,
    /// Uncompressed bytes per chunk written by default.
    pub default_chunk_size: usize,
    /// Largest uncompressed chunk this format may write.
    pub max_chunk_size: usize,
    /// Whether the empty byte string is a complete encoding of empty input.
    pub empty_is_valid: bool,
}

impl ContainerFormat {
    /// Header predicate over a sniffed prefix of at least `header_len` bytes.
    pub fn matches_header(&self, prefix: &[u8]) -> bool {
        if prefix.len() < self.header_len {
            return false;
        }
        match self.name {
            FormatName::Framing => framing::matches_header(prefix),
            FormatName::HadoopSnappy => hadoop::matches_header(prefix),
        }
    }

    /// Header predicate for a caller-chosen format. Accepts every complete
    /// header the decoder accepts, which may be more than auto-detection does.
    pub fn matches_forced_header(&self, prefix: &[u8]) -> bool {
        match self.name {
            FormatName::Framing => self.matches_header(prefix),
            FormatName::HadoopSnappy => hadoop::matches_forced_header(prefix),
        }
    }

    /// Whether a prefix shorter than `header_len` is still consistent with this
    /// format, so that a short stream is reported as truncated rather than foreign.
    pub fn matches_partial_header(&self, prefix: &[u8]) -> bool {
        match self.name {
            FormatName::Framing => framing::matches_partial_header(prefix),
            FormatName::HadoopSnappy => hadoop::matches_partial_header(prefix),
        }
    }

    /// Encode `source` in chunks of at most `chunk_size` uncompressed bytes.
    pub fn compress_stream<'a, R: Read + 'a>(&self, source: R, chunk_size: usize) -> ChunkStream<'a> {
        let chunk_size = chunk_size.clamp(1, self.max_chunk_size);
        match self.name {
            FormatName::Framing => Box::new(framing::FramingEncoder::new(source, chunk_size)),
            FormatName::HadoopSnappy => Box::new(hadoop::HadoopEncoder::new(source, chunk_size)),
        }
    }

    /// Decode `source`, treating `consumed` as bytes already read from its front.
    ///
    /// A complete signature at the start of `consumed` is taken as validated and
    /// skipped; everything after it is replayed ahead of the unread source. If
    /// the signature is missing or partial, the decoder validates it itself.
    pub fn decompress_stream<'a, R: Read + 'a>(&self, source: R, mut consumed: Vec<u8>) -> ChunkStream<'a> {
        let validated = self.signature_len > 0
            && consumed.len() >= self.signature_len
            && self.matches_header(&consumed);

        let skip = if validated { self.signature_len } else { 0 };
        consumed.drain(..skip);
        let replay = Cursor::new(consumed).chain(source);
        let offset = skip as u64;

        match self.name {
            FormatName::Framing => Box::new(framing::FramingDecoder::new(replay, offset, validated)),
            FormatName::HadoopSnappy => Box::new(hadoop::HadoopDecoder::new(replay, offset)),
        }
    }
}
