use std::io;
use thiserror::Error;

use crate::compression::CompressionError;
use crate::container::FormatName;

/// Unified error for registry lookups, sniffing and the streaming pipeline.
/// - Content errors (the input is not a valid container) are separated from
///   caller and I/O errors so the CLI can map them to distinct exit codes.
/// - Offsets are byte positions within the container stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Caller named a format outside the registry. Raised before any I/O.
    #[error("unsupported format '{name}'")]
    UnsupportedFormat { name: String },

    /// No registered header matched the leading bytes.
    #[error("unrecognized container format{}: leading bytes [{}]",
        expected_suffix(.expected), hex::encode(.consumed))]
    UnrecognizedFormat {
        expected: Option<FormatName>,
        consumed: Vec<u8>,
    },

    /// Chunk length, type or checksum is internally inconsistent.
    #[error("{format}: corrupt chunk at offset {offset}: {reason}")]
    CorruptChunk {
        format: FormatName,
        offset: u64,
        reason: String,
    },

    /// End of stream inside a chunk.
    #[error("{format}: truncated stream at offset {offset}: needed {needed} bytes, got {got}")]
    TruncatedStream {
        format: FormatName,
        offset: u64,
        needed: usize,
        got: usize,
    },

    /// Well-framed chunk whose payload the codec rejected.
    #[error("{format}: failed to uncompress chunk at offset {offset}: {source}")]
    Uncompress {
        format: FormatName,
        offset: u64,
        #[source]
        source: CompressionError,
    },

    /// Codec failure while compressing.
    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    /// Invalid pipeline configuration.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn expected_suffix(expected: &Option<FormatName>) -> String {
    match expected {
        Some(name) => format!(" (expected {})", name),
        None => String::new(),
    }
}

impl StreamError {
    /// True when the input itself was invalid for the requested operation.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            StreamError::UnrecognizedFormat { .. }
                | StreamError::CorruptChunk { .. }
                | StreamError::TruncatedStream { .. }
                | StreamError::Uncompress { .. }
        )
    }
}
