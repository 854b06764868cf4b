//! container/sniff.rs
//! Identify a container format from the leading bytes of a stream.
//!
//! Every byte read while sniffing is handed back in `SniffResult::consumed`
//! (or in the `UnrecognizedFormat` error) so nothing is lost: the decoder
//! replays it ahead of the unread stream.

use std::io::Read;

use log::debug;

use crate::container::io::read_full;
use crate::container::registry::{all_formats, max_header_len, resolve};
use crate::container::types::FormatName;
use crate::types::StreamError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffResult {
    pub format: FormatName,
    /// Exact bytes taken from the stream during identification.
    pub consumed: Vec<u8>,
}

/// Classify a prefix against the registry, first match in registry order.
pub fn classify(prefix: &[u8]) -> Option<FormatName> {
    all_formats()
        .iter()
        .find(|format| format.matches_header(prefix))
        .map(|format| format.name)
}

/// Read enough bytes to tell every registered format apart and classify them.
///
/// A stream shorter than every header (including an empty one) is
/// `UnrecognizedFormat`, never a wait for more input.
pub fn sniff<R: Read + ?Sized>(source: &mut R) -> Result<SniffResult, StreamError> {
    let mut consumed = vec![0u8; max_header_len()];
    let n = read_full(source, &mut consumed)?;
    consumed.truncate(n);

    match classify(&consumed) {
        Some(format) => {
            debug!("sniff: detected {} from {} leading bytes", format, consumed.len());
            Ok(SniffResult { format, consumed })
        }
        None => {
            debug!("sniff: no registered format matches [{}]", hex::encode(&consumed));
            Err(StreamError::UnrecognizedFormat { expected: None, consumed })
        }
    }
}

/// Validate the header against one caller-chosen format, without trying others.
///
/// - Empty stream: accepted only if the format's empty encoding is empty.
/// - Short stream consistent with the format: accepted, so the decoder can
///   report it as truncated.
/// - Anything else that fails the format's predicate: `UnrecognizedFormat`
///   naming the expected format.
pub fn sniff_as<R: Read + ?Sized>(source: &mut R, name: FormatName) -> Result<SniffResult, StreamError> {
    let format = resolve(name);
    let mut consumed = vec![0u8; format.header_len];
    let n = read_full(source, &mut consumed)?;
    consumed.truncate(n);

    let accepted = if consumed.is_empty() {
        format.empty_is_valid
    } else if consumed.len() < format.header_len {
        format.matches_partial_header(&consumed)
    } else {
        format.matches_forced_header(&consumed)
    };

    if accepted {
        debug!("sniff: header validated as {} ({} bytes)", name, consumed.len());
        Ok(SniffResult { format: name, consumed })
    } else {
        Err(StreamError::UnrecognizedFormat { expected: Some(name), consumed })
    }
}
