//! container/registry.rs
//! Fixed table of container formats.
//!
//! The table is a `static`: built at compile time, never mutated, and safe to
//! share across threads without synchronisation.

use crate::constants::{framing, hadoop};
use crate::container::types::{ContainerFormat, FormatName, FormatSelector};
use crate::types::StreamError;

static REGISTRY: [ContainerFormat; 2] = [
    ContainerFormat {
        name: FormatName::Framing,
        header_len: framing::STREAM_IDENTIFIER.len(),
        signature_len: framing::STREAM_IDENTIFIER.len(),
        default_chunk_size: framing::MAX_UNCOMPRESSED_CHUNK_LEN,
        max_chunk_size: framing::MAX_UNCOMPRESSED_CHUNK_LEN,
        empty_is_valid: false,
    },
    ContainerFormat {
        name: FormatName::HadoopSnappy,
        header_len: hadoop::HEADER_LEN,
        signature_len: 0,
        default_chunk_size: hadoop::DEFAULT_BLOCK_SIZE,
        max_chunk_size: hadoop::MAX_BLOCK_LEN,
        empty_is_valid: true,
    },
];

const DEFAULT_FORMAT: FormatName = FormatName::Framing;

/// Look up the container for a registered name. Infallible: the name type is
/// the closed set.
pub fn resolve(name: FormatName) -> &'static ContainerFormat {
    match name {
        FormatName::Framing => &REGISTRY[0],
        FormatName::HadoopSnappy => &REGISTRY[1],
    }
}

/// Parse and resolve a name coming from outside the type system.
pub fn resolve_name(name: &str) -> Result<&'static ContainerFormat, StreamError> {
    let name: FormatName = name.parse()?;
    Ok(resolve(name))
}

/// Parse a selector name (`auto` or any registered format).
pub fn resolve_selector(name: &str) -> Result<FormatSelector, StreamError> {
    name.parse()
}

/// Concrete format used when compressing with the `auto` selector.
pub fn default_name() -> FormatName {
    DEFAULT_FORMAT
}

/// Registered formats in sniffing order.
pub fn all_names() -> &'static [FormatName] {
    &FormatName::ALL
}

pub fn all_formats() -> &'static [ContainerFormat] {
    &REGISTRY
}

/// Every value accepted by a format selector, `auto` first.
pub fn selector_names() -> Vec<&'static str> {
    std::iter::once(FormatSelector::AUTO_NAME)
        .chain(all_names().iter().map(|name| name.as_str()))
        .collect()
}

/// Bytes the sniffer must read to tell every registered format apart.
pub fn max_header_len() -> usize {
    REGISTRY.iter().map(|format| format.header_len).max().unwrap_or(0)
}

/// Format a selector resolves to when compressing.
pub fn compress_target(selector: FormatSelector) -> &'static ContainerFormat {
    match selector {
        FormatSelector::Auto => resolve(default_name()),
        FormatSelector::Format(name) => resolve(name),
    }
}
