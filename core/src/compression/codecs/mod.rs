//! compression/codecs/mod.rs
//! Block codec implementations behind the `Compressor` / `Decompressor` traits.

pub mod snappy;

pub use snappy::*;
