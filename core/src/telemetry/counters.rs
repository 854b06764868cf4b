//! telemetry/counters.rs
//! Per-run counters: chunk counts and byte counts on both sides of the codec.
use serde::Serialize;

use crate::container::{Direction, FormatName};

/// Deterministic counters collected during one pipeline run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub direction: Direction,
    /// Concrete format used (after `auto` resolution or sniffing).
    pub format: FormatName,
    /// Output chunks pushed to the sink.
    pub chunks: u64,
    /// Bytes pulled from the source, including sniffed header bytes.
    pub bytes_in: u64,
    /// Bytes pushed to the sink.
    pub bytes_out: u64,
    /// Largest single chunk pushed to the sink.
    pub max_chunk_len: u64,
}

impl RunStats {
    pub fn new(direction: Direction, format: FormatName) -> Self {
        Self {
            direction,
            format,
            chunks: 0,
            bytes_in: 0,
            bytes_out: 0,
            max_chunk_len: 0,
        }
    }

    /// Record one chunk written to the sink.
    pub fn add_chunk(&mut self, len: usize) {
        self.chunks += 1;
        self.bytes_out += len as u64;
        self.max_chunk_len = self.max_chunk_len.max(len as u64);
    }

    /// `bytes_out / bytes_in`; 0.0 for an empty input.
    pub fn ratio(&self) -> f64 {
        if self.bytes_in == 0 {
            0.0
        } else {
            self.bytes_out as f64 / self.bytes_in as f64
        }
    }
}
