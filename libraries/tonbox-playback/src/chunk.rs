//! The unit of exchange between transport and stream writer
//!
//! Exactly one chunk travels per queue slot; the queue depth is the
//! backpressure buffer that decouples decoding from the blocking hardware
//! write. Besides its samples a chunk carries the pause decision of the
//! iteration that produced it, so the writer can toggle the output clock
//! on pause edges without sharing state with the transport.

use tonbox_core::config::CHUNK_SAMPLES;

/// One fixed-size block of interleaved stereo samples plus transport flags.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Pause decision for this iteration; the writer stops the output
    /// clock on a false-to-true edge and restarts it on the reverse edge.
    pub paused: bool,

    /// On resume, zero the device buffer first so stale audio queued
    /// before a skip never plays.
    pub clear_on_resume: bool,

    /// Interleaved stereo payload, always `CHUNK_SAMPLES` long.
    pub samples: Vec<i16>,
}

impl Chunk {
    /// A silent chunk with the given flags.
    pub fn silent(paused: bool, clear_on_resume: bool) -> Self {
        Self {
            paused,
            clear_on_resume,
            samples: vec![0; CHUNK_SAMPLES],
        }
    }
}
