//! Audio output peripheral boundary
//!
//! The real device streams chunks to a digital audio peripheral whose
//! clock can be started and stopped and whose internal buffer can be
//! zeroed. The core only ever talks to this trait; drivers, test doubles
//! and file/stdout writers all live behind it.

use std::io;

/// A blocking audio output.
///
/// `write` is expected to block at the real-time output rate; the chunk
/// queue upstream provides the slack that keeps the decoder ahead of it.
pub trait AudioSink: Send {
    /// Start the output clock.
    fn start(&mut self);

    /// Stop the output clock, leaving buffered device data in place.
    fn stop(&mut self);

    /// Zero the device's internal buffer (stale audio after a skip).
    fn clear(&mut self);

    /// Blocking write of one chunk payload.
    fn write(&mut self, samples: &[i16]) -> io::Result<()>;
}

/// Sink that discards all output. Useful for tests and headless operation.
pub struct NullSink;

impl AudioSink for NullSink {
    fn start(&mut self) {}

    fn stop(&mut self) {}

    fn clear(&mut self) {}

    fn write(&mut self, _samples: &[i16]) -> io::Result<()> {
        Ok(())
    }
}
