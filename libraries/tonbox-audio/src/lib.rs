//! tonbox - decoding and sequencing
//!
//! The file-to-PCM half of the player:
//! - [`StreamDecoder`]: one compressed audio file to interleaved stereo
//!   i16, a chunk at a time
//! - [`Catalog`]: the sorted, cacheable track list of an album directory
//! - [`Sequencer`]: catalog + decoder composed into continuous multi-track
//!   playback with navigation and best-effort byte seeking
//! - [`Signal`]: the synthesized acknowledgment/error tones
//! - [`SilenceTrimmer`]: optional silence-trimming filter, not wired into
//!   the default pipeline
//!
//! Everything here is synchronous and single-threaded; the transport layer
//! in `tonbox-playback` owns the threads and queues.

mod catalog;
mod decoder;
mod error;
mod sequencer;
mod signal;
mod source;
mod trim;

// Public exports
pub use catalog::Catalog;
pub use decoder::StreamDecoder;
pub use error::{AudioError, Result};
pub use sequencer::Sequencer;
pub use signal::{Signal, SignalKind};
pub use trim::SilenceTrimmer;
