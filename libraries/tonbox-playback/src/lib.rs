//! tonbox - transport and streaming
//!
//! The concurrent half of the player: a command-driven transport worker
//! decoding into fixed-size chunks, and a stream-writer worker feeding the
//! audio peripheral, joined by a bounded chunk queue whose backpressure
//! paces decoding against the real-time output rate.
//!
//! # Architecture
//!
//! ```text
//! buttons / tag scanner / network / sleep controller
//!         |  Command queue (bounded, depth 3)
//!         v
//!     Transport ──── Chunk queue (bounded, depth 8) ───> Stream writer
//!     (decode + command dispatch)                        (blocking device write)
//! ```
//!
//! [`Player`] wraps both workers behind the enqueue/status API. The
//! device driver is injected as an [`AudioSink`]; power and network
//! collaborators as [`PlatformHooks`].

mod chunk;
mod hooks;
mod player;
mod sink;
mod transport;
mod writer;

// Public exports
pub use chunk::Chunk;
pub use hooks::{NoHooks, PlatformHooks};
pub use player::Player;
pub use sink::{AudioSink, NullSink};
pub use tonbox_core::{Command, PlayerConfig, PlayerStatus};
