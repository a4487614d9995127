//! tonbox - shared types
//!
//! Common vocabulary for the tonbox playback appliance:
//! - The [`Command`] set delivered to the audio transport by external event
//!   sources (buttons, tag scanner, network, sleep controller)
//! - The published [`PlayerStatus`] snapshot consumed by status readers
//! - The [`PersistedState`] record written before a sleep transition and
//!   restored at boot, via [`StateStore`]
//! - [`PlayerConfig`] and the fixed tuning constants in [`config`]
//!
//! This crate is deliberately free of audio and threading concerns so that
//! every layer of the player can depend on it.

mod command;
pub mod config;
mod error;
mod state;

// Public exports
pub use command::Command;
pub use config::PlayerConfig;
pub use error::{CoreError, Result};
pub use state::{PersistedState, PlayerStatus, StateStore};
