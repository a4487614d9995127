//! Player configuration and fixed tuning constants
//!
//! The constants mirror the appliance's build-time configuration; they are
//! shared by every layer so that chunk sizes and volume arithmetic agree
//! across the pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output sample rate in Hz. The whole pipeline runs at this fixed rate.
pub const SAMPLE_RATE: u32 = 44_100;

/// Stereo frames per output chunk (one frame = one left/right sample pair).
pub const CHUNK_FRAMES: usize = 512;

/// Interleaved i16 samples per output chunk.
pub const CHUNK_SAMPLES: usize = CHUNK_FRAMES * 2;

/// Depth of the bounded chunk queue between transport and stream writer.
pub const PLAYBACK_QUEUE_DEPTH: usize = 8;

/// Depth of the bounded command queue feeding the transport.
pub const COMMAND_QUEUE_DEPTH: usize = 3;

/// Volume change per up/down step.
pub const VOLUME_STEP: i32 = 10;

/// Lowest volume reachable through the step commands. One step, not zero:
/// the buttons can never fully mute the device.
pub const VOLUME_MIN: i32 = VOLUME_STEP;

/// Highest volume reachable through the step commands.
pub const VOLUME_MAX: i32 = 100;

/// Full-scale reference for the integer sample scaling `s * volume / FULL`.
pub const VOLUME_FULL: i32 = 100;

/// Volume after a cold boot with no restorable state.
pub const VOLUME_DEFAULT: i32 = 20;

/// A previous-command within this window of the track start restarts the
/// current track; beyond it, it moves to the prior track.
pub const REWIND_TIMEOUT_MS: u64 = 2_000;

/// Upper bound on leading all-zero frames discarded per track (encoder
/// padding silence).
pub const MAX_LEAD_IN_FRAMES: u32 = 3_000;

/// How far a byte seek backs up before re-probing, so the format reader
/// resynchronizes on a frame boundary instead of mid-frame.
pub const SEEK_BACKOFF_BYTES: u64 = 1_536;

/// Explicitly constructed player configuration.
///
/// There are no ambient defaults baked into the player itself; whoever
/// builds the player decides where the music lives and where retained
/// state goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Root of the audio library; one subdirectory per album.
    pub music_dir: PathBuf,

    /// Where the persisted playback state record is kept across sleep.
    pub state_path: PathBuf,

    /// Volume used when no persisted state is restorable.
    pub default_volume: i32,
}

impl PlayerConfig {
    /// Configuration rooted at the given music directory, with retained
    /// state stored alongside it.
    pub fn new(music_dir: impl Into<PathBuf>) -> Self {
        let music_dir = music_dir.into();
        let state_path = music_dir.join(".tonbox-state");

        Self {
            music_dir,
            state_path,
            default_volume: VOLUME_DEFAULT,
        }
    }

    /// Resolve an album name to its directory under the music root.
    pub fn album_dir(&self, album: &str) -> PathBuf {
        self.music_dir.join(album)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new(Path::new("/music"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn album_dir_resolves_under_music_root() {
        let config = PlayerConfig::new("/music");
        assert_eq!(config.album_dir("lullabies"), PathBuf::from("/music/lullabies"));
    }

    #[test]
    fn chunk_constants_agree() {
        assert_eq!(CHUNK_SAMPLES, CHUNK_FRAMES * 2);
    }

    #[test]
    fn volume_bounds_are_step_aligned() {
        assert_eq!(VOLUME_MIN % VOLUME_STEP, 0);
        assert_eq!(VOLUME_MAX % VOLUME_STEP, 0);
        assert!(VOLUME_MIN <= VOLUME_DEFAULT && VOLUME_DEFAULT <= VOLUME_MAX);
    }
}
