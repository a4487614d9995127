//! Playback status and retained state
//!
//! Two closely related records: the live [`PlayerStatus`] snapshot the
//! transport publishes for status readers, and the [`PersistedState`]
//! subset written to retained storage right before a sleep transition and
//! read back at the next boot to attempt a resume.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Snapshot of the player as seen from outside the audio core.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStatus {
    /// True while a valid album is open and playback is not paused.
    pub playing: bool,

    /// Name of the open album, if any.
    pub album: Option<String>,

    /// Index of the current track within the album.
    pub track: u32,

    /// Byte position inside the current track, suitable for resume.
    pub position: u64,

    /// Current volume in `[VOLUME_MIN, VOLUME_MAX]`.
    pub volume: i32,
}

/// The fixed-layout record that survives a sleep cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Volume at the time of the sleep transition.
    pub volume: i32,

    /// Open album name; empty when nothing was playing.
    pub album: String,

    /// Track index within the album.
    pub track: u32,

    /// Byte position inside the track.
    pub position: u64,
}

impl PersistedState {
    /// Capture the persistable subset of a status snapshot.
    pub fn from_status(status: &PlayerStatus) -> Self {
        Self {
            volume: status.volume,
            album: status.album.clone().unwrap_or_default(),
            track: status.track,
            position: status.position,
        }
    }

    /// Whether the record names an album to resume.
    pub fn has_album(&self) -> bool {
        !self.album.is_empty()
    }
}

/// Store for the retained playback state record.
///
/// On the appliance this lives in memory that survives deep sleep; here it
/// is a small JSON file at a configured path. Loading is best-effort: a
/// missing or unreadable record simply means there is nothing to resume.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the retained record, if one is present and intact.
    pub fn load(&self) -> Option<PersistedState> {
        let data = fs::read_to_string(&self.path).ok()?;

        match serde_json::from_str(&data) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("discarding unreadable retained state: {e}");
                None
            }
        }
    }

    /// Write the retained record, replacing any previous one.
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        let data = serde_json::to_string(state)?;
        fs::write(&self.path, data)?;

        debug!("retained state written to {}", self.path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state"));

        let state = PersistedState {
            volume: 40,
            album: "lullabies".to_string(),
            track: 3,
            position: 123_456,
        };

        store.save(&state).unwrap();
        assert_eq!(store.load(), Some(state));
    }

    #[test]
    fn missing_record_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state"));

        assert_eq!(store.load(), None);
    }

    #[test]
    fn corrupt_record_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state");
        fs::write(&path, "{not json").unwrap();

        assert_eq!(StateStore::new(&path).load(), None);
    }

    #[test]
    fn from_status_drops_missing_album() {
        let status = PlayerStatus {
            playing: false,
            album: None,
            track: 0,
            position: 0,
            volume: 20,
        };

        let state = PersistedState::from_status(&status);
        assert!(!state.has_album());
    }
}
