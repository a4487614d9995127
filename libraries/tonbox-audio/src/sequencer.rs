//! Multi-track sequencer
//!
//! Composes a [`Catalog`] and a [`StreamDecoder`] into one continuous
//! sample stream: when the open track runs out mid-call, the next catalog
//! entry is opened and decoding continues into the same output slice.
//! Tracks whose decoder will not open are skipped. Running past the last
//! entry marks the whole sequencer finished; it never wraps on its own —
//! wrapping is only done by the explicit `next_track` navigation.

use crate::catalog::Catalog;
use crate::decoder::StreamDecoder;
use crate::error::{AudioError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct Sequencer {
    catalog: Catalog,
    decoder: StreamDecoder,
    dir: PathBuf,
    track: usize,
}

impl Sequencer {
    /// Open an album directory, positioned at `start_track` when possible
    /// and at the first playable track otherwise.
    ///
    /// Fails when the directory is unreadable or holds no tracks at all;
    /// callers treat that as "no audio available".
    pub fn open(dir: &Path, start_track: usize) -> Result<Self> {
        let catalog = Catalog::open(dir)?;

        if catalog.is_empty() {
            return Err(AudioError::NoTracks(dir.to_path_buf()));
        }

        let mut sequencer = Self {
            catalog,
            decoder: StreamDecoder::new(),
            dir: dir.to_path_buf(),
            track: 0,
        };

        if !sequencer.go_to_track(start_track) {
            sequencer.rewind();
        }

        Ok(sequencer)
    }

    /// Decode into `buffer` (interleaved stereo), crossing track boundaries
    /// as needed. Returns the number of frames produced; less than
    /// `buffer.len() / 2` exactly when the end of the catalog was reached
    /// within this call.
    pub fn decode(&mut self, buffer: &mut [i16]) -> usize {
        let count = buffer.len() / 2;
        let mut produced = 0;

        while produced < count && self.track < self.catalog.len() {
            if !self.decoder.is_finished() {
                produced += self.decoder.decode(&mut buffer[2 * produced..2 * count]);
            }

            if self.decoder.is_finished() {
                self.track += 1;
                if self.track < self.catalog.len() {
                    self.open_current();
                }
            }
        }

        produced
    }

    /// True once playback has advanced past the last catalog entry.
    pub fn is_finished(&self) -> bool {
        self.track >= self.catalog.len()
    }

    /// Restart from the first playable track of the album.
    pub fn rewind(&mut self) {
        self.track = 0;

        while self.track < self.catalog.len() {
            if self.open_current() {
                break;
            }
            self.track += 1;
        }
    }

    /// Restart the current track from position 0.
    pub fn rewind_track(&mut self) {
        if self.track < self.catalog.len() {
            self.open_current();
        } else {
            self.rewind();
        }
    }

    /// Move to the prior track, saturating at the first one.
    pub fn previous_track(&mut self) {
        let target = self
            .track
            .saturating_sub(1)
            .min(self.catalog.len().saturating_sub(1));

        self.go_to_track(target);
    }

    /// Move to the next track, wrapping to the first after the last.
    pub fn next_track(&mut self) {
        let target = if self.track + 1 >= self.catalog.len() {
            0
        } else {
            self.track + 1
        };

        self.go_to_track(target);
    }

    /// Jump to a specific track. False when the index is out of range or
    /// the track's decoder will not open.
    pub fn go_to_track(&mut self, index: usize) -> bool {
        if index >= self.catalog.len() {
            return false;
        }

        self.track = index;
        self.open_current()
    }

    /// Reposition inside the current track to approximately the given byte
    /// offset (see [`StreamDecoder::seek_to`]).
    pub fn seek_to(&mut self, byte_offset: u64) {
        self.decoder.seek_to(byte_offset);
    }

    /// Index of the current track. Equals `len` once the sequence is
    /// finished.
    pub fn track(&self) -> usize {
        self.track
    }

    /// Decoded frames into the current track (elapsed time position).
    pub fn track_position(&self) -> u64 {
        self.decoder.position()
    }

    /// Byte offset inside the current track, for persistence.
    pub fn seek_position(&self) -> u64 {
        self.decoder.seek_position()
    }

    /// Number of tracks in the underlying catalog.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Release the decoder session.
    pub fn close(&mut self) {
        self.decoder.close();
    }

    fn open_current(&mut self) -> bool {
        let Some(name) = self.catalog.entry(self.track) else {
            return false;
        };

        let path = self.dir.join(name);
        match self.decoder.open(&path) {
            Ok(()) => true,
            Err(e) => {
                warn!("skipping unplayable track {}: {e}", path.display());
                self.decoder.close();
                false
            }
        }
    }
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("dir", &self.dir)
            .field("track", &self.track)
            .field("tracks", &self.catalog.len())
            .finish()
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        debug!("sequencer for {} closed", self.dir.display());
    }
}
