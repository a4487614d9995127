//! Transport worker
//!
//! The command-driven heart of the player. Each loop iteration drains at
//! most one pending command, computes the pause decision, fills one chunk
//! (tone, decoded audio, or silence), applies volume, publishes the status
//! snapshot, and pushes the chunk onto the bounded queue feeding the
//! stream writer. The queue's backpressure paces the loop against the
//! real-time output rate.
//!
//! While paused or idle with no tone running there is nothing to produce,
//! so the command wait blocks indefinitely; while streaming it polls, so
//! command latency never stalls the decode loop.

use crate::chunk::Chunk;
use crate::hooks::PlatformHooks;
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tonbox_audio::{Sequencer, Signal, SignalKind};
use tonbox_core::config::{
    CHUNK_FRAMES, REWIND_TIMEOUT_MS, SAMPLE_RATE, VOLUME_FULL, VOLUME_MAX, VOLUME_MIN, VOLUME_STEP,
};
use tonbox_core::{Command, PlayerConfig, PlayerStatus, StateStore};
use tracing::{debug, info, warn};

pub(crate) struct Transport {
    config: PlayerConfig,
    store: StateStore,

    sequencer: Option<Sequencer>,
    signal: Signal,
    hooks: Box<dyn PlatformHooks>,

    paused: bool,
    clear_on_resume: bool,
    volume: i32,

    shared: Arc<Mutex<PlayerStatus>>,

    chunk_tx: Sender<Chunk>,
    /// Receiver clone used solely to discard queued chunks on a
    /// skip-while-paused, the appliance's queue-reset.
    chunk_rx: Receiver<Chunk>,

    shutdown: Arc<AtomicBool>,
}

impl Transport {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        config: PlayerConfig,
        store: StateStore,
        shared: Arc<Mutex<PlayerStatus>>,
        chunk_tx: Sender<Chunk>,
        chunk_rx: Receiver<Chunk>,
        shutdown: Arc<AtomicBool>,
        hooks: Box<dyn PlatformHooks>,
    ) -> Self {
        let volume = config.default_volume.clamp(VOLUME_MIN, VOLUME_MAX);

        Self {
            config,
            store,
            sequencer: None,
            signal: Signal::new(),
            hooks,
            paused: true,
            clear_on_resume: false,
            volume,
            shared,
            chunk_tx,
            chunk_rx,
            shutdown,
        }
    }

    /// Worker entry point. Returns when shutdown is requested or a queue
    /// disconnects.
    pub(crate) fn run(mut self, command_rx: &Receiver<Command>, silent: bool) {
        self.paused = !self.try_restore();

        if !silent {
            self.signal.start(SignalKind::CommandReceived);
        }

        self.update_shared();

        while !self.shutdown.load(Ordering::Relaxed) {
            let command = if self.should_pause() {
                // Nothing to decode; wait for the next command.
                match command_rx.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                }
            } else {
                command_rx.try_recv().ok()
            };

            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            if let Some(command) = command {
                self.handle_command(command);
            }

            let chunk = self.next_chunk();
            if self.chunk_tx.send(chunk).is_err() {
                break;
            }
        }

        debug!("transport worker exiting");
    }

    /// The pause decision: paused or album-less, unless a tone is running;
    /// always paused once shutdown is requested.
    fn should_pause(&self) -> bool {
        ((self.sequencer.is_none() || self.paused) && !self.signal.is_active())
            || self.shutdown.load(Ordering::Relaxed)
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::TogglePause => self.paused = !self.paused,

            Command::VolumeUp => self.set_volume((self.volume + VOLUME_STEP).min(VOLUME_MAX)),

            Command::VolumeDown => self.set_volume((self.volume - VOLUME_STEP).max(VOLUME_MIN)),

            Command::Previous => {
                self.reset_queued_audio();

                if let Some(sequencer) = self.sequencer.as_mut() {
                    let elapsed_ms =
                        sequencer.track_position() * 1000 / u64::from(SAMPLE_RATE);

                    if elapsed_ms < REWIND_TIMEOUT_MS {
                        sequencer.rewind_track();
                    } else {
                        sequencer.previous_track();
                    }
                }

                self.update_shared();
            }

            Command::Next => {
                self.reset_queued_audio();

                if let Some(sequencer) = self.sequencer.as_mut() {
                    sequencer.next_track();
                }

                self.update_shared();
            }

            Command::Rewind => {
                self.reset_queued_audio();

                if let Some(sequencer) = self.sequencer.as_mut() {
                    sequencer.rewind();
                }

                self.update_shared();
            }

            Command::Play(album) => {
                info!("switching playback to {album}");

                self.reset_queued_audio();
                self.play_album(&album);

                if !self.paused {
                    self.signal.start(SignalKind::CommandReceived);
                    self.update_shared();
                }
            }

            Command::SignalError => self.signal.start(SignalKind::Error),

            Command::DebugSetVoltage(millivolts) => {
                self.signal.start(SignalKind::CommandReceived);
                self.hooks.set_debug_voltage(millivolts);
            }

            Command::StartNetwork => {
                self.signal.start(SignalKind::CommandReceived);
                self.hooks.start_network();
            }

            Command::StopNetwork => {
                self.signal.start(SignalKind::CommandReceived);
                self.hooks.stop_network();
            }

            Command::Nop => {}
        }
    }

    /// Fill one chunk according to the current state. Tone output takes
    /// precedence; otherwise the sequencer streams, and whatever cannot be
    /// filled stays silent.
    fn next_chunk(&mut self) -> Chunk {
        let paused = self.should_pause();
        let mut chunk = Chunk::silent(paused, self.clear_on_resume);

        if paused {
            self.shared.lock().unwrap().playing = false;
            return chunk;
        }

        self.clear_on_resume = false;

        let mut produced = 0;
        while produced < CHUNK_FRAMES {
            if self.signal.is_active() {
                produced += self.signal.play(&mut chunk.samples[2 * produced..]);
            } else if !self.paused && self.sequencer.is_some() {
                let Some(sequencer) = self.sequencer.as_mut() else {
                    break;
                };

                produced += sequencer.decode(&mut chunk.samples[2 * produced..]);

                if sequencer.is_finished() {
                    // End of the catalog is not an error: park at the
                    // start of the album and wait for the next command.
                    sequencer.rewind();
                    self.paused = true;
                }
            } else {
                break;
            }
        }

        if self.volume != VOLUME_FULL {
            for sample in &mut chunk.samples {
                *sample = ((i32::from(*sample) * self.volume) / VOLUME_FULL) as i16;
            }
        }

        self.update_shared();

        chunk
    }

    /// Open (or resume) an album by name. On failure the player stays
    /// paused with no album and the error tone runs.
    fn play_album(&mut self, album: &str) {
        let same_album = self.shared.lock().unwrap().album.as_deref() == Some(album);

        if same_album && self.sequencer.is_some() {
            // A re-scan of the running album's tag resumes in place.
            self.paused = false;
        } else {
            match Sequencer::open(&self.config.album_dir(album), 0) {
                Ok(sequencer) => {
                    self.sequencer = Some(sequencer);
                    self.paused = false;
                }
                Err(e) => {
                    warn!("failed to open album {album}: {e}");
                    self.sequencer = None;
                    self.paused = true;
                }
            }
        }

        if self.paused {
            self.shared.lock().unwrap().album = None;
            self.signal.start(SignalKind::Error);
        } else {
            self.shared.lock().unwrap().album = Some(album.to_string());
            info!("playback switched to {album}");
        }
    }

    /// Discard chunks already queued for playback when skipping away from
    /// a track while paused, and request a device-buffer flush on resume,
    /// so stale audio never plays after the skip.
    fn reset_queued_audio(&mut self) {
        if self.paused {
            self.clear_on_resume = true;

            while self.chunk_rx.try_recv().is_ok() {}
        }
    }

    fn set_volume(&mut self, volume: i32) {
        self.volume = volume;
        self.shared.lock().unwrap().volume = volume;
    }

    /// Publish the externally visible snapshot.
    fn update_shared(&mut self) {
        let mut shared = self.shared.lock().unwrap();

        shared.playing = self.sequencer.is_some() && !self.paused;
        shared.volume = self.volume;

        match self.sequencer.as_ref() {
            Some(sequencer) => {
                shared.track = sequencer.track() as u32;
                shared.position = sequencer.seek_position();
            }
            None => {
                shared.track = 0;
                shared.position = 0;
            }
        }
    }

    /// Attempt to resume from the retained state record. Volume is always
    /// restored; playback resumes when the persisted album reopens, seeking
    /// back only if the persisted track was actually reached.
    fn try_restore(&mut self) -> bool {
        let Some(state) = self.store.load() else {
            return false;
        };

        self.set_volume(state.volume.clamp(VOLUME_MIN, VOLUME_MAX));

        if !state.has_album() {
            return false;
        }

        let dir = self.config.album_dir(&state.album);
        match Sequencer::open(&dir, state.track as usize) {
            Ok(mut sequencer) => {
                if sequencer.track() == state.track as usize {
                    sequencer.seek_to(state.position);
                }

                info!(
                    "resuming album {} at track {}",
                    state.album,
                    sequencer.track()
                );

                self.sequencer = Some(sequencer);
                self.shared.lock().unwrap().album = Some(state.album);

                true
            }
            Err(e) => {
                warn!("could not restore album {}: {e}", state.album);
                false
            }
        }
    }
}
