//! Public player facade
//!
//! Owns the two workers (transport and stream writer), the bounded queues
//! joining them, and the shared status snapshot. External collaborators
//! talk to the player only through the command enqueue API and the
//! read-only status accessors; the sleep controller additionally calls
//! [`prepare_sleep`](Player::prepare_sleep) so playback state survives a
//! power-down.

use crate::chunk::Chunk;
use crate::hooks::PlatformHooks;
use crate::sink::AudioSink;
use crate::transport::Transport;
use crate::writer::run_writer;
use crossbeam_channel::{bounded, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tonbox_core::config::{COMMAND_QUEUE_DEPTH, PLAYBACK_QUEUE_DEPTH};
use tonbox_core::{Command, PersistedState, PlayerConfig, PlayerStatus, StateStore};
use tracing::{debug, warn};

pub struct Player {
    config: PlayerConfig,
    store: StateStore,
    shared: Arc<Mutex<PlayerStatus>>,
    shutdown: Arc<AtomicBool>,

    command_tx: Option<Sender<Command>>,
    transport_handle: Option<JoinHandle<()>>,
    writer_handle: Option<JoinHandle<()>>,
}

impl Player {
    /// Build an idle player. Nothing runs until [`start`](Player::start).
    pub fn new(config: PlayerConfig) -> Self {
        let store = StateStore::new(&config.state_path);

        Self {
            config,
            store,
            shared: Arc::new(Mutex::new(PlayerStatus::default())),
            shutdown: Arc::new(AtomicBool::new(false)),
            command_tx: None,
            transport_handle: None,
            writer_handle: None,
        }
    }

    /// Spawn the transport and stream-writer workers.
    ///
    /// Playback state is restored from the retained record when possible;
    /// a successful restore resumes playing immediately. Unless `silent`,
    /// the acknowledgment tone marks the boot audibly.
    pub fn start(&mut self, sink: Box<dyn AudioSink>, hooks: Box<dyn PlatformHooks>, silent: bool) {
        if self.transport_handle.is_some() {
            warn!("player already started");
            return;
        }

        self.shutdown.store(false, Ordering::Relaxed);

        let (command_tx, command_rx) = bounded::<Command>(COMMAND_QUEUE_DEPTH);
        let (chunk_tx, chunk_rx) = bounded::<Chunk>(PLAYBACK_QUEUE_DEPTH);

        let transport = Transport::new(
            self.config.clone(),
            self.store.clone(),
            self.shared.clone(),
            chunk_tx,
            chunk_rx.clone(),
            self.shutdown.clone(),
            hooks,
        );

        let writer_shutdown = self.shutdown.clone();
        self.writer_handle = Some(std::thread::spawn(move || {
            run_writer(chunk_rx, sink, writer_shutdown);
        }));

        self.transport_handle = Some(std::thread::spawn(move || {
            transport.run(&command_rx, silent);
        }));

        self.command_tx = Some(command_tx);

        debug!("player started");
    }

    // ===== Command surface =====

    /// Enqueue a command, blocking briefly if the queue is full. Dropped
    /// with a log entry when the player is not running.
    pub fn enqueue(&self, command: Command) {
        match &self.command_tx {
            Some(tx) => {
                if tx.send(command).is_err() {
                    debug!("command dropped, transport is gone");
                }
            }
            None => debug!("command dropped, player not started"),
        }
    }

    pub fn play(&self, album: &str) {
        self.enqueue(Command::Play(album.to_string()));
    }

    pub fn toggle_pause(&self) {
        self.enqueue(Command::TogglePause);
    }

    pub fn volume_up(&self) {
        self.enqueue(Command::VolumeUp);
    }

    pub fn volume_down(&self) {
        self.enqueue(Command::VolumeDown);
    }

    pub fn previous(&self) {
        self.enqueue(Command::Previous);
    }

    pub fn next(&self) {
        self.enqueue(Command::Next);
    }

    pub fn rewind(&self) {
        self.enqueue(Command::Rewind);
    }

    pub fn signal_error(&self) {
        self.enqueue(Command::SignalError);
    }

    // ===== Status surface =====

    /// Consistent snapshot of the externally visible state.
    pub fn status(&self) -> PlayerStatus {
        self.shared.lock().unwrap().clone()
    }

    pub fn is_playing(&self) -> bool {
        self.status().playing
    }

    pub fn current_album(&self) -> Option<String> {
        self.status().album
    }

    pub fn current_track(&self) -> u32 {
        self.status().track
    }

    pub fn current_volume(&self) -> i32 {
        self.status().volume
    }

    // ===== Lifecycle =====

    /// Persist the playback state, then stop both workers. Called by the
    /// sleep controller right before powering down; the next boot resumes
    /// from the persisted record.
    pub fn prepare_sleep(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        let state = PersistedState::from_status(&self.status());
        if let Err(e) = self.store.save(&state) {
            warn!("could not persist playback state: {e}");
        }

        self.stop();
    }

    /// Cooperative shutdown without persisting: wake the transport, let
    /// both workers observe the flag and drain out, then join them.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        if let Some(tx) = &self.command_tx {
            // Wake a transport blocked on an empty command queue.
            tx.send(Command::Nop).ok();
        }

        if let Some(handle) = self.transport_handle.take() {
            handle.join().ok();
        }

        // The transport dropping its sender disconnects the chunk queue,
        // which is what terminates the writer.
        if let Some(handle) = self.writer_handle.take() {
            handle.join().ok();
        }

        self.command_tx = None;
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}
