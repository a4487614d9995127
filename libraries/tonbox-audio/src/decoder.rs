//! Streaming audio decoder built on symphonia
//!
//! Decodes one compressed file at a time into interleaved stereo i16, a
//! caller-sized slice per call. The session tracks the underlying byte
//! offset (for persistence/resume) alongside the monotonically increasing
//! decoded-frame count (for elapsed time).
//!
//! Error policy: a bad compressed frame is skipped and decoding continues;
//! an unrecoverable stream error or end-of-file marks the session finished,
//! after which `decode` returns 0. Callers decide what finishing means
//! (advance to the next track, pause, ...).

use crate::error::{AudioError, Result};
use crate::source::ByteCountingSource;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info};

use tonbox_core::config::{MAX_LEAD_IN_FRAMES, SEEK_BACKOFF_BYTES};

/// Decode session state for one open file.
struct Session {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,

    /// PCM of the most recently decoded packet, interleaved in the source
    /// channel layout.
    sample_buf: Option<SampleBuffer<i16>>,
    block_frames: usize,
    block_channels: usize,
    cursor: usize,

    /// Frames handed out since the session was (re)created.
    frames_emitted: u64,

    lead_in: bool,
    lead_in_frames: u32,
    finished: bool,
}

/// One-file-at-a-time streaming decoder.
pub struct StreamDecoder {
    session: Option<Session>,
    path: Option<PathBuf>,

    /// Absolute byte offset of the format reader in the current file,
    /// shared with the media source.
    bytes_consumed: Arc<AtomicU64>,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self {
            session: None,
            path: None,
            bytes_consumed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Open a file for decoding, replacing any previous session.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        self.close();
        self.open_at(path, 0)?;
        self.path = Some(path.to_path_buf());

        info!("now playing {}", path.display());

        Ok(())
    }

    /// Decode into `buffer` (interleaved stereo), returning the number of
    /// frames produced. Returns less than `buffer.len() / 2` exactly when
    /// the track is exhausted or decoding failed; from then on the session
    /// is finished and further calls return 0.
    pub fn decode(&mut self, buffer: &mut [i16]) -> usize {
        let max_frames = buffer.len() / 2;

        if self.is_finished() {
            return 0;
        }

        let mut produced = 0;

        while produced < max_frames {
            let Some((left, right)) = self.next_raw_frame() else {
                break;
            };

            if let Some(session) = self.session.as_mut() {
                // Encoder padding: swallow leading all-zero frames, but only
                // up to a bound so genuinely silent openings survive.
                if session.lead_in
                    && left == 0
                    && right == 0
                    && session.lead_in_frames < MAX_LEAD_IN_FRAMES
                {
                    session.lead_in_frames += 1;
                    continue;
                }

                session.lead_in = false;
                session.frames_emitted += 1;
            }

            buffer[2 * produced] = left;
            buffer[2 * produced + 1] = right;
            produced += 1;
        }

        if produced < max_frames {
            if let Some(session) = self.session.as_mut() {
                session.finished = true;
            }

            debug!("decoding finished after {} frames", self.position());
        }

        produced
    }

    /// True once the current session has delivered its last frame (or no
    /// session is open).
    pub fn is_finished(&self) -> bool {
        self.session.as_ref().map_or(true, |s| s.finished)
    }

    /// Restart the current file from the beginning.
    pub fn rewind(&mut self) {
        self.seek_to(0);
    }

    /// Reposition to approximately the given byte offset.
    ///
    /// The stream is reopened `SEEK_BACKOFF_BYTES` before the requested
    /// offset so the format reader resynchronizes on a frame boundary;
    /// the resulting position is best-effort, not byte-exact. If the
    /// mid-stream probe fails, playback restarts from the beginning of
    /// the track.
    pub fn seek_to(&mut self, byte_offset: u64) {
        let Some(path) = self.path.clone() else {
            return;
        };

        let target = byte_offset.saturating_sub(SEEK_BACKOFF_BYTES);

        if self.open_at(&path, target).is_ok() {
            return;
        }

        if target == 0 || self.open_at(&path, 0).is_err() {
            debug!("seek in {} failed, session closed", path.display());
            self.session = None;
        }
    }

    /// Monotonic count of frames decoded since the session was created or
    /// last repositioned. This is the time position, not the byte position.
    pub fn position(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.frames_emitted)
    }

    /// Byte offset consumed from the underlying file, coarse to the
    /// reader's read-ahead granularity. Suitable for persistence/resume.
    pub fn seek_position(&self) -> u64 {
        if self.session.is_some() {
            self.bytes_consumed.load(Ordering::Relaxed)
        } else {
            0
        }
    }

    /// Drop the current session, if any.
    pub fn close(&mut self) {
        if self.session.take().is_some() {
            debug!(
                "decoder closed after {} bytes",
                self.bytes_consumed.load(Ordering::Relaxed)
            );
        }

        self.path = None;
        self.bytes_consumed.store(0, Ordering::Relaxed);
    }

    /// Build a fresh session reading from `offset` in `path`.
    fn open_at(&mut self, path: &Path, offset: u64) -> Result<()> {
        self.session = None;

        let mut file = File::open(path)?;
        if offset > 0 {
            file.seek(SeekFrom::Start(offset))?;
        }

        let source = ByteCountingSource::new(file, self.bytes_consumed.clone(), offset);
        let stream = MediaSourceStream::new(Box::new(source), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                stream,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::Probe {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::NoAudioTrack(path.to_path_buf()))?;

        let track_id = track.id;

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::UnsupportedCodec {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        self.session = Some(Session {
            format,
            decoder,
            track_id,
            sample_buf: None,
            block_frames: 0,
            block_channels: 2,
            cursor: 0,
            frames_emitted: 0,
            lead_in: true,
            lead_in_frames: 0,
            finished: false,
        });

        debug!("decoder initialized for {} at offset {}", path.display(), offset);

        Ok(())
    }

    /// Pull one interleaved frame from the current block, refilling the
    /// block from the packet stream as needed. Mono sources are duplicated
    /// to stereo; channels beyond the first two are ignored.
    fn next_raw_frame(&mut self) -> Option<(i16, i16)> {
        let exhausted = match self.session.as_ref() {
            Some(s) => s.cursor >= s.block_frames,
            None => return None,
        };

        if exhausted && !self.next_block() {
            return None;
        }

        let session = self.session.as_mut()?;
        let buf = session.sample_buf.as_ref()?;
        let samples = buf.samples();

        let index = session.cursor * session.block_channels;
        let left = samples[index];
        let right = if session.block_channels > 1 {
            samples[index + 1]
        } else {
            left
        };

        session.cursor += 1;

        Some((left, right))
    }

    /// Decode compressed packets until one yields PCM, skipping recoverable
    /// frame errors. Returns false at end of stream or on an unrecoverable
    /// error, marking the session finished.
    fn next_block(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        if session.finished {
            return false;
        }

        loop {
            let packet = match session.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    session.finished = true;
                    return false;
                }
                Err(SymphoniaError::ResetRequired) => {
                    session.decoder.reset();
                    continue;
                }
                Err(e) => {
                    debug!("stream unreadable, treating as end of track: {e}");
                    session.finished = true;
                    return false;
                }
            };

            if packet.track_id() != session.track_id {
                continue;
            }

            let decoded = match session.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    // Recoverable: drop the frame, resync on the next one.
                    debug!("skipping bad frame: {e}");
                    continue;
                }
                Err(e) => {
                    debug!("decoding failed, treating as end of track: {e}");
                    session.finished = true;
                    return false;
                }
            };

            if decoded.frames() == 0 {
                continue;
            }

            let spec = *decoded.spec();
            let channels = spec.channels.count().max(1);
            let needed = decoded.capacity() * channels;

            if session
                .sample_buf
                .as_ref()
                .map_or(true, |b| b.capacity() < needed)
            {
                session.sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
            }

            if let Some(buf) = session.sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                session.block_channels = channels;
                session.block_frames = buf.len() / channels;
                session.cursor = 0;

                return true;
            }

            return false;
        }
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StreamDecoder {
    fn drop(&mut self) {
        self.close();
    }
}
