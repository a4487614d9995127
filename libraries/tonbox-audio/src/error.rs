//! Error types for decoding and sequencing

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the decoding layer.
#[derive(Debug, Error)]
pub enum AudioError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The container format could not be recognized
    #[error("unrecognized stream in {path}: {reason}")]
    Probe {
        /// Offending file
        path: PathBuf,
        /// Probe failure detail
        reason: String,
    },

    /// The file contains no decodable audio track
    #[error("no audio track in {0}")]
    NoAudioTrack(PathBuf),

    /// A decoder could not be constructed for the stream's codec
    #[error("unsupported codec in {path}: {reason}")]
    UnsupportedCodec {
        /// Offending file
        path: PathBuf,
        /// Codec failure detail
        reason: String,
    },

    /// The directory holds no playable tracks
    #[error("no playable tracks in {0}")]
    NoTracks(PathBuf),
}

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, AudioError>;
