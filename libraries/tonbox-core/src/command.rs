//! Transport command set
//!
//! External collaborators (button handler, tag-to-command mapping, network
//! endpoint, sleep controller) drive the player exclusively by enqueueing
//! these values. Only `Play` carries an owned payload.

/// A command delivered to the audio transport.
///
/// Producers may enqueue from any thread; the transport is the sole
/// consumer. Cloning copies only the active variant's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Flip the pause state.
    TogglePause,

    /// Raise the volume by one step, saturating at the maximum.
    VolumeUp,

    /// Lower the volume by one step, saturating at the minimum.
    VolumeDown,

    /// Restart the current track or move to the prior one, depending on
    /// how far into the track playback is.
    Previous,

    /// Advance to the next track, wrapping at the end of the album.
    Next,

    /// Restart the current album from its first track.
    Rewind,

    /// Switch playback to the named album.
    Play(String),

    /// Play the error tone.
    SignalError,

    /// Override the measured battery voltage (millivolts); debug aid.
    DebugSetVoltage(u32),

    /// Bring up the status network interface.
    StartNetwork,

    /// Take down the status network interface.
    StopNetwork,

    /// No effect. Used to wake a transport blocked on an empty queue.
    Nop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_copies_play_payload() {
        let cmd = Command::Play("lullabies".to_string());
        let copy = cmd.clone();

        assert_eq!(copy, Command::Play("lullabies".to_string()));
        // Original unaffected by the clone
        assert_eq!(cmd, copy);
    }

    #[test]
    fn plain_variants_compare_by_tag() {
        assert_eq!(Command::Next, Command::Next);
        assert_ne!(Command::Next, Command::Previous);
        assert_ne!(
            Command::Play("a".to_string()),
            Command::Play("b".to_string())
        );
    }
}
