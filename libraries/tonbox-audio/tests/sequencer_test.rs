//! Sequencer integration tests
//!
//! Exercise catalog + decoder composition against real files on disk:
//! cross-track decoding, navigation and wrap semantics, unplayable-track
//! skipping and best-effort seeking.

use std::path::{Path, PathBuf};
use tonbox_audio::Sequencer;
use tonbox_core::config::SAMPLE_RATE;

// ===== Test Helpers =====

/// Write a stereo WAV whose every frame carries `value` on both channels.
fn write_track(dir: &Path, name: &str, value: i16, frames: usize) -> PathBuf {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let path = dir.join(name);
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..frames {
        writer.write_sample(value).unwrap();
        writer.write_sample(value).unwrap();
    }
    writer.finalize().unwrap();

    path
}

/// Three-track album: 1.wav / 2.wav / 3.wav with distinct sample values.
fn make_album(dir: &Path, frames: usize) {
    write_track(dir, "1.wav", 1000, frames);
    write_track(dir, "2.wav", 2000, frames);
    write_track(dir, "3.wav", 3000, frames);
}

// ===== Open =====

#[test]
fn open_empty_directory_fails() {
    let dir = tempfile::tempdir().unwrap();

    assert!(Sequencer::open(dir.path(), 0).is_err());
}

#[test]
fn open_missing_directory_fails() {
    assert!(Sequencer::open(Path::new("/nonexistent/album"), 0).is_err());
}

#[test]
fn open_starts_at_requested_track() {
    let dir = tempfile::tempdir().unwrap();
    make_album(dir.path(), 64);

    let sequencer = Sequencer::open(dir.path(), 1).unwrap();
    assert_eq!(sequencer.track(), 1);
    assert_eq!(sequencer.len(), 3);
}

#[test]
fn out_of_range_start_track_falls_back_to_first() {
    let dir = tempfile::tempdir().unwrap();
    make_album(dir.path(), 64);

    let sequencer = Sequencer::open(dir.path(), 17).unwrap();
    assert_eq!(sequencer.track(), 0);
}

// ===== Decode =====

#[test]
fn decode_crosses_track_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    write_track(dir.path(), "1.wav", 1000, 300);
    write_track(dir.path(), "2.wav", 2000, 300);

    let mut sequencer = Sequencer::open(dir.path(), 0).unwrap();

    let mut buffer = vec![0i16; 2 * 1024];
    let produced = sequencer.decode(&mut buffer);

    // Both tracks fit into one call; the shortfall marks end of catalog.
    assert_eq!(produced, 600);
    assert!(sequencer.is_finished());

    assert!(buffer[..2 * 300].iter().all(|&s| s == 1000));
    assert!(buffer[2 * 300..2 * 600].iter().all(|&s| s == 2000));
}

#[test]
fn decode_never_exceeds_request() {
    let dir = tempfile::tempdir().unwrap();
    make_album(dir.path(), 200);

    let mut sequencer = Sequencer::open(dir.path(), 0).unwrap();

    let mut buffer = vec![0i16; 2 * 128];
    loop {
        let produced = sequencer.decode(&mut buffer);
        assert!(produced <= 128);

        // A short read happens exactly once, at end of catalog.
        if produced < 128 {
            assert!(sequencer.is_finished());
            break;
        }
    }
}

#[test]
fn tracks_play_in_catalog_order() {
    let dir = tempfile::tempdir().unwrap();
    // Deliberately unsorted creation order; numeric-prefix sort applies.
    write_track(dir.path(), "10.wav", 10, 50);
    write_track(dir.path(), "2.wav", 2, 50);
    write_track(dir.path(), "1.wav", 1, 50);

    let mut sequencer = Sequencer::open(dir.path(), 0).unwrap();

    let mut buffer = vec![0i16; 2 * 150];
    let produced = sequencer.decode(&mut buffer);

    assert_eq!(produced, 150);
    assert_eq!(buffer[0], 1);
    assert_eq!(buffer[2 * 50], 2);
    assert_eq!(buffer[2 * 100], 10);
}

#[test]
fn unplayable_track_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_track(dir.path(), "1.wav", 1000, 50);
    // A catalog entry the decoder cannot open.
    std::fs::File::create(dir.path().join("2.mp3")).unwrap();
    write_track(dir.path(), "3.wav", 3000, 50);

    let mut sequencer = Sequencer::open(dir.path(), 0).unwrap();
    assert_eq!(sequencer.len(), 3);

    let mut buffer = vec![0i16; 2 * 200];
    let produced = sequencer.decode(&mut buffer);

    assert_eq!(produced, 100);
    assert!(buffer[..2 * 50].iter().all(|&s| s == 1000));
    assert!(buffer[2 * 50..2 * 100].iter().all(|&s| s == 3000));
    assert!(sequencer.is_finished());
}

// ===== Navigation =====

#[test]
fn next_track_wraps_after_the_last() {
    let dir = tempfile::tempdir().unwrap();
    make_album(dir.path(), 32);

    let mut sequencer = Sequencer::open(dir.path(), 0).unwrap();

    sequencer.next_track();
    assert_eq!(sequencer.track(), 1);
    sequencer.next_track();
    assert_eq!(sequencer.track(), 2);
    sequencer.next_track();
    assert_eq!(sequencer.track(), 0);
}

#[test]
fn next_track_called_len_times_returns_to_start() {
    let dir = tempfile::tempdir().unwrap();
    make_album(dir.path(), 32);

    let mut sequencer = Sequencer::open(dir.path(), 0).unwrap();

    for _ in 0..sequencer.len() {
        sequencer.next_track();
    }

    assert_eq!(sequencer.track(), 0);
}

#[test]
fn previous_track_saturates_at_the_first() {
    let dir = tempfile::tempdir().unwrap();
    make_album(dir.path(), 32);

    let mut sequencer = Sequencer::open(dir.path(), 1).unwrap();

    sequencer.previous_track();
    assert_eq!(sequencer.track(), 0);
    sequencer.previous_track();
    assert_eq!(sequencer.track(), 0);
}

#[test]
fn go_to_track_rejects_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    make_album(dir.path(), 32);

    let mut sequencer = Sequencer::open(dir.path(), 0).unwrap();

    assert!(sequencer.go_to_track(2));
    assert_eq!(sequencer.track(), 2);
    assert!(!sequencer.go_to_track(3));
    assert_eq!(sequencer.track(), 2);
}

#[test]
fn rewind_track_restarts_the_current_track() {
    let dir = tempfile::tempdir().unwrap();
    make_album(dir.path(), 128);

    let mut sequencer = Sequencer::open(dir.path(), 1).unwrap();

    let mut buffer = vec![0i16; 2 * 64];
    sequencer.decode(&mut buffer);
    assert_eq!(sequencer.track_position(), 64);

    sequencer.rewind_track();
    assert_eq!(sequencer.track(), 1);
    assert_eq!(sequencer.track_position(), 0);

    sequencer.decode(&mut buffer);
    assert!(buffer.iter().all(|&s| s == 2000));
}

#[test]
fn rewind_after_finish_restarts_the_album() {
    let dir = tempfile::tempdir().unwrap();
    make_album(dir.path(), 32);

    let mut sequencer = Sequencer::open(dir.path(), 0).unwrap();

    let mut buffer = vec![0i16; 2 * 256];
    while sequencer.decode(&mut buffer) == 256 {}
    assert!(sequencer.is_finished());

    sequencer.rewind();
    assert!(!sequencer.is_finished());
    assert_eq!(sequencer.track(), 0);

    let produced = sequencer.decode(&mut buffer[..2 * 16]);
    assert_eq!(produced, 16);
    assert!(buffer[..2 * 16].iter().all(|&s| s == 1000));
}

// ===== Seek =====

#[test]
fn seek_to_zero_restarts_the_track() {
    let dir = tempfile::tempdir().unwrap();
    make_album(dir.path(), 256);

    let mut sequencer = Sequencer::open(dir.path(), 0).unwrap();

    let mut buffer = vec![0i16; 2 * 128];
    sequencer.decode(&mut buffer);

    sequencer.seek_to(0);
    assert_eq!(sequencer.track_position(), 0);

    let produced = sequencer.decode(&mut buffer);
    assert_eq!(produced, 128);
    assert!(buffer.iter().all(|&s| s == 1000));
}

#[test]
fn seek_is_best_effort_and_keeps_playing() {
    let dir = tempfile::tempdir().unwrap();
    make_album(dir.path(), 2048);

    let mut sequencer = Sequencer::open(dir.path(), 0).unwrap();

    let mut buffer = vec![0i16; 2 * 2048];
    sequencer.decode(&mut buffer);
    let resume_at = sequencer.seek_position();

    sequencer.seek_to(resume_at);

    // Wherever the reader resynchronized, the stream must keep producing
    // the current track's samples.
    let produced = sequencer.decode(&mut buffer[..2 * 64]);
    assert_eq!(produced, 64);
    assert!(buffer[..2 * 64].iter().all(|&s| s == 1000));
}
