//! Silence-trimming playback filter
//!
//! Optional filter for gapless-style transitions: silence runs at the
//! start and end of a track are dropped as long as they stay under a cap,
//! on the assumption that short runs are encoder or mastering padding.
//! Longer runs are treated as intentional silence and replayed in full
//! before the next audible sample.
//!
//! The filter is push/pull: feed frames with [`push`](SilenceTrimmer::push)
//! while [`needs_input`](SilenceTrimmer::needs_input) holds, drain with
//! [`next_sample`](SilenceTrimmer::next_sample), and call
//! [`end`](SilenceTrimmer::end) at the end of the stream so a trailing run
//! can be classified. Not wired into the default transport; integrators
//! can place it between the sequencer and the chunk fill.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    RecordingSilence,
    Playback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamPosition {
    Start,
    Within,
    End,
}

pub struct SilenceTrimmer {
    max_silence_start: u32,
    max_silence_end: u32,

    state: State,
    stream_position: StreamPosition,

    pending: Option<(i16, i16)>,
    zeroes: u32,
}

impl SilenceTrimmer {
    /// Caps are in frames; runs at or under the cap are trimmed.
    pub fn new(max_silence_start: u32, max_silence_end: u32) -> Self {
        Self {
            max_silence_start,
            max_silence_end,
            state: State::RecordingSilence,
            stream_position: StreamPosition::Start,
            pending: None,
            zeroes: 0,
        }
    }

    /// Forget all buffered state, ready for a new track.
    pub fn reset(&mut self) {
        self.state = State::RecordingSilence;
        self.stream_position = StreamPosition::Start;
        self.pending = None;
        self.zeroes = 0;
    }

    /// Mark the end of the input stream. A trailing silence run within the
    /// cap is discarded; a longer one will still be played out.
    pub fn end(&mut self) {
        let cap = if self.stream_position == StreamPosition::Start {
            // Nothing audible ever arrived; the whole track was silence.
            self.max_silence_start + self.max_silence_end
        } else {
            self.max_silence_end
        };

        if self.state == State::RecordingSilence && self.zeroes <= cap {
            self.zeroes = 0;
        }

        self.stream_position = StreamPosition::End;
        self.state = State::Playback;
    }

    /// Whether the filter wants another input frame before it can produce.
    pub fn needs_input(&self) -> bool {
        self.state == State::RecordingSilence
            || (self.zeroes == 0
                && self.pending.is_none()
                && self.stream_position != StreamPosition::End)
    }

    /// Feed one input frame.
    pub fn push(&mut self, left: i16, right: i16) {
        if self.stream_position == StreamPosition::End {
            return;
        }

        if left == 0 && right == 0 {
            self.zeroes += 1;
            self.state = State::RecordingSilence;
            return;
        }

        self.pending = Some((left, right));

        if self.state == State::RecordingSilence
            && self.stream_position == StreamPosition::Start
            && self.zeroes <= self.max_silence_start
        {
            self.zeroes = 0;
        }

        self.state = State::Playback;
        self.stream_position = StreamPosition::Within;
    }

    /// Pull one output frame, if one is ready.
    pub fn next_sample(&mut self) -> Option<(i16, i16)> {
        if self.state == State::RecordingSilence {
            return None;
        }

        if self.zeroes > 0 {
            self.zeroes -= 1;
            return Some((0, 0));
        }

        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run a frame sequence through the filter, with `end` called after
    /// the last input.
    fn filter(frames: &[(i16, i16)], start_cap: u32, end_cap: u32) -> Vec<(i16, i16)> {
        let mut trimmer = SilenceTrimmer::new(start_cap, end_cap);
        let mut out = Vec::new();
        let mut input = frames.iter();

        loop {
            while trimmer.needs_input() {
                match input.next() {
                    Some(&(l, r)) => trimmer.push(l, r),
                    None => {
                        trimmer.end();
                        break;
                    }
                }
            }

            match trimmer.next_sample() {
                Some(frame) => out.push(frame),
                None => {
                    if trimmer.stream_position == StreamPosition::End {
                        break;
                    }
                }
            }
        }

        out
    }

    #[test]
    fn short_leading_silence_is_trimmed() {
        let mut frames = vec![(0, 0); 10];
        frames.push((500, 500));
        frames.push((600, 600));

        assert_eq!(filter(&frames, 16, 16), vec![(500, 500), (600, 600)]);
    }

    #[test]
    fn long_leading_silence_is_kept() {
        let mut frames = vec![(0, 0); 20];
        frames.push((500, 500));

        let out = filter(&frames, 16, 16);
        assert_eq!(out.len(), 21);
        assert_eq!(out[20], (500, 500));
        assert!(out[..20].iter().all(|&f| f == (0, 0)));
    }

    #[test]
    fn short_trailing_silence_is_trimmed() {
        let mut frames = vec![(500, 500); 4];
        frames.extend(vec![(0, 0); 10]);

        assert_eq!(filter(&frames, 16, 16), vec![(500, 500); 4]);
    }

    #[test]
    fn long_trailing_silence_is_kept() {
        let mut frames = vec![(500, 500); 4];
        frames.extend(vec![(0, 0); 20]);

        let out = filter(&frames, 16, 16);
        assert_eq!(out.len(), 24);
    }

    #[test]
    fn interior_silence_is_replayed() {
        // Interior runs use the same recording mechanism, but only
        // start/end runs are forgiven; a short run between audible
        // samples is replayed in full.
        let mut frames = vec![(500, 500); 2];
        frames.extend(vec![(0, 0); 5]);
        frames.extend(vec![(700, 700); 2]);

        let out = filter(&frames, 16, 16);
        assert_eq!(out.len(), 9);
        assert_eq!(out[2], (0, 0));
        assert_eq!(out[7], (700, 700));
    }

    #[test]
    fn all_silent_track_within_caps_collapses() {
        let frames = vec![(0, 0); 20];

        assert_eq!(filter(&frames, 16, 16), vec![]);
    }

    #[test]
    fn channels_are_preserved_independently() {
        let frames = vec![(100, -100), (0, 1)];

        assert_eq!(filter(&frames, 4, 4), vec![(100, -100), (0, 1)]);
    }

    #[test]
    fn reset_clears_buffered_silence() {
        let mut trimmer = SilenceTrimmer::new(4, 4);
        trimmer.push(0, 0);
        trimmer.push(0, 0);

        trimmer.reset();
        trimmer.push(900, 900);

        assert_eq!(trimmer.next_sample(), Some((900, 900)));
        assert_eq!(trimmer.next_sample(), None);
    }
}
