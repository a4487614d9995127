//! Stream writer worker
//!
//! The second half of the producer/consumer pipeline: blocks on the chunk
//! queue and performs the blocking write to the audio peripheral. Pause
//! edges toggle the output clock; a resume flagged with `clear_on_resume`
//! zeroes the device buffer first so audio queued before a skip never
//! plays.
//!
//! The worker keeps draining until the queue disconnects (the transport
//! going away), so a transport blocked on a full queue can always make
//! progress during shutdown. Once the shutdown flag is up it stops
//! writing and just discards what is left.

use crate::chunk::Chunk;
use crate::sink::AudioSink;
use crossbeam_channel::Receiver;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

pub(crate) fn run_writer(
    chunk_rx: Receiver<Chunk>,
    mut sink: Box<dyn AudioSink>,
    shutdown: Arc<AtomicBool>,
) {
    let mut was_paused = true;

    while let Ok(chunk) = chunk_rx.recv() {
        if shutdown.load(Ordering::Relaxed) {
            continue;
        }

        if chunk.paused && !was_paused {
            sink.stop();
        }

        if !chunk.paused && was_paused {
            if chunk.clear_on_resume {
                sink.clear();
            }
            sink.start();
        }

        was_paused = chunk.paused;

        if !chunk.paused {
            if let Err(e) = sink.write(&chunk.samples) {
                warn!("audio sink write failed: {e}");
            }
        }
    }

    sink.stop();

    debug!("stream writer exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum SinkEvent {
        Start,
        Stop,
        Clear,
        Write(usize),
    }

    pub(crate) struct RecordingSink(pub(crate) Arc<Mutex<Vec<SinkEvent>>>);

    impl AudioSink for RecordingSink {
        fn start(&mut self) {
            self.0.lock().unwrap().push(SinkEvent::Start);
        }

        fn stop(&mut self) {
            self.0.lock().unwrap().push(SinkEvent::Stop);
        }

        fn clear(&mut self) {
            self.0.lock().unwrap().push(SinkEvent::Clear);
        }

        fn write(&mut self, samples: &[i16]) -> std::io::Result<()> {
            self.0.lock().unwrap().push(SinkEvent::Write(samples.len()));
            Ok(())
        }
    }

    fn run_with_chunks(chunks: Vec<Chunk>) -> Vec<SinkEvent> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Box::new(RecordingSink(events.clone()));

        let (tx, rx) = bounded(8);
        for chunk in chunks {
            tx.send(chunk).unwrap();
        }
        drop(tx);

        run_writer(rx, sink, Arc::new(AtomicBool::new(false)));

        Arc::try_unwrap(events).unwrap().into_inner().unwrap()
    }

    #[test]
    fn first_unpaused_chunk_starts_the_clock() {
        let events = run_with_chunks(vec![Chunk::silent(false, false)]);

        assert_eq!(
            events,
            vec![
                SinkEvent::Start,
                SinkEvent::Write(tonbox_core::config::CHUNK_SAMPLES),
                SinkEvent::Stop,
            ]
        );
    }

    #[test]
    fn pause_edge_stops_and_resume_restarts() {
        let events = run_with_chunks(vec![
            Chunk::silent(false, false),
            Chunk::silent(true, false),
            Chunk::silent(true, false),
            Chunk::silent(false, false),
        ]);

        let transitions: Vec<&SinkEvent> = events
            .iter()
            .filter(|e| !matches!(e, SinkEvent::Write(_)))
            .collect();

        // One stop for the pause edge, one start per resume edge, one
        // final stop on disconnect; repeated paused chunks do nothing.
        assert_eq!(
            transitions,
            vec![
                &SinkEvent::Start,
                &SinkEvent::Stop,
                &SinkEvent::Start,
                &SinkEvent::Stop,
            ]
        );
    }

    #[test]
    fn flagged_resume_clears_the_device_buffer_first() {
        let events = run_with_chunks(vec![
            Chunk::silent(false, false),
            Chunk::silent(true, false),
            Chunk::silent(false, true),
        ]);

        let clear_at = events
            .iter()
            .position(|e| *e == SinkEvent::Clear)
            .expect("clear event");
        assert_eq!(events[clear_at + 1], SinkEvent::Start);
    }

    #[test]
    fn paused_chunks_write_nothing() {
        let events = run_with_chunks(vec![
            Chunk::silent(true, false),
            Chunk::silent(true, false),
        ]);

        assert!(events.iter().all(|e| !matches!(e, SinkEvent::Write(_))));
    }

    #[test]
    fn drains_exactly_one_chunk_per_iteration() {
        let chunks = vec![Chunk::silent(false, false); 5];
        let events = run_with_chunks(chunks);

        let writes = events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Write(_)))
            .count();
        assert_eq!(writes, 5);
    }

    #[test]
    fn shutdown_discards_remaining_chunks() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Box::new(RecordingSink(events.clone()));

        let (tx, rx) = bounded(8);
        for _ in 0..4 {
            tx.send(Chunk::silent(false, false)).unwrap();
        }
        drop(tx);

        run_writer(rx, sink, Arc::new(AtomicBool::new(true)));

        let events = Arc::try_unwrap(events).unwrap().into_inner().unwrap();
        assert_eq!(events, vec![SinkEvent::Stop]);
    }
}
