//! Byte-position-aware media source
//!
//! The persistence layer stores a plain byte offset per track, so the
//! decoder needs to know how far into the file the format reader has
//! consumed. This wrapper counts the absolute file offset as symphonia
//! reads and seeks through it. The reported position is coarse (it moves
//! in read-ahead-buffer steps), which is all resume needs.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use symphonia::core::io::MediaSource;

pub(crate) struct ByteCountingSource {
    inner: File,
    position: Arc<AtomicU64>,
    byte_len: Option<u64>,
}

impl ByteCountingSource {
    /// Wrap a file whose cursor currently sits at `start_offset`.
    pub(crate) fn new(inner: File, position: Arc<AtomicU64>, start_offset: u64) -> Self {
        let byte_len = inner.metadata().ok().map(|m| m.len());
        position.store(start_offset, Ordering::Relaxed);

        Self {
            inner,
            position,
            byte_len,
        }
    }
}

impl Read for ByteCountingSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position.fetch_add(n as u64, Ordering::Relaxed);

        Ok(n)
    }
}

impl Seek for ByteCountingSource {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let new_pos = self.inner.seek(pos)?;
        self.position.store(new_pos, Ordering::Relaxed);

        Ok(new_pos)
    }
}

impl MediaSource for ByteCountingSource {
    fn is_seekable(&self) -> bool {
        true
    }

    fn byte_len(&self) -> Option<u64> {
        self.byte_len
    }
}
