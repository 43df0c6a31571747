//! Byte sources with controlled delivery.
//!
//! Each source implements [`Read`] and hands out data in the chunk sizes a
//! test asks for, so reconstruction can be checked against every way a
//! transport might split a stream.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::sync::{Arc, Mutex};

/// Serves a fixed list of chunks, at most one chunk per `read` call.
///
/// A caller buffer smaller than the current chunk receives its prefix and
/// the rest is served on the following call.
#[derive(Debug, Clone, Default)]
pub struct ChunkedSource {
    chunks: VecDeque<Vec<u8>>,
    reads: usize,
}

impl ChunkedSource {
    /// Builds a source from explicit chunks. Empty chunks are dropped.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self {
            chunks: chunks.into_iter().filter(|c| !c.is_empty()).collect(),
            reads: 0,
        }
    }

    /// The whole stream as a single chunk.
    pub fn whole(bytes: &[u8]) -> Self {
        Self::from_chunks([bytes.to_vec()])
    }

    /// One byte per read.
    pub fn one_byte_at_a_time(bytes: &[u8]) -> Self {
        Self::from_chunks(bytes.iter().map(|b| vec![*b]))
    }

    /// Splits at the given offsets. Offsets past the end are ignored.
    pub fn split_at(bytes: &[u8], points: &[usize]) -> Self {
        let mut points: Vec<usize> = points.iter().copied().filter(|p| *p < bytes.len()).collect();
        points.sort_unstable();
        points.dedup();

        let mut chunks = Vec::with_capacity(points.len() + 1);
        let mut start = 0;
        for point in points {
            chunks.push(bytes[start..point].to_vec());
            start = point;
        }
        chunks.push(bytes[start..].to_vec());
        Self::from_chunks(chunks)
    }

    /// Splits into consecutive chunks of the given sizes, cycling through
    /// `sizes` until the stream is exhausted. Zero sizes count as one.
    pub fn with_sizes(bytes: &[u8], sizes: &[usize]) -> Self {
        if sizes.is_empty() {
            return Self::whole(bytes);
        }
        let mut chunks = Vec::new();
        let mut rest = bytes;
        for size in sizes.iter().cycle() {
            if rest.is_empty() {
                break;
            }
            let (head, tail) = rest.split_at((*size).max(1).min(rest.len()));
            chunks.push(head.to_vec());
            rest = tail;
        }
        Self::from_chunks(chunks)
    }

    /// Bytes not yet served.
    pub fn remaining(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Number of `read` calls that returned data.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Read for ChunkedSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let Some(front) = self.chunks.front_mut() else {
            return Ok(0);
        };
        let n = front.len().min(buf.len());
        buf[..n].copy_from_slice(&front[..n]);
        if n == front.len() {
            self.chunks.pop_front();
        } else {
            front.drain(..n);
        }
        self.reads += 1;
        Ok(n)
    }
}

#[derive(Debug, Default)]
struct Pipe {
    pending: VecDeque<Vec<u8>>,
    closed: bool,
}

/// Read half of an in-memory pipe.
///
/// Returns [`io::ErrorKind::WouldBlock`] while the pipe is open and empty,
/// and end of stream once the writer is closed and drained.
#[derive(Debug, Clone)]
pub struct PipeSource {
    inner: Arc<Mutex<Pipe>>,
}

/// Write half of an in-memory pipe.
#[derive(Debug, Clone)]
pub struct PipeWriter {
    inner: Arc<Mutex<Pipe>>,
}

/// Creates a connected pipe.
pub fn pipe() -> (PipeWriter, PipeSource) {
    let inner = Arc::new(Mutex::new(Pipe::default()));
    (
        PipeWriter {
            inner: Arc::clone(&inner),
        },
        PipeSource { inner },
    )
}

impl PipeWriter {
    /// Queues `bytes` as one chunk.
    pub fn push(&self, bytes: &[u8]) {
        let mut pipe = self.inner.lock().expect("pipe lock poisoned");
        assert!(!pipe.closed, "push after close");
        if !bytes.is_empty() {
            pipe.pending.push_back(bytes.to_vec());
        }
    }

    /// Marks the end of the stream.
    pub fn close(&self) {
        self.inner.lock().expect("pipe lock poisoned").closed = true;
    }
}

impl Read for PipeSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut pipe = self.inner.lock().expect("pipe lock poisoned");
        let Some(front) = pipe.pending.front_mut() else {
            return if pipe.closed {
                Ok(0)
            } else {
                Err(io::ErrorKind::WouldBlock.into())
            };
        };
        let n = front.len().min(buf.len());
        buf[..n].copy_from_slice(&front[..n]);
        if n == front.len() {
            pipe.pending.pop_front();
        } else {
            front.drain(..n);
        }
        Ok(n)
    }
}

/// Serves its data, then fails with a non-retryable error.
#[derive(Debug)]
pub struct FailingSource {
    data: ChunkedSource,
    kind: io::ErrorKind,
}

impl FailingSource {
    /// Fails with `kind` once `data` is exhausted.
    pub fn new(data: ChunkedSource, kind: io::ErrorKind) -> Self {
        Self { data, kind }
    }

    /// Fails with a connection reset after `bytes`.
    pub fn reset_after(bytes: &[u8]) -> Self {
        Self::new(ChunkedSource::whole(bytes), io::ErrorKind::ConnectionReset)
    }
}

impl Read for FailingSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::new(self.kind, "source failed")),
            n => Ok(n),
        }
    }
}

/// Returns [`io::ErrorKind::Interrupted`] before every successful read.
#[derive(Debug)]
pub struct InterruptingSource<R> {
    inner: R,
    interrupt_next: bool,
    interruptions: usize,
}

impl<R> InterruptingSource<R> {
    /// Wraps `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            interrupt_next: true,
            interruptions: 0,
        }
    }

    /// Number of interruptions raised so far.
    pub fn interruptions(&self) -> usize {
        self.interruptions
    }
}

impl<R: Read> Read for InterruptingSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt_next {
            self.interrupt_next = false;
            self.interruptions += 1;
            return Err(io::ErrorKind::Interrupted.into());
        }
        self.interrupt_next = true;
        self.inner.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(source: &mut impl Read) -> Vec<Vec<u8>> {
        let mut buf = [0u8; 64];
        let mut reads = Vec::new();
        loop {
            match source.read(&mut buf) {
                Ok(0) => return reads,
                Ok(n) => reads.push(buf[..n].to_vec()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    }

    #[test]
    fn split_at_orders_and_dedups_points() {
        let mut source = ChunkedSource::split_at(&[1, 2, 3, 4, 5], &[3, 1, 3, 9]);
        assert_eq!(drain(&mut source), vec![vec![1], vec![2, 3], vec![4, 5]]);
    }

    #[test]
    fn with_sizes_cycles() {
        let mut source = ChunkedSource::with_sizes(&[1, 2, 3, 4, 5], &[2, 1]);
        assert_eq!(drain(&mut source), vec![vec![1, 2], vec![3], vec![4, 5]]);
    }

    #[test]
    fn small_buffer_gets_prefix() {
        let mut source = ChunkedSource::whole(&[1, 2, 3]);
        let mut buf = [0u8; 2];
        assert_eq!(source.read(&mut buf).unwrap(), 2);
        assert_eq!(source.remaining(), 1);
        assert_eq!(source.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 3);
        assert_eq!(source.reads(), 2);
    }

    #[test]
    fn pipe_blocks_until_closed() {
        let (writer, mut source) = pipe();
        let mut buf = [0u8; 8];
        let err = source.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

        writer.push(&[7, 8]);
        assert_eq!(source.read(&mut buf).unwrap(), 2);

        writer.close();
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn failing_source_errors_after_data() {
        let mut source = FailingSource::reset_after(&[1]);
        let mut buf = [0u8; 4];
        assert_eq!(source.read(&mut buf).unwrap(), 1);
        let err = source.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }

    #[test]
    fn interrupting_source_alternates() {
        let mut source = InterruptingSource::new(ChunkedSource::one_byte_at_a_time(&[1, 2]));
        assert_eq!(drain(&mut source), vec![vec![1], vec![2]]);
        assert_eq!(source.interruptions(), 3);
    }
}
