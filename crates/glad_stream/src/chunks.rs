//! Retained input chunks addressed as one logical buffer.
//!
//! Chunks are kept exactly as read and never joined; only a payload that
//! straddles a chunk boundary is copied out. Fully consumed leading chunks
//! are dropped by [`ChunkArena::compact`], so memory is bounded by the
//! unconsumed tail.

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};

/// Logical offsets are relative to the first retained chunk.
#[derive(Debug, Default)]
pub(crate) struct ChunkArena {
    chunks: VecDeque<Bytes>,
    /// Cursor.
    current_offset: usize,
    /// Exclusive end of buffered data.
    max_offset: usize,
    /// Bytes dropped from the front over the arena's lifetime.
    dropped: u64,
}

impl ChunkArena {
    pub(crate) fn push(&mut self, chunk: Bytes) {
        if chunk.is_empty() {
            return;
        }
        self.max_offset += chunk.len();
        self.chunks.push_back(chunk);
    }

    /// Unconsumed buffered bytes.
    pub(crate) fn available(&self) -> usize {
        self.max_offset - self.current_offset
    }

    pub(crate) fn current_offset(&self) -> usize {
        self.current_offset
    }

    /// Absolute stream position of the cursor.
    pub(crate) fn position(&self) -> u64 {
        self.dropped + self.current_offset as u64
    }

    #[cfg(test)]
    pub(crate) fn chunk_lens(&self) -> impl Iterator<Item = usize> + '_ {
        self.chunks.iter().map(Bytes::len)
    }

    pub(crate) fn retained_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.available());
        self.current_offset = (self.current_offset + n).min(self.max_offset);
    }

    pub(crate) fn seek(&mut self, offset: usize) {
        debug_assert!(offset >= self.current_offset && offset <= self.max_offset);
        self.current_offset = offset.min(self.max_offset);
    }

    /// Chunk index and offset within it for a logical offset.
    fn locate(&self, offset: usize) -> (usize, usize) {
        let mut base = 0;
        for (index, chunk) in self.chunks.iter().enumerate() {
            if offset < base + chunk.len() {
                return (index, offset - base);
            }
            base += chunk.len();
        }
        (self.chunks.len(), 0)
    }

    fn bytes_from(&self, offset: usize) -> impl Iterator<Item = u8> + '_ {
        let (index, inner) = self.locate(offset);
        self.chunks
            .iter()
            .skip(index)
            .enumerate()
            .flat_map(move |(i, chunk)| {
                let start = if i == 0 { inner } else { 0 };
                chunk[start..].iter().copied()
            })
    }

    /// Reads `N` bytes at `offset` without consuming them.
    pub(crate) fn peek<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        if offset + N > self.max_offset {
            return None;
        }
        let mut out = [0u8; N];
        for (slot, byte) in out.iter_mut().zip(self.bytes_from(offset)) {
            *slot = byte;
        }
        Some(out)
    }

    /// Returns `len` bytes at `offset`. Zero-copy when they sit in one chunk.
    pub(crate) fn slice(&self, offset: usize, len: usize) -> Bytes {
        debug_assert!(offset + len <= self.max_offset);
        let (index, inner) = self.locate(offset);
        match self.chunks.get(index) {
            Some(chunk) if chunk.len() - inner >= len => chunk.slice(inner..inner + len),
            _ => {
                let mut out = BytesMut::with_capacity(len);
                let mut start = inner;
                for chunk in self.chunks.iter().skip(index) {
                    let take = (chunk.len() - start).min(len - out.len());
                    out.extend_from_slice(&chunk[start..start + take]);
                    start = 0;
                    if out.len() == len {
                        break;
                    }
                }
                out.freeze()
            }
        }
    }

    /// Searches forward from the cursor for `marker`.
    ///
    /// Returns the marker's offset, or the first offset that could still
    /// begin a marker once more data arrives.
    pub(crate) fn find_marker(&self, marker: [u8; 4]) -> Result<usize, usize> {
        let start = self.current_offset;
        let target = u32::from_be_bytes(marker);
        let mut window = 0u32;
        for (i, byte) in self.bytes_from(start).enumerate() {
            window = (window << 8) | u32::from(byte);
            if i >= 3 && window == target {
                return Ok(start + i - 3);
            }
        }
        Err(start.max(self.max_offset.saturating_sub(marker.len() - 1)))
    }

    /// Drops fully consumed leading chunks and shifts offsets down.
    pub(crate) fn compact(&mut self) {
        while let Some(front) = self.chunks.front() {
            let len = front.len();
            if len > self.current_offset {
                break;
            }
            self.current_offset -= len;
            self.max_offset -= len;
            self.dropped += len as u64;
            self.chunks.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(chunks: &[&[u8]]) -> ChunkArena {
        let mut arena = ChunkArena::default();
        for chunk in chunks {
            arena.push(Bytes::copy_from_slice(chunk));
        }
        arena
    }

    #[test]
    fn peek_across_chunks() {
        let arena = arena(&[&[1, 2], &[3], &[4, 5, 6]]);
        assert_eq!(arena.peek::<4>(1), Some([2, 3, 4, 5]));
        assert_eq!(arena.peek::<4>(3), None);
        assert_eq!(arena.available(), 6);
    }

    #[test]
    fn slice_is_zero_copy_within_a_chunk() {
        let arena = arena(&[&[1, 2, 3, 4], &[5, 6]]);
        assert_eq!(arena.slice(1, 2).as_ref(), &[2, 3]);
        assert_eq!(arena.slice(2, 4).as_ref(), &[3, 4, 5, 6]);
    }

    #[test]
    fn marker_split_across_chunks() {
        let arena = arena(&[&[0x00, 0x1A], &[0xCF], &[0xFC, 0x1D, 0x00]]);
        assert_eq!(arena.find_marker([0x1A, 0xCF, 0xFC, 0x1D]), Ok(1));
    }

    #[test]
    fn marker_not_found_keeps_possible_prefix() {
        let mut arena = arena(&[&[9, 9, 9, 9, 0x1A, 0xCF]]);
        assert_eq!(arena.find_marker([0x1A, 0xCF, 0xFC, 0x1D]), Err(3));
        arena.seek(3);
        arena.push(Bytes::from_static(&[0xFC, 0x1D]));
        assert_eq!(arena.find_marker([0x1A, 0xCF, 0xFC, 0x1D]), Ok(4));
    }

    #[test]
    fn compact_drops_consumed_chunks() {
        let mut arena = arena(&[&[1, 2], &[3, 4], &[5]]);
        arena.advance(3);
        arena.compact();
        assert_eq!(arena.retained_chunks(), 2);
        assert_eq!(arena.current_offset(), 1);
        assert_eq!(arena.position(), 3);
        assert_eq!(arena.peek::<2>(arena.current_offset()), Some([4, 5]));

        arena.advance(2);
        arena.compact();
        assert_eq!(arena.retained_chunks(), 0);
        assert_eq!(arena.available(), 0);
        assert_eq!(arena.position(), 5);
    }

    #[test]
    fn empty_chunks_are_ignored() {
        let arena = arena(&[&[], &[1], &[]]);
        assert_eq!(arena.retained_chunks(), 1);
    }
}
