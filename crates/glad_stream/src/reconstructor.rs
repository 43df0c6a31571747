//! Pull-based record reconstruction over a chunked byte source.
//!
//! A [`RecordReconstructor`] reads from any [`Read`] in chunks of whatever
//! size the source hands out and yields one decoded record per framed
//! packet. Partial input is never an error: the reconstructor reports
//! [`Produced::NeedMoreInput`] and picks up where it left off on the next
//! call. Corrupt frames are reported once and skipped by scanning for the
//! next marker.
//!
//! # Source semantics
//!
//! - `Ok(0)` marks the source exhausted for good
//! - `Interrupted` is retried
//! - `WouldBlock` means nothing is available right now
//! - any other error is treated as the source being closed
//!
//! The reconstructor owns its cursor and chunk list and does no locking.
//! One instance serves exactly one stream.

use std::io::{ErrorKind, Read};
use std::marker::PhantomData;

use bytes::Bytes;
use glad_codec::{
    Decode, VerifiedCounts, LENGTH_FIELD_SIZE, PACKET_MARKER, VERIFIED_PREFIX_SIZE,
};
use glad_core::GladRecord;
use tracing::{debug, trace, warn};

use crate::chunks::ChunkArena;
use crate::classification::{classify, Completeness, GroupedRecords};
use crate::config::{ReconstructorConfig, StreamMode};
use crate::error::{StreamError, StreamResult};
use crate::stats::ReconstructorStats;

/// A record together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveredRecord<T> {
    /// Decoded record.
    pub record: T,
    /// Completeness in verified mode, `None` in raw mode.
    pub completeness: Option<Completeness>,
    /// Absolute stream offset of the frame marker.
    pub offset: u64,
}

/// Outcome of one [`RecordReconstructor::produce_next`] step.
#[derive(Debug, Clone, PartialEq)]
pub enum Produced<T> {
    /// A record was decoded.
    Record(DeliveredRecord<T>),
    /// Not enough input is buffered for the next record. Not an error.
    NeedMoreInput,
}

/// Records plus the frame faults met while collecting them.
#[derive(Debug, Clone)]
pub struct Collected<C> {
    /// Collected records.
    pub records: C,
    /// Faults, in stream order.
    pub faults: Vec<StreamError>,
}

/// Turns a byte source into a sequence of records.
///
/// `T` is the payload type; it defaults to [`GladRecord`].
pub struct RecordReconstructor<R, T = GladRecord> {
    source: R,
    config: ReconstructorConfig,
    arena: ChunkArena,
    /// Cursor sits just past a confirmed marker.
    aligned: bool,
    counts: Option<VerifiedCounts>,
    delivered: u64,
    exhausted: bool,
    stats: ReconstructorStats,
    /// Reused read buffer; chunks are copied out at their read length.
    scratch: Vec<u8>,
    _payload: PhantomData<fn() -> T>,
}

impl<R: Read> RecordReconstructor<R> {
    /// Creates a reconstructor for [`GladRecord`] payloads.
    pub fn new(source: R, config: ReconstructorConfig) -> Self {
        Self::with_config(source, config)
    }

    /// Raw mode with default settings.
    pub fn raw(source: R) -> Self {
        Self::new(source, ReconstructorConfig::raw())
    }

    /// Verified mode with default settings.
    pub fn verified(source: R) -> Self {
        Self::new(source, ReconstructorConfig::verified())
    }
}

impl<R: Read, T: Decode> RecordReconstructor<R, T> {
    /// Creates a reconstructor for any payload type.
    pub fn with_config(source: R, config: ReconstructorConfig) -> Self {
        Self {
            source,
            config,
            arena: ChunkArena::default(),
            aligned: false,
            counts: None,
            delivered: 0,
            exhausted: false,
            stats: ReconstructorStats::default(),
            scratch: Vec::new(),
            _payload: PhantomData,
        }
    }

    /// Attempts to produce the next record.
    ///
    /// Reads from the source as needed. Returns `NeedMoreInput` when the
    /// source has nothing more to give right now and the buffered bytes do
    /// not hold a full frame. A bad length field or a payload that fails to
    /// decode is returned as an error; the next call resumes scanning.
    ///
    /// Once the source is exhausted, buffered bytes that can no longer form
    /// a record are discarded and counted as skipped, after which
    /// [`has_more`](Self::has_more) returns false.
    pub fn produce_next(&mut self) -> StreamResult<Produced<T>> {
        let produced = self.step()?;
        if matches!(produced, Produced::NeedMoreInput) && self.exhausted {
            self.discard_tail();
        }
        Ok(produced)
    }

    fn step(&mut self) -> StreamResult<Produced<T>> {
        if self.config.mode == StreamMode::Verified && self.counts.is_none() {
            if !self.fill(VERIFIED_PREFIX_SIZE) {
                return Ok(Produced::NeedMoreInput);
            }
            let cursor = self.arena.current_offset();
            let Some(prefix) = self.arena.peek::<VERIFIED_PREFIX_SIZE>(cursor) else {
                return Ok(Produced::NeedMoreInput);
            };
            let counts = VerifiedCounts::from_bytes(&prefix);
            debug!(
                complete = counts.complete,
                incomplete = counts.incomplete,
                unknown = counts.unknown,
                "read verified counts"
            );
            self.counts = Some(counts);
            self.arena.advance(VERIFIED_PREFIX_SIZE);
            self.arena.compact();
        }

        if !self.aligned && !self.align() {
            return Ok(Produced::NeedMoreInput);
        }

        if self.arena.available() == 0 {
            trace!(position = self.arena.position(), "aligned after marker with no data");
        }
        if !self.fill(LENGTH_FIELD_SIZE) {
            return Ok(Produced::NeedMoreInput);
        }

        let frame_offset = self.arena.position() - PACKET_MARKER.len() as u64;
        let cursor = self.arena.current_offset();
        let Some(length_field) = self.arena.peek::<LENGTH_FIELD_SIZE>(cursor) else {
            return Ok(Produced::NeedMoreInput);
        };
        let length = i32::from_be_bytes(length_field);

        if length <= LENGTH_FIELD_SIZE as i32 {
            let reason = "length must exceed the length field";
            return Err(self.reject_length(frame_offset, length, reason));
        }
        let length = length as usize;
        if length > self.config.max_frame_len {
            let reason = "length exceeds maximum frame size";
            return Err(self.reject_length(frame_offset, length as i32, reason));
        }

        if !self.fill(length) {
            return Ok(Produced::NeedMoreInput);
        }

        let payload_len = length - LENGTH_FIELD_SIZE;
        let payload = self
            .arena
            .slice(cursor + LENGTH_FIELD_SIZE, payload_len);
        self.arena.advance(length);
        self.arena.compact();
        self.aligned = false;

        match T::decode(&payload) {
            Ok(record) => {
                self.delivered += 1;
                self.stats.records += 1;
                let completeness = self.counts.as_ref().map(|c| classify(c, self.delivered));
                Ok(Produced::Record(DeliveredRecord {
                    record,
                    completeness,
                    offset: frame_offset,
                }))
            }
            Err(source) => {
                self.stats.decode_faults += 1;
                debug!(offset = frame_offset, length, error = %source, "frame failed to decode");
                Err(StreamError::Decode {
                    offset: frame_offset,
                    length: length as u32,
                    source,
                })
            }
        }
    }

    /// Returns the next record, `None` if more input is needed.
    pub fn next_record(&mut self) -> StreamResult<Option<DeliveredRecord<T>>> {
        match self.produce_next()? {
            Produced::Record(record) => Ok(Some(record)),
            Produced::NeedMoreInput => Ok(None),
        }
    }

    /// Returns true if unconsumed bytes are buffered or a read obtains more.
    pub fn has_more(&mut self) -> bool {
        self.arena.available() > 0 || self.read_chunk()
    }

    /// Drains every record currently obtainable, keeping faults aside.
    pub fn collect_all(&mut self) -> Collected<Vec<T>> {
        let mut collected = Collected {
            records: Vec::new(),
            faults: Vec::new(),
        };
        for item in self.by_ref() {
            match item {
                Ok(delivered) => collected.records.push(delivered.record),
                Err(fault) => collected.faults.push(fault),
            }
        }
        collected
    }

    /// Drains every record currently obtainable, grouped by completeness.
    ///
    /// In raw mode everything is grouped as complete.
    pub fn collect_by_completeness(&mut self) -> Collected<GroupedRecords<T>> {
        let mut collected = Collected {
            records: GroupedRecords::default(),
            faults: Vec::new(),
        };
        for item in self.by_ref() {
            match item {
                Ok(delivered) => collected.records.push(
                    delivered.completeness.unwrap_or(Completeness::Complete),
                    delivered.record,
                ),
                Err(fault) => collected.faults.push(fault),
            }
        }
        collected
    }

    /// Verified counts, once read.
    pub fn counts(&self) -> Option<VerifiedCounts> {
        self.counts
    }

    /// Counters so far.
    pub fn stats(&self) -> ReconstructorStats {
        self.stats
    }

    /// Absolute stream position of the cursor.
    pub fn position(&self) -> u64 {
        self.arena.position()
    }

    /// Returns true once the source reported end of stream.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Active configuration.
    pub fn config(&self) -> &ReconstructorConfig {
        &self.config
    }

    /// Releases the source. Buffered bytes are discarded.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Scans for the next marker and moves past it.
    fn align(&mut self) -> bool {
        let start = self.arena.position();
        let found = loop {
            match self.arena.find_marker(PACKET_MARKER) {
                Ok(marker) => {
                    self.arena.seek(marker + PACKET_MARKER.len());
                    break true;
                }
                Err(resume) => {
                    self.arena.seek(resume);
                    self.arena.compact();
                    if !self.read_chunk() {
                        break false;
                    }
                }
            }
        };

        let end = self.arena.position();
        let skipped = end - start - if found { PACKET_MARKER.len() as u64 } else { 0 };
        if skipped > 0 {
            self.stats.skipped_bytes += skipped;
            warn!(offset = start, skipped, "skipped bytes searching for packet marker");
        }
        self.aligned = found;
        found
    }

    /// Drops what is left in the buffer after end of stream.
    fn discard_tail(&mut self) {
        self.aligned = false;
        let dead = self.arena.available();
        if dead == 0 {
            return;
        }
        let offset = self.arena.position();
        self.arena.advance(dead);
        self.arena.compact();
        self.stats.skipped_bytes += dead as u64;
        warn!(offset, discarded = dead, "discarded incomplete tail at end of stream");
    }

    fn reject_length(&mut self, offset: u64, length: i32, reason: &'static str) -> StreamError {
        self.aligned = false;
        self.stats.decode_faults += 1;
        debug!(offset, length, reason, "rejected frame length");
        StreamError::InvalidLength {
            offset,
            length: i64::from(length),
            reason,
        }
    }

    /// Reads until `n` bytes past the cursor are buffered.
    fn fill(&mut self, n: usize) -> bool {
        while self.arena.available() < n {
            if !self.read_chunk() {
                return false;
            }
        }
        true
    }

    /// Reads one chunk. Returns false if nothing was obtained.
    fn read_chunk(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        self.scratch.resize(self.config.read_size, 0);
        loop {
            match self.source.read(&mut self.scratch) {
                Ok(0) => {
                    self.exhausted = true;
                    return false;
                }
                Ok(n) => {
                    self.stats.bytes_read += n as u64;
                    self.arena.push(Bytes::copy_from_slice(&self.scratch[..n]));
                    return true;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return false,
                Err(e) => {
                    debug!(error = %e, "source closed");
                    self.exhausted = true;
                    return false;
                }
            }
        }
    }
}

impl<R: Read, T: Decode> Iterator for RecordReconstructor<R, T> {
    type Item = StreamResult<DeliveredRecord<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.produce_next() {
            Ok(Produced::Record(record)) => Some(Ok(record)),
            Ok(Produced::NeedMoreInput) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<R, T> std::fmt::Debug for RecordReconstructor<R, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordReconstructor")
            .field("mode", &self.config.mode)
            .field("position", &self.arena.position())
            .field("buffered", &self.arena.available())
            .field("aligned", &self.aligned)
            .field("counts", &self.counts)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
