//! Completeness classification for verified streams.

use std::fmt;

use glad_codec::VerifiedCounts;

/// Completeness of a record delivered by a verified stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Completeness {
    /// Within the announced complete count.
    Complete,
    /// Within the announced incomplete count.
    Incomplete,
    /// Past both counts.
    Unknown,
}

impl fmt::Display for Completeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Completeness::Complete => "complete",
            Completeness::Incomplete => "incomplete",
            Completeness::Unknown => "unknown",
        })
    }
}

/// Classifies the `ordinal`-th delivered record (1-indexed).
///
/// Thresholds are cumulative: complete up to `complete`, incomplete up to
/// `complete + incomplete`, unknown beyond.
#[must_use]
pub fn classify(counts: &VerifiedCounts, ordinal: u64) -> Completeness {
    let complete = u64::from(counts.complete);
    let incomplete = complete + u64::from(counts.incomplete);
    if ordinal <= complete {
        Completeness::Complete
    } else if ordinal <= incomplete {
        Completeness::Incomplete
    } else {
        Completeness::Unknown
    }
}

/// Records grouped by completeness.
#[derive(Debug, Clone)]
pub struct GroupedRecords<T> {
    /// Complete records, in delivery order.
    pub complete: Vec<T>,
    /// Incomplete records, in delivery order.
    pub incomplete: Vec<T>,
    /// Records of unknown completeness, in delivery order.
    pub unknown: Vec<T>,
}

impl<T> GroupedRecords<T> {
    /// Adds a record to its group.
    pub fn push(&mut self, completeness: Completeness, record: T) {
        self.group_mut(completeness).push(record);
    }

    /// Records in one group.
    #[must_use]
    pub fn group(&self, completeness: Completeness) -> &[T] {
        match completeness {
            Completeness::Complete => &self.complete,
            Completeness::Incomplete => &self.incomplete,
            Completeness::Unknown => &self.unknown,
        }
    }

    fn group_mut(&mut self, completeness: Completeness) -> &mut Vec<T> {
        match completeness {
            Completeness::Complete => &mut self.complete,
            Completeness::Incomplete => &mut self.incomplete,
            Completeness::Unknown => &mut self.unknown,
        }
    }

    /// Total number of records across all groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.complete.len() + self.incomplete.len() + self.unknown.len()
    }

    /// Returns true if no records were grouped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for GroupedRecords<T> {
    fn default() -> Self {
        Self {
            complete: Vec::new(),
            incomplete: Vec::new(),
            unknown: Vec::new(),
        }
    }
}
