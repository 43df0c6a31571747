//! Time and sequencing primitives shared by every record variant.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::{CoreError, CoreResult};

/// Position of a record in its owning container.
///
/// Insert numbers are assigned once by the container and increase
/// monotonically over the container's lifetime. They are the final tie
/// breaker of every comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InsertNumber(pub i64);

impl InsertNumber {
    /// Creates a new insert number.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Returns the following insert number.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for InsertNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ins:{}", self.0)
    }
}

/// Lock-free allocator of monotonically increasing insert numbers.
///
/// A container that must make allocation atomic with insertion still calls
/// this under its own lock; the sequence only guarantees that two calls never
/// hand out the same number.
#[derive(Debug)]
pub struct InsertSequence {
    next: AtomicI64,
}

impl InsertSequence {
    /// Creates a sequence whose first allocation is `first`.
    #[must_use]
    pub const fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }

    /// Allocates the next insert number.
    pub fn allocate(&self) -> InsertNumber {
        InsertNumber(self.next.fetch_add(1, Ordering::SeqCst))
    }

    /// Returns the number the next allocation will hand out.
    #[must_use]
    pub fn peek(&self) -> InsertNumber {
        InsertNumber(self.next.load(Ordering::SeqCst))
    }
}

impl Default for InsertSequence {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

/// A millisecond instant with a sub-millisecond nanosecond component.
///
/// Used for both earth-received time and spacecraft event time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    /// Milliseconds since the epoch.
    pub milliseconds: u64,
    /// Nanoseconds within the millisecond.
    pub nanoseconds: u32,
}

impl Timestamp {
    /// Creates a timestamp.
    #[must_use]
    pub const fn new(milliseconds: u64, nanoseconds: u32) -> Self {
        Self {
            milliseconds,
            nanoseconds,
        }
    }

    /// Creates a timestamp with no sub-millisecond component.
    #[must_use]
    pub const fn from_millis(milliseconds: u64) -> Self {
        Self::new(milliseconds, 0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}ms", self.milliseconds, self.nanoseconds)
    }
}

/// Spacecraft clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Sclk {
    /// Whole seconds.
    pub coarse: u64,
    /// Sub-second ticks.
    pub fine: u64,
}

impl Sclk {
    /// Creates a clock reading.
    #[must_use]
    pub const fn new(coarse: u64, fine: u64) -> Self {
        Self { coarse, fine }
    }
}

impl fmt::Display for Sclk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.coarse, self.fine)
    }
}

/// Which time pair is authoritative for ordering a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeBasis {
    /// Spacecraft event time.
    Scet,
    /// Earth-received time.
    #[default]
    Ert,
    /// Ground receipt instant.
    Event,
    /// Spacecraft clock. Orders by SCET.
    Sclk,
    /// Local solar time. Orders by SCET.
    Lst,
    /// Every basis at once. Orders by SCET.
    All,
}

impl TimeBasis {
    /// Every basis, in tag order.
    pub const ALL_BASES: [TimeBasis; 6] = [
        TimeBasis::Scet,
        TimeBasis::Ert,
        TimeBasis::Event,
        TimeBasis::Sclk,
        TimeBasis::Lst,
        TimeBasis::All,
    ];

    /// Returns the wire tag for this basis.
    #[must_use]
    pub const fn as_tag(self) -> u8 {
        match self {
            TimeBasis::Scet => 0,
            TimeBasis::Ert => 1,
            TimeBasis::Event => 2,
            TimeBasis::Sclk => 3,
            TimeBasis::Lst => 4,
            TimeBasis::All => 5,
        }
    }

    /// Parses a wire tag.
    pub fn from_tag(tag: i64) -> CoreResult<Self> {
        Self::ALL_BASES
            .into_iter()
            .find(|basis| i64::from(basis.as_tag()) == tag)
            .ok_or_else(|| CoreError::invalid_time_basis(tag.to_string()))
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TimeBasis::Scet => "SCET",
            TimeBasis::Ert => "ERT",
            TimeBasis::Event => "EVENT",
            TimeBasis::Sclk => "SCLK",
            TimeBasis::Lst => "LST",
            TimeBasis::All => "ALL",
        }
    }
}

impl fmt::Display for TimeBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeBasis {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_BASES
            .into_iter()
            .find(|basis| basis.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::invalid_time_basis(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_number_next() {
        let n = InsertNumber::new(41);
        assert_eq!(n.next().as_i64(), 42);
        assert_eq!(format!("{n}"), "ins:41");
    }

    #[test]
    fn insert_sequence_is_monotonic() {
        let seq = InsertSequence::starting_at(10);
        let a = seq.allocate();
        let b = seq.allocate();
        assert!(a < b);
        assert_eq!(seq.peek(), InsertNumber(12));
    }

    #[test]
    fn insert_sequence_across_threads() {
        let seq = std::sync::Arc::new(InsertSequence::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let seq = seq.clone();
                std::thread::spawn(move || (0..100).map(|_| seq.allocate()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 400);
    }

    #[test]
    fn time_basis_tags() {
        for basis in TimeBasis::ALL_BASES {
            assert_eq!(TimeBasis::from_tag(i64::from(basis.as_tag())).unwrap(), basis);
        }
        assert!(TimeBasis::from_tag(6).is_err());
        assert!(TimeBasis::from_tag(-1).is_err());
    }

    #[test]
    fn time_basis_parse() {
        assert_eq!("scet".parse::<TimeBasis>().unwrap(), TimeBasis::Scet);
        assert_eq!(" ERT ".parse::<TimeBasis>().unwrap(), TimeBasis::Ert);
        assert!("utc".parse::<TimeBasis>().is_err());
        assert_eq!(TimeBasis::default(), TimeBasis::Ert);
    }

    #[test]
    fn timestamp_ordering() {
        assert!(Timestamp::new(5, 999_999) < Timestamp::new(6, 0));
        assert!(Timestamp::new(5, 1) > Timestamp::from_millis(5));
    }
}
