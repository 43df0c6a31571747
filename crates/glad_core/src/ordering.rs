//! Total orders over records.
//!
//! Every comparator ends with the user data type and then the insert number,
//! so two records with distinct insert numbers never compare equal. Absent
//! time values sort before present ones.
//!
//! Ordering is a separate contract from [`GladRecord`]'s content equality:
//! two content-equal records with different insert numbers are not equal
//! here. For that reason `GladRecord` does not implement `Ord`; sorted
//! containers hold [`OrderedRecord`] instead.

use std::cmp::Ordering;

use crate::record::GladRecord;

/// Orders by the primary time basis of each record.
#[must_use]
pub fn compare(a: &GladRecord, b: &GladRecord) -> Ordering {
    let (ea, eb) = (a.envelope(), b.envelope());
    ea.primary_milliseconds()
        .cmp(&eb.primary_milliseconds())
        .then_with(|| ea.primary_nanoseconds().cmp(&eb.primary_nanoseconds()))
        .then_with(|| tie_break(a, b))
}

/// Orders by earth-received time.
#[must_use]
pub fn compare_ert(a: &GladRecord, b: &GladRecord) -> Ordering {
    a.envelope()
        .ert
        .cmp(&b.envelope().ert)
        .then_with(|| tie_break(a, b))
}

/// Orders by spacecraft event time.
#[must_use]
pub fn compare_scet(a: &GladRecord, b: &GladRecord) -> Ordering {
    a.envelope()
        .scet
        .cmp(&b.envelope().scet)
        .then_with(|| tie_break(a, b))
}

/// Orders by ground receipt instant.
#[must_use]
pub fn compare_insert(a: &GladRecord, b: &GladRecord) -> Ordering {
    a.envelope()
        .event_time
        .cmp(&b.envelope().event_time)
        .then_with(|| tie_break(a, b))
}

fn tie_break(a: &GladRecord, b: &GladRecord) -> Ordering {
    a.user_data_type()
        .cmp(&b.user_data_type())
        .then_with(|| a.insert_number().cmp(&b.insert_number()))
}

/// Axis a container indexes records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderAxis {
    /// Primary time basis, see [`compare`].
    #[default]
    Primary,
    /// See [`compare_ert`].
    Ert,
    /// See [`compare_scet`].
    Scet,
    /// See [`compare_insert`].
    Insert,
}

impl OrderAxis {
    /// Compares two records along this axis.
    #[must_use]
    pub fn compare(self, a: &GladRecord, b: &GladRecord) -> Ordering {
        match self {
            OrderAxis::Primary => compare(a, b),
            OrderAxis::Ert => compare_ert(a, b),
            OrderAxis::Scet => compare_scet(a, b),
            OrderAxis::Insert => compare_insert(a, b),
        }
    }
}

/// A record ordered by [`compare`], for sorted containers.
#[derive(Debug, Clone)]
pub struct OrderedRecord(pub GladRecord);

impl OrderedRecord {
    /// Unwraps the record.
    #[must_use]
    pub fn into_inner(self) -> GladRecord {
        self.0
    }
}

impl From<GladRecord> for OrderedRecord {
    fn from(record: GladRecord) -> Self {
        Self(record)
    }
}

impl PartialEq for OrderedRecord {
    fn eq(&self, other: &Self) -> bool {
        compare(&self.0, &other.0) == Ordering::Equal
    }
}

impl Eq for OrderedRecord {}

impl PartialOrd for OrderedRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(&self.0, &other.0)
    }
}
