//! Alarm values attached to channel samples.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Severity of an alarm entry. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum AlarmLevel {
    /// Not in alarm.
    #[default]
    None,
    /// Warning.
    Yellow,
    /// Critical.
    Red,
}

impl AlarmLevel {
    /// Returns the wire tag.
    #[must_use]
    pub const fn as_tag(self) -> u8 {
        match self {
            AlarmLevel::None => 0,
            AlarmLevel::Yellow => 1,
            AlarmLevel::Red => 2,
        }
    }

    /// Parses a wire tag.
    pub fn from_tag(tag: i64) -> CoreResult<Self> {
        match tag {
            0 => Ok(AlarmLevel::None),
            1 => Ok(AlarmLevel::Yellow),
            2 => Ok(AlarmLevel::Red),
            other => Err(CoreError::InvalidAlarmLevel { tag: other }),
        }
    }
}

impl fmt::Display for AlarmLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlarmLevel::None => "NONE",
            AlarmLevel::Yellow => "YELLOW",
            AlarmLevel::Red => "RED",
        })
    }
}

/// One alarm evaluation on either the DN or the EU axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlarmValue {
    /// Severity.
    pub level: AlarmLevel,
    /// True when the alarm was evaluated on the EU value.
    pub on_eu: bool,
    /// State label, e.g. the name of the tripped limit.
    pub state: String,
}

impl AlarmValue {
    /// Creates an alarm value.
    pub fn new(level: AlarmLevel, on_eu: bool, state: impl Into<String>) -> Self {
        Self {
            level,
            on_eu,
            state: state.into(),
        }
    }
}

/// Ordered collection of alarm values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AlarmValueSet {
    values: Vec<AlarmValue>,
}

impl AlarmValueSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an alarm value, preserving insertion order.
    pub fn push(&mut self, value: AlarmValue) {
        self.values.push(value);
    }

    /// Returns the values in insertion order.
    #[must_use]
    pub fn values(&self) -> &[AlarmValue] {
        &self.values
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the set holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if any entry is above `NONE`.
    #[must_use]
    pub fn in_alarm(&self) -> bool {
        self.values.iter().any(|v| v.level != AlarmLevel::None)
    }

    /// Returns the entries with the given level on the given axis.
    pub fn filtered(&self, level: AlarmLevel, on_eu: bool) -> impl Iterator<Item = &AlarmValue> {
        self.values
            .iter()
            .filter(move |v| v.level == level && v.on_eu == on_eu)
    }

    /// Returns the most severe level on the given axis.
    #[must_use]
    pub fn worst_level(&self, on_eu: bool) -> AlarmLevel {
        self.values
            .iter()
            .filter(|v| v.on_eu == on_eu)
            .map(|v| v.level)
            .max()
            .unwrap_or_default()
    }

    /// Returns the states of the worst entries on the given axis, joined
    /// with `:`. Empty when that axis is not in alarm.
    #[must_use]
    pub fn worst_state(&self, on_eu: bool) -> String {
        let level = self.worst_level(on_eu);
        if level == AlarmLevel::None {
            return String::new();
        }
        self.filtered(level, on_eu)
            .map(|v| v.state.as_str())
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl FromIterator<AlarmValue> for AlarmValueSet {
    fn from_iter<I: IntoIterator<Item = AlarmValue>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AlarmValueSet {
    type Item = &'a AlarmValue;
    type IntoIter = std::slice::Iter<'a, AlarmValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
