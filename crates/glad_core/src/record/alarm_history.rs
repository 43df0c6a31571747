//! Alarm history variant.

/// Opaque alarm history snapshot produced by the alarm tracking service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlarmHistory {
    snapshot: Vec<u8>,
}

impl AlarmHistory {
    /// Wraps a serialized snapshot.
    pub fn new(snapshot: impl Into<Vec<u8>>) -> Self {
        Self {
            snapshot: snapshot.into(),
        }
    }

    /// Serialized snapshot bytes.
    #[must_use]
    pub fn snapshot(&self) -> &[u8] {
        &self.snapshot
    }

    /// Consumes the wrapper, returning the snapshot bytes.
    #[must_use]
    pub fn into_snapshot(self) -> Vec<u8> {
        self.snapshot
    }
}
