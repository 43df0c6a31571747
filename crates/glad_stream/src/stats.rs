//! Reconstructor statistics.

/// Counters accumulated by a [`crate::RecordReconstructor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconstructorStats {
    /// Records delivered.
    pub records: u64,
    /// Frames rejected for a bad length or a payload that failed to decode.
    pub decode_faults: u64,
    /// Bytes skipped while searching for a marker.
    pub skipped_bytes: u64,
    /// Bytes read from the source.
    pub bytes_read: u64,
}

impl ReconstructorStats {
    /// Returns true if no fault was seen and nothing was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.decode_faults == 0 && self.skipped_bytes == 0
    }
}
