//! Reconstructor configuration.

/// Whether the stream starts with a verified-count prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamMode {
    /// Every framed packet is a record.
    #[default]
    Raw,
    /// The stream starts with three big-endian counts and every record is
    /// classified by completeness.
    Verified,
}

/// Default number of bytes requested per source read.
pub const DEFAULT_READ_SIZE: usize = 1024;

/// Default largest accepted frame length.
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Configuration for [`crate::RecordReconstructor`].
#[derive(Debug, Clone)]
pub struct ReconstructorConfig {
    /// Stream mode.
    pub mode: StreamMode,
    /// Bytes requested per source read.
    pub read_size: usize,
    /// Largest length field accepted before the frame is rejected.
    pub max_frame_len: usize,
}

impl ReconstructorConfig {
    /// Creates a configuration for the given mode.
    pub fn new(mode: StreamMode) -> Self {
        Self {
            mode,
            read_size: DEFAULT_READ_SIZE,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }

    /// Raw mode with default sizes.
    pub fn raw() -> Self {
        Self::new(StreamMode::Raw)
    }

    /// Verified mode with default sizes.
    pub fn verified() -> Self {
        Self::new(StreamMode::Verified)
    }

    /// Sets the stream mode.
    pub fn with_mode(mut self, mode: StreamMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the read size. Zero is raised to one.
    pub fn with_read_size(mut self, read_size: usize) -> Self {
        self.read_size = read_size.max(1);
        self
    }

    /// Sets the largest accepted frame length.
    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }
}

impl Default for ReconstructorConfig {
    fn default() -> Self {
        Self::raw()
    }
}
