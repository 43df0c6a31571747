//! Error types for stream reconstruction.

use glad_codec::CodecError;
use thiserror::Error;

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// A frame that could not be turned into a record.
///
/// Both variants are fatal for one frame only. The reconstructor stays
/// usable and resynchronises on the next marker.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StreamError {
    /// The length field is out of range.
    #[error("invalid frame length {length} at offset {offset}: {reason}")]
    InvalidLength {
        /// Absolute stream offset of the frame marker.
        offset: u64,
        /// Declared length.
        length: i64,
        /// Why the length was rejected.
        reason: &'static str,
    },

    /// The payload was fully received but failed to decode.
    #[error("frame at offset {offset} with length {length} failed to decode: {source}")]
    Decode {
        /// Absolute stream offset of the frame marker.
        offset: u64,
        /// Declared length.
        length: u32,
        /// Codec failure.
        #[source]
        source: CodecError,
    },
}

impl StreamError {
    /// Absolute stream offset of the offending frame.
    #[must_use]
    pub fn offset(&self) -> u64 {
        match self {
            StreamError::InvalidLength { offset, .. } | StreamError::Decode { offset, .. } => {
                *offset
            }
        }
    }

    /// Returns true if the payload itself failed to decode, as opposed to a
    /// bad length field.
    #[must_use]
    pub fn is_payload_fault(&self) -> bool {
        matches!(self, StreamError::Decode { .. })
    }
}
