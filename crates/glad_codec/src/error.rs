//! Error types for the codec crate.

use glad_core::CoreError;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to write CBOR.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Bytes are not well-formed CBOR.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },

    /// Well-formed CBOR that does not have the expected shape.
    #[error("invalid structure: {message}")]
    InvalidStructure {
        /// Description of the structural error.
        message: String,
    },

    /// A field the variant requires is absent.
    #[error("{scope}: missing required field {field}")]
    MissingField {
        /// Map the field belongs to.
        scope: &'static str,
        /// Field name.
        field: &'static str,
    },

    /// A field is present but has the wrong type or an out of range value.
    #[error("{scope}: invalid field {field}: {message}")]
    InvalidField {
        /// Map the field belongs to.
        scope: &'static str,
        /// Field name.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// The variant map names a variant this codec does not know.
    #[error("unknown record variant: {name}")]
    UnknownVariant {
        /// Name found on the wire.
        name: String,
    },

    /// Bytes left over after the payload.
    #[error("{count} trailing bytes after payload")]
    TrailingBytes {
        /// Number of unread bytes.
        count: usize,
    },

    /// Payload does not fit the 32-bit length field.
    #[error("payload of {len} bytes does not fit a packet")]
    PayloadTooLarge {
        /// Payload length.
        len: usize,
    },

    /// Raw DN or EU bytes cannot be interpreted, or a value cannot be
    /// written at the requested width.
    #[error("invalid DN/EU: {message}")]
    InvalidDn {
        /// Description of the problem.
        message: String,
    },

    /// Record model rejected a decoded value.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }

    /// Create an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(scope: &'static str, field: &'static str) -> Self {
        Self::MissingField { scope, field }
    }

    /// Create an invalid field error.
    pub fn invalid_field(
        scope: &'static str,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            scope,
            field,
            message: message.into(),
        }
    }

    /// Create an invalid DN/EU error.
    pub fn invalid_dn(message: impl Into<String>) -> Self {
        Self::InvalidDn {
            message: message.into(),
        }
    }
}
