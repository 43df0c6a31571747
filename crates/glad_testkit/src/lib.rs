//! # Global LAD Testkit
//!
//! Test utilities for the Global LAD crates.
//!
//! This crate provides:
//! - Property-based generators for records and chunkings
//! - Fixture records and packet streams
//! - Byte sources that hand out data in controlled chunks, stall, or fail
//!
//! ## Usage
//!
//! ```rust
//! use glad_testkit::prelude::*;
//!
//! let records = sample_records(3);
//! let stream = packet_stream(&records);
//! let source = ChunkedSource::one_byte_at_a_time(&stream);
//! assert_eq!(source.remaining(), stream.len());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod sources;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::sources::*;
}

pub use fixtures::*;
pub use generators::*;
pub use sources::*;
