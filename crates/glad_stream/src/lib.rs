//! # Global LAD Stream
//!
//! Reconstructs records from a stream of framed packets delivered in
//! arbitrary chunks.
//!
//! ```
//! use glad_codec::to_packet_bytes;
//! use glad_core::{ChannelSample, ChannelType, GladRecord};
//! use glad_stream::RecordReconstructor;
//!
//! let record = GladRecord::channel(ChannelSample::new("A-0001", ChannelType::UnsignedInt, vec![1]))
//!     .with_venue("OPS")
//!     .with_host("gds1")
//!     .build();
//! let bytes = to_packet_bytes(&record).unwrap();
//!
//! let mut reader = RecordReconstructor::raw(bytes.as_slice());
//! let delivered = reader.next_record().unwrap().unwrap();
//! assert_eq!(delivered.record, record);
//! assert!(reader.next_record().unwrap().is_none());
//! ```
//!
//! In verified mode the stream starts with three big-endian counts and each
//! record is tagged with its [`Completeness`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod chunks;
mod classification;
mod config;
mod error;
mod reconstructor;
mod stats;

pub use classification::{classify, Completeness, GroupedRecords};
pub use config::{ReconstructorConfig, StreamMode, DEFAULT_MAX_FRAME_LEN, DEFAULT_READ_SIZE};
pub use error::{StreamError, StreamResult};
pub use reconstructor::{Collected, DeliveredRecord, Produced, RecordReconstructor};
pub use stats::ReconstructorStats;
