//! # Global LAD Core
//!
//! Record model for the Global Limited Access Database.
//!
//! This crate provides:
//! - [`GladRecord`]: an envelope of identity and time fields plus one of
//!   three variants (channel sample, event record, alarm history)
//! - [`UserDataType`] tags and their classification rules
//! - [`InsertSequence`] for containers that assign insert numbers
//! - [`ordering`]: the total orders used by sorted containers
//!
//! Encoding lives in `glad_codec`; stream reconstruction in `glad_stream`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod alarm;
mod error;
pub mod ordering;
mod record;
mod types;
mod user_data_type;

pub use alarm::{AlarmLevel, AlarmValue, AlarmValueSet};
pub use error::{CoreError, CoreResult};
pub use ordering::{compare, compare_ert, compare_insert, compare_scet, OrderAxis, OrderedRecord};
pub use record::{
    AlarmHistory, ChannelSample, ChannelType, Envelope, EventRecord, EvrField, GladRecord,
    GladRecordBuilder, RecordBody,
};
pub use types::{InsertNumber, InsertSequence, Sclk, TimeBasis, Timestamp};
pub use user_data_type::UserDataType;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
