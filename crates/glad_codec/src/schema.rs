//! Field key table for the payload maps.
//!
//! Every map on the wire uses small integer keys. Decoders ignore keys they
//! do not know, so new optional fields can be added without breaking older
//! readers. Keys marked required fail decoding when absent.

/// Variant names used as the single key of the variant map.
pub mod variant {
    /// Channel sample.
    pub const EHA: &str = "eha";
    /// Event record.
    pub const EVR: &str = "evr";
    /// Alarm history snapshot.
    pub const ALARM_HISTORY: &str = "alarm_history";
}

/// Envelope map keys.
pub mod envelope {
    /// Ground receipt instant, milliseconds.
    pub const EVENT_TIME: u64 = 1;
    /// Spacecraft clock, `[coarse, fine]`.
    pub const SCLK: u64 = 2;
    /// Earth-received time, `[milliseconds, nanoseconds]`.
    pub const ERT: u64 = 3;
    /// Spacecraft event time, `[milliseconds, nanoseconds]`.
    pub const SCET: u64 = 4;
    /// Venue. Required.
    pub const VENUE: u64 = 5;
    /// Session number. Required.
    pub const SESSION_NUMBER: u64 = 6;
    /// Spacecraft identifier. Required.
    pub const SPACECRAFT_ID: u64 = 7;
    /// Station identifier. Required.
    pub const STATION_ID: u64 = 8;
    /// Virtual channel identifier. Required.
    pub const VCID: u64 = 9;
    /// Host. Required.
    pub const HOST: u64 = 10;
    /// User data type tag. Required.
    pub const USER_DATA_TYPE: u64 = 11;
    /// Primary time basis tag. Omitted for ERT.
    pub const TIME_BASIS: u64 = 12;
}

/// Channel sample map keys.
pub mod channel {
    /// Channel identifier. Required.
    pub const CHANNEL_ID: u64 = 1;
    /// DN type tag. Required.
    pub const DN_TYPE: u64 = 2;
    /// Raw DN bytes. Required.
    pub const DN: u64 = 3;
    /// Raw EU bytes.
    pub const EU: u64 = 4;
    /// Status string.
    pub const STATUS: u64 = 5;
    /// Alarm values, `[[level, on_eu, state], ...]`.
    pub const ALARMS: u64 = 6;
    /// Realtime flag.
    pub const REALTIME: u64 = 7;
    /// Packet header flag.
    pub const HEADER: u64 = 8;
    /// Station monitor flag.
    pub const MONITOR: u64 = 9;
    /// Ground support equipment flag.
    pub const SSE: u64 = 10;
    /// Flight software flag.
    pub const FSW: u64 = 11;
}

/// Event record map keys.
pub mod event {
    use glad_core::EvrField;

    /// EVR identifier. Required.
    pub const EVR_ID: u64 = 1;
    /// Level. Required.
    pub const LEVEL: u64 = 2;
    /// Realtime flag.
    pub const REALTIME: u64 = 12;
    /// Flight software flag.
    pub const FSW: u64 = 13;

    /// Key of a metadata blob. Keys 3 through 11.
    #[must_use]
    pub const fn metadata_key(field: EvrField) -> u64 {
        match field {
            EvrField::Name => 3,
            EvrField::Message => 4,
            EvrField::TaskName => 5,
            EvrField::SequenceId => 6,
            EvrField::CategorySequenceId => 7,
            EvrField::AddressStack => 8,
            EvrField::Source => 9,
            EvrField::TaskId => 10,
            EvrField::Errno => 11,
        }
    }
}

/// Alarm history map keys.
pub mod alarm_history {
    /// Serialized snapshot. Required.
    pub const SNAPSHOT: u64 = 1;
}
