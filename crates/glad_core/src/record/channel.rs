//! Channel sample variant.

use std::fmt;

use crate::alarm::{AlarmLevel, AlarmValue, AlarmValueSet};
use crate::error::{CoreError, CoreResult};

/// Data number type of a channel. Selects how the raw DN bytes are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelType {
    /// Two's complement signed integer.
    SignedInt,
    /// Unsigned integer.
    UnsignedInt,
    /// Unsigned bit field.
    Digital,
    /// Signed integer with a status string lookup.
    Status,
    /// IEEE 754 single or double.
    Float,
    /// Text.
    Ascii,
    /// Unsigned integer with a status string lookup.
    Boolean,
    /// Unsigned time value.
    Time,
}

impl ChannelType {
    /// Every channel type, in tag order.
    pub const ALL: [ChannelType; 8] = [
        ChannelType::SignedInt,
        ChannelType::UnsignedInt,
        ChannelType::Digital,
        ChannelType::Status,
        ChannelType::Float,
        ChannelType::Ascii,
        ChannelType::Boolean,
        ChannelType::Time,
    ];

    /// Returns the wire tag.
    #[must_use]
    pub const fn as_tag(self) -> u8 {
        match self {
            ChannelType::SignedInt => 1,
            ChannelType::UnsignedInt => 2,
            ChannelType::Digital => 3,
            ChannelType::Status => 4,
            ChannelType::Float => 5,
            ChannelType::Ascii => 6,
            ChannelType::Boolean => 7,
            ChannelType::Time => 8,
        }
    }

    /// Parses a wire tag.
    pub fn from_tag(tag: i64) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| i64::from(t.as_tag()) == tag)
            .ok_or(CoreError::InvalidChannelType { tag })
    }

    /// Returns true if the DN is read as a signed integer.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, ChannelType::SignedInt | ChannelType::Status)
    }

    /// Returns true if the DN is read as an unsigned integer.
    #[must_use]
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            ChannelType::UnsignedInt | ChannelType::Digital | ChannelType::Boolean | ChannelType::Time
        )
    }

    /// Returns true if samples of this type carry a status string.
    #[must_use]
    pub const fn has_status(self) -> bool {
        matches!(self, ChannelType::Status | ChannelType::Boolean)
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChannelType::SignedInt => "SIGNED_INT",
            ChannelType::UnsignedInt => "UNSIGNED_INT",
            ChannelType::Digital => "DIGITAL",
            ChannelType::Status => "STATUS",
            ChannelType::Float => "FLOAT",
            ChannelType::Ascii => "ASCII",
            ChannelType::Boolean => "BOOLEAN",
            ChannelType::Time => "TIME",
        })
    }
}

/// A single channelized telemetry value.
///
/// DN and EU are kept as the big-endian bytes that travel on the wire;
/// `glad_codec::numeric` interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelSample {
    channel_id: String,
    dn_type: ChannelType,
    dn_raw: Vec<u8>,
    eu_raw: Vec<u8>,
    status: String,
    alarms: AlarmValueSet,
    realtime: bool,
    header: bool,
    monitor: bool,
    sse: bool,
    fsw: bool,
}

impl ChannelSample {
    /// Creates a realtime flight software sample with no EU and no alarms.
    pub fn new(
        channel_id: impl Into<String>,
        dn_type: ChannelType,
        dn_raw: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            dn_type,
            dn_raw: dn_raw.into(),
            eu_raw: Vec::new(),
            status: String::new(),
            alarms: AlarmValueSet::new(),
            realtime: true,
            header: false,
            monitor: false,
            sse: false,
            fsw: true,
        }
    }

    /// Replaces the raw DN bytes.
    #[must_use]
    pub fn with_dn_raw(mut self, dn_raw: impl Into<Vec<u8>>) -> Self {
        self.dn_raw = dn_raw.into();
        self
    }

    /// Sets the raw EU bytes. Empty means no EU.
    #[must_use]
    pub fn with_eu_raw(mut self, eu_raw: impl Into<Vec<u8>>) -> Self {
        self.eu_raw = eu_raw.into();
        self
    }

    /// Sets the status string. Dropped unless the type is status or boolean.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        if self.dn_type.has_status() {
            self.status = status.into();
        }
        self
    }

    /// Replaces the alarm set.
    #[must_use]
    pub fn with_alarms(mut self, alarms: AlarmValueSet) -> Self {
        self.alarms = alarms;
        self
    }

    /// Appends one alarm value.
    #[must_use]
    pub fn with_alarm(mut self, alarm: AlarmValue) -> Self {
        self.alarms.push(alarm);
        self
    }

    /// Sets the realtime flag.
    #[must_use]
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Sets the packet header flag.
    #[must_use]
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Sets the station monitor flag.
    #[must_use]
    pub fn with_monitor(mut self, monitor: bool) -> Self {
        self.monitor = monitor;
        self
    }

    /// Sets the ground support equipment flag.
    #[must_use]
    pub fn with_sse(mut self, sse: bool) -> Self {
        self.sse = sse;
        self
    }

    /// Sets the flight software flag.
    #[must_use]
    pub fn with_fsw(mut self, fsw: bool) -> Self {
        self.fsw = fsw;
        self
    }

    /// Channel identifier, e.g. `A-0001`.
    #[must_use]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// DN type.
    #[must_use]
    pub fn dn_type(&self) -> ChannelType {
        self.dn_type
    }

    /// Raw DN bytes, big-endian.
    #[must_use]
    pub fn dn_raw(&self) -> &[u8] {
        &self.dn_raw
    }

    /// Raw EU bytes, big-endian. Empty when the channel has no EU.
    #[must_use]
    pub fn eu_raw(&self) -> &[u8] {
        &self.eu_raw
    }

    /// Returns true if an EU value is present.
    #[must_use]
    pub fn has_eu(&self) -> bool {
        !self.eu_raw.is_empty()
    }

    /// Status string. Empty unless the type is status or boolean.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Alarm values.
    #[must_use]
    pub fn alarms(&self) -> &AlarmValueSet {
        &self.alarms
    }

    /// Realtime flag.
    #[must_use]
    pub fn is_realtime(&self) -> bool {
        self.realtime
    }

    /// Packet header flag.
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.header
    }

    /// Station monitor flag.
    #[must_use]
    pub fn is_monitor(&self) -> bool {
        self.monitor
    }

    /// Ground support equipment flag.
    #[must_use]
    pub fn is_sse(&self) -> bool {
        self.sse
    }

    /// Flight software flag.
    #[must_use]
    pub fn is_fsw(&self) -> bool {
        self.fsw
    }

    /// Worst alarm level on the DN (`on_eu == false`) or EU axis.
    #[must_use]
    pub fn alarm_level(&self, on_eu: bool) -> AlarmLevel {
        self.alarms.worst_level(on_eu)
    }

    /// States of the worst alarms on the given axis, joined with `:`.
    #[must_use]
    pub fn alarm_state(&self, on_eu: bool) -> String {
        self.alarms.worst_state(on_eu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_type_tags() {
        for t in ChannelType::ALL {
            assert_eq!(ChannelType::from_tag(i64::from(t.as_tag())).unwrap(), t);
        }
        assert_eq!(
            ChannelType::from_tag(0),
            Err(CoreError::InvalidChannelType { tag: 0 })
        );
        assert!(ChannelType::from_tag(9).is_err());
    }

    #[test]
    fn status_only_kept_for_status_types() {
        let status = ChannelSample::new("S-1", ChannelType::Status, vec![1]).with_status("ON");
        assert_eq!(status.status(), "ON");

        let boolean = ChannelSample::new("B-1", ChannelType::Boolean, vec![1]).with_status("TRUE");
        assert_eq!(boolean.status(), "TRUE");

        let float = ChannelSample::new("F-1", ChannelType::Float, vec![0; 4]).with_status("ON");
        assert!(float.status().is_empty());
    }

    #[test]
    fn alarm_helpers_delegate() {
        let sample = ChannelSample::new("A-1", ChannelType::SignedInt, vec![0xFF])
            .with_alarm(AlarmValue::new(AlarmLevel::Red, true, "HI"))
            .with_alarm(AlarmValue::new(AlarmLevel::Yellow, false, "LO"));
        assert_eq!(sample.alarm_level(true), AlarmLevel::Red);
        assert_eq!(sample.alarm_state(true), "HI");
        assert_eq!(sample.alarm_level(false), AlarmLevel::Yellow);
        assert!(sample.alarms().in_alarm());
    }

    #[test]
    fn type_families() {
        assert!(ChannelType::Status.is_signed());
        assert!(ChannelType::Time.is_unsigned());
        assert!(!ChannelType::Float.is_signed());
        assert!(!ChannelType::Ascii.is_unsigned());
    }
}
