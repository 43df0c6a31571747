//! Global LAD records.
//!
//! A [`GladRecord`] is an [`Envelope`] of identity and time fields shared by
//! every variant plus a [`RecordBody`] holding the variant itself. Records
//! are immutable once built, except for the insert number which the owning
//! container assigns exactly once.

mod alarm_history;
mod channel;
mod event;

pub use alarm_history::AlarmHistory;
pub use channel::{ChannelSample, ChannelType};
pub use event::{EventRecord, EvrField};

use std::borrow::Cow;

use crate::error::{CoreError, CoreResult};
use crate::types::{InsertNumber, Sclk, TimeBasis, Timestamp};
use crate::user_data_type::UserDataType;

/// Identity and time fields common to every variant.
///
/// Time fields are `None` when they do not apply to the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Envelope {
    /// Ground receipt instant in milliseconds.
    pub event_time: Option<u64>,
    /// Spacecraft clock.
    pub sclk: Option<Sclk>,
    /// Earth-received time.
    pub ert: Option<Timestamp>,
    /// Spacecraft event time.
    pub scet: Option<Timestamp>,
    /// Venue name, e.g. `TESTSET` or `OPS`.
    pub venue: String,
    /// Session number.
    pub session_number: i64,
    /// Spacecraft identifier.
    pub spacecraft_id: i32,
    /// Station (DSS) identifier.
    pub station_id: i8,
    /// Virtual channel identifier.
    pub vcid: i8,
    /// Host that produced the session.
    pub host: String,
    /// Variant tag.
    pub user_data_type: UserDataType,
    /// Time pair used by [`crate::ordering::compare`].
    pub primary_time_basis: TimeBasis,
}

impl Envelope {
    /// Milliseconds of the primary time basis.
    ///
    /// ERT reads the ERT pair, EVENT the event time, and every other basis
    /// reads the SCET pair.
    #[must_use]
    pub fn primary_milliseconds(&self) -> Option<u64> {
        match self.primary_time_basis {
            TimeBasis::Ert => self.ert.map(|t| t.milliseconds),
            TimeBasis::Event => self.event_time,
            TimeBasis::Scet | TimeBasis::Sclk | TimeBasis::Lst | TimeBasis::All => {
                self.scet.map(|t| t.milliseconds)
            }
        }
    }

    /// Sub-millisecond nanoseconds of the primary time basis. Always zero
    /// for EVENT.
    #[must_use]
    pub fn primary_nanoseconds(&self) -> Option<u32> {
        match self.primary_time_basis {
            TimeBasis::Ert => self.ert.map(|t| t.nanoseconds),
            TimeBasis::Event => Some(0),
            TimeBasis::Scet | TimeBasis::Sclk | TimeBasis::Lst | TimeBasis::All => {
                self.scet.map(|t| t.nanoseconds)
            }
        }
    }
}

/// Variant payload of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordBody {
    /// Channelized telemetry value.
    Channel(ChannelSample),
    /// Event record.
    Event(EventRecord),
    /// Alarm history snapshot.
    AlarmHistory(AlarmHistory),
}

impl RecordBody {
    /// Variant name used on the wire.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            RecordBody::Channel(_) => "eha",
            RecordBody::Event(_) => "evr",
            RecordBody::AlarmHistory(_) => "alarm_history",
        }
    }

    /// User data type implied by the variant and its flags.
    #[must_use]
    pub fn derived_user_data_type(&self) -> UserDataType {
        match self {
            RecordBody::Channel(c) => {
                UserDataType::for_channel(c.is_realtime(), c.is_header(), c.is_monitor(), c.is_sse())
            }
            RecordBody::Event(e) => UserDataType::for_event(e.is_realtime(), e.is_fsw()),
            RecordBody::AlarmHistory(_) => UserDataType::ALARM_HISTORY,
        }
    }
}

/// A Global LAD record.
///
/// Equality compares content: every envelope and variant field except the
/// insert number. Records built from the same source data but inserted at
/// different positions are equal. Ordering lives in [`crate::ordering`].
#[derive(Debug, Clone)]
pub struct GladRecord {
    envelope: Envelope,
    body: RecordBody,
    insert_number: Option<InsertNumber>,
}

impl GladRecord {
    /// Assembles a record from decoded parts. The envelope's user data type
    /// is kept as given.
    #[must_use]
    pub fn from_parts(envelope: Envelope, body: RecordBody) -> Self {
        Self {
            envelope,
            body,
            insert_number: None,
        }
    }

    /// Starts building a record around a variant.
    #[must_use]
    pub fn builder(body: RecordBody) -> GladRecordBuilder {
        GladRecordBuilder {
            envelope: Envelope::default(),
            body,
            user_data_type: None,
        }
    }

    /// Starts building a channel sample record.
    #[must_use]
    pub fn channel(sample: ChannelSample) -> GladRecordBuilder {
        Self::builder(RecordBody::Channel(sample))
    }

    /// Starts building an event record.
    #[must_use]
    pub fn event(event: EventRecord) -> GladRecordBuilder {
        Self::builder(RecordBody::Event(event))
    }

    /// Starts building an alarm history record.
    #[must_use]
    pub fn alarm_history(history: AlarmHistory) -> GladRecordBuilder {
        Self::builder(RecordBody::AlarmHistory(history))
    }

    /// Envelope fields.
    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Variant payload.
    #[must_use]
    pub fn body(&self) -> &RecordBody {
        &self.body
    }

    /// Splits the record into its envelope and body.
    #[must_use]
    pub fn into_parts(self) -> (Envelope, RecordBody) {
        (self.envelope, self.body)
    }

    /// Variant tag.
    #[must_use]
    pub fn user_data_type(&self) -> UserDataType {
        self.envelope.user_data_type
    }

    /// Insert number, once the container has assigned one.
    #[must_use]
    pub fn insert_number(&self) -> Option<InsertNumber> {
        self.insert_number
    }

    /// Assigns the insert number. Fails if one is already assigned.
    pub fn assign_insert_number(&mut self, insert_number: InsertNumber) -> CoreResult<()> {
        match self.insert_number {
            Some(existing) => Err(CoreError::InsertNumberAlreadyAssigned {
                existing: existing.as_i64(),
                requested: insert_number.as_i64(),
            }),
            None => {
                self.insert_number = Some(insert_number);
                Ok(())
            }
        }
    }

    /// Identifier used for latest-value replacement: the channel id, the
    /// EVR level, or `host:venue:session` for alarm history.
    #[must_use]
    pub fn identifier(&self) -> Cow<'_, str> {
        match &self.body {
            RecordBody::Channel(c) => Cow::Borrowed(c.channel_id()),
            RecordBody::Event(e) => Cow::Borrowed(e.level()),
            RecordBody::AlarmHistory(_) => Cow::Owned(format!(
                "{}:{}:{}",
                self.envelope.host, self.envelope.venue, self.envelope.session_number
            )),
        }
    }

    /// Milliseconds between the event time and `now_ms`, saturating at the
    /// `i64` bounds. `None` without an event time.
    #[must_use]
    pub fn create_time_delta(&self, now_ms: u64) -> Option<i64> {
        self.envelope.event_time.map(|event| {
            let delta = i128::from(now_ms) - i128::from(event);
            i64::try_from(delta).unwrap_or(if delta < 0 { i64::MIN } else { i64::MAX })
        })
    }

    /// Variant name used on the wire.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        self.body.variant_name()
    }

    /// Channel sample, if this record is one.
    #[must_use]
    pub fn as_channel(&self) -> Option<&ChannelSample> {
        match &self.body {
            RecordBody::Channel(c) => Some(c),
            _ => None,
        }
    }

    /// Event record, if this record is one.
    #[must_use]
    pub fn as_event(&self) -> Option<&EventRecord> {
        match &self.body {
            RecordBody::Event(e) => Some(e),
            _ => None,
        }
    }

    /// Alarm history, if this record is one.
    #[must_use]
    pub fn as_alarm_history(&self) -> Option<&AlarmHistory> {
        match &self.body {
            RecordBody::AlarmHistory(h) => Some(h),
            _ => None,
        }
    }
}

impl PartialEq for GladRecord {
    fn eq(&self, other: &Self) -> bool {
        self.envelope == other.envelope && self.body == other.body
    }
}

impl Eq for GladRecord {}

/// Builder for [`GladRecord`].
#[derive(Debug, Clone)]
pub struct GladRecordBuilder {
    envelope: Envelope,
    body: RecordBody,
    user_data_type: Option<UserDataType>,
}

impl GladRecordBuilder {
    /// Sets the ground receipt instant.
    #[must_use]
    pub fn with_event_time(mut self, millis: u64) -> Self {
        self.envelope.event_time = Some(millis);
        self
    }

    /// Sets the spacecraft clock.
    #[must_use]
    pub fn with_sclk(mut self, sclk: Sclk) -> Self {
        self.envelope.sclk = Some(sclk);
        self
    }

    /// Sets the earth-received time.
    #[must_use]
    pub fn with_ert(mut self, ert: Timestamp) -> Self {
        self.envelope.ert = Some(ert);
        self
    }

    /// Sets the spacecraft event time.
    #[must_use]
    pub fn with_scet(mut self, scet: Timestamp) -> Self {
        self.envelope.scet = Some(scet);
        self
    }

    /// Sets the venue.
    #[must_use]
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.envelope.venue = venue.into();
        self
    }

    /// Sets the session number.
    #[must_use]
    pub fn with_session_number(mut self, session_number: i64) -> Self {
        self.envelope.session_number = session_number;
        self
    }

    /// Sets the spacecraft identifier.
    #[must_use]
    pub fn with_spacecraft_id(mut self, spacecraft_id: i32) -> Self {
        self.envelope.spacecraft_id = spacecraft_id;
        self
    }

    /// Sets the station identifier.
    #[must_use]
    pub fn with_station_id(mut self, station_id: i8) -> Self {
        self.envelope.station_id = station_id;
        self
    }

    /// Sets the virtual channel identifier.
    #[must_use]
    pub fn with_vcid(mut self, vcid: i8) -> Self {
        self.envelope.vcid = vcid;
        self
    }

    /// Sets the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.envelope.host = host.into();
        self
    }

    /// Overrides the derived user data type.
    #[must_use]
    pub fn with_user_data_type(mut self, user_data_type: UserDataType) -> Self {
        self.user_data_type = Some(user_data_type);
        self
    }

    /// Sets the primary time basis.
    #[must_use]
    pub fn with_time_basis(mut self, basis: TimeBasis) -> Self {
        self.envelope.primary_time_basis = basis;
        self
    }

    /// Finishes the record, deriving the user data type unless one was set.
    #[must_use]
    pub fn build(self) -> GladRecord {
        let mut envelope = self.envelope;
        envelope.user_data_type = self
            .user_data_type
            .unwrap_or_else(|| self.body.derived_user_data_type());
        GladRecord::from_parts(envelope, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_record() -> GladRecord {
        GladRecord::channel(ChannelSample::new("A-0001", ChannelType::SignedInt, vec![0xFE]))
            .with_event_time(1_000)
            .with_ert(Timestamp::new(900, 12))
            .with_venue("TESTSET")
            .with_session_number(7)
            .with_host("gds1")
            .build()
    }

    #[test]
    fn builder_derives_user_data_type() {
        assert_eq!(channel_record().user_data_type(), UserDataType::EHA_FSW_REALTIME);

        let sse = GladRecord::event(EventRecord::new(1, "FATAL").with_fsw(false)).build();
        assert_eq!(sse.user_data_type(), UserDataType::EVR_SSE);

        let explicit = GladRecord::alarm_history(AlarmHistory::new(vec![1, 2]))
            .with_user_data_type(UserDataType(99))
            .build();
        assert_eq!(explicit.user_data_type(), UserDataType(99));
    }

    #[test]
    fn insert_number_assigned_once() {
        let mut record = channel_record();
        assert_eq!(record.insert_number(), None);
        record.assign_insert_number(InsertNumber(5)).unwrap();
        assert_eq!(
            record.assign_insert_number(InsertNumber(6)),
            Err(CoreError::InsertNumberAlreadyAssigned {
                existing: 5,
                requested: 6
            })
        );
        assert_eq!(record.insert_number(), Some(InsertNumber(5)));
    }

    #[test]
    fn equality_ignores_insert_number() {
        let mut a = channel_record();
        let mut b = channel_record();
        a.assign_insert_number(InsertNumber(1)).unwrap();
        b.assign_insert_number(InsertNumber(2)).unwrap();
        assert_eq!(a, b);

        let c = GladRecord::channel(ChannelSample::new("A-0001", ChannelType::SignedInt, vec![0xFD]))
            .with_event_time(1_000)
            .with_ert(Timestamp::new(900, 12))
            .with_venue("TESTSET")
            .with_session_number(7)
            .with_host("gds1")
            .build();
        assert_ne!(a, c);
    }

    #[test]
    fn identifiers_per_variant() {
        assert_eq!(channel_record().identifier(), "A-0001");

        let evr = GladRecord::event(EventRecord::new(3, "WARNING_LO")).build();
        assert_eq!(evr.identifier(), "WARNING_LO");

        let history = GladRecord::alarm_history(AlarmHistory::new(Vec::new()))
            .with_host("gds1")
            .with_venue("OPS")
            .with_session_number(42)
            .build();
        assert_eq!(history.identifier(), "gds1:OPS:42");
    }

    #[test]
    fn primary_time_by_basis() {
        let record = GladRecord::channel(ChannelSample::new("A", ChannelType::Float, vec![0; 4]))
            .with_event_time(50)
            .with_ert(Timestamp::new(10, 1))
            .with_scet(Timestamp::new(20, 2));

        let ert = record.clone().build();
        assert_eq!(ert.envelope().primary_milliseconds(), Some(10));
        assert_eq!(ert.envelope().primary_nanoseconds(), Some(1));

        let event = record.clone().with_time_basis(TimeBasis::Event).build();
        assert_eq!(event.envelope().primary_milliseconds(), Some(50));
        assert_eq!(event.envelope().primary_nanoseconds(), Some(0));

        for basis in [TimeBasis::Scet, TimeBasis::Sclk, TimeBasis::Lst, TimeBasis::All] {
            let r = record.clone().with_time_basis(basis).build();
            assert_eq!(r.envelope().primary_milliseconds(), Some(20));
            assert_eq!(r.envelope().primary_nanoseconds(), Some(2));
        }
    }

    #[test]
    fn time_delta_needs_event_time() {
        assert_eq!(channel_record().create_time_delta(1_250), Some(250));
        let no_event = GladRecord::event(EventRecord::new(1, "INFO")).build();
        assert_eq!(no_event.create_time_delta(1_250), None);
    }

    #[test]
    fn time_delta_saturates_on_extreme_times() {
        let future = GladRecord::event(EventRecord::new(1, "INFO"))
            .with_event_time(u64::MAX)
            .build();
        assert_eq!(future.create_time_delta(5), Some(i64::MIN));
        assert_eq!(future.create_time_delta(u64::MAX - 3), Some(-3));

        let epoch = GladRecord::event(EventRecord::new(1, "INFO"))
            .with_event_time(0)
            .build();
        assert_eq!(epoch.create_time_delta(u64::MAX), Some(i64::MAX));
        assert_eq!(epoch.create_time_delta(1 << 63), Some(i64::MAX));
        assert_eq!(epoch.create_time_delta((1 << 63) - 1), Some(i64::MAX));
    }

    #[test]
    fn variant_accessors() {
        let record = channel_record();
        assert_eq!(record.variant_name(), "eha");
        assert!(record.as_channel().is_some());
        assert!(record.as_event().is_none());
        assert!(record.as_alarm_history().is_none());
    }
}
