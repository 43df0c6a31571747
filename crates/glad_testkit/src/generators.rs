//! Property-based test generators using proptest.
//!
//! Record strategies only produce records the codec can represent, so a
//! round trip through the wire format is expected to preserve content.

use glad_codec::{SampleValues, PACKET_MARKER};
use glad_core::{
    AlarmHistory, AlarmLevel, AlarmValue, ChannelSample, ChannelType, EventRecord, EvrField,
    GladRecord, GladRecordBuilder, RecordBody, Sclk, TimeBasis, Timestamp,
};
use proptest::prelude::*;

/// Strategy for optional ERT/SCET values.
pub fn timestamp_strategy() -> impl Strategy<Value = Option<Timestamp>> {
    proptest::option::of(
        (any::<u64>(), 0u32..1_000_000).prop_map(|(ms, ns)| Timestamp::new(ms, ns)),
    )
}

/// Strategy for primary time bases.
pub fn time_basis_strategy() -> impl Strategy<Value = TimeBasis> {
    prop::sample::select(TimeBasis::ALL_BASES.to_vec())
}

/// Strategy for alarm values.
pub fn alarm_value_strategy() -> impl Strategy<Value = AlarmValue> {
    (
        prop::sample::select(vec![AlarmLevel::None, AlarmLevel::Yellow, AlarmLevel::Red]),
        any::<bool>(),
        "[A-Z_]{0,12}",
    )
        .prop_map(|(level, on_eu, state)| AlarmValue::new(level, on_eu, state))
}

/// Strategy for raw DN bytes that are valid for the given type.
pub fn dn_raw_strategy(dn_type: ChannelType) -> BoxedStrategy<Vec<u8>> {
    match dn_type {
        ChannelType::Float => prop_oneof![
            any::<f32>().prop_map(|v| v.to_be_bytes().to_vec()),
            any::<f64>().prop_map(|v| v.to_be_bytes().to_vec()),
        ]
        .boxed(),
        ChannelType::Ascii => "[ -~]{0,24}".prop_map(String::into_bytes).boxed(),
        _ => prop::collection::vec(any::<u8>(), 1..=8).boxed(),
    }
}

/// Strategy for channel samples of any type.
pub fn channel_sample_strategy() -> impl Strategy<Value = ChannelSample> {
    prop::sample::select(ChannelType::ALL.to_vec())
        .prop_flat_map(|dn_type| {
            (
                Just(dn_type),
                "[A-Z]-[0-9]{4}",
                dn_raw_strategy(dn_type),
                proptest::option::of(any::<f64>()),
                "[A-Z]{0,8}",
                prop::collection::vec(alarm_value_strategy(), 0..4),
                prop::array::uniform5(any::<bool>()),
            )
        })
        .prop_map(|(dn_type, channel_id, dn, eu, status, alarms, flags)| {
            let [realtime, header, monitor, sse, fsw] = flags;
            ChannelSample::new(channel_id, dn_type, dn)
                .with_eu(eu)
                .with_status(status)
                .with_alarms(alarms.into_iter().collect())
                .with_realtime(realtime)
                .with_header(header)
                .with_monitor(monitor)
                .with_sse(sse)
                .with_fsw(fsw)
        })
}

/// Strategy for event records.
pub fn event_record_strategy() -> impl Strategy<Value = EventRecord> {
    (
        any::<i64>(),
        "(COMMAND|WARNING_HI|WARNING_LO|FATAL|ACTIVITY_HI)",
        prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), EvrField::ALL.len()),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(evr_id, level, blobs, realtime, fsw)| {
            EvrField::ALL
                .into_iter()
                .zip(blobs)
                .fold(EventRecord::new(evr_id, level), |evr, (field, raw)| {
                    evr.with_field(field, raw)
                })
                .with_realtime(realtime)
                .with_fsw(fsw)
        })
}

/// Strategy for alarm history snapshots.
pub fn alarm_history_strategy() -> impl Strategy<Value = AlarmHistory> {
    prop::collection::vec(any::<u8>(), 0..64).prop_map(AlarmHistory::new)
}

/// Strategy for record bodies of any variant.
pub fn record_body_strategy() -> impl Strategy<Value = RecordBody> {
    prop_oneof![
        3 => channel_sample_strategy().prop_map(RecordBody::Channel),
        2 => event_record_strategy().prop_map(RecordBody::Event),
        1 => alarm_history_strategy().prop_map(RecordBody::AlarmHistory),
    ]
}

/// Strategy for complete records.
pub fn glad_record_strategy() -> impl Strategy<Value = GladRecord> {
    (
        record_body_strategy(),
        proptest::option::of(any::<u64>()),
        proptest::option::of((any::<u64>(), any::<u64>())),
        timestamp_strategy(),
        timestamp_strategy(),
        ("[A-Z]{1,8}", any::<i64>(), any::<i32>(), any::<i8>(), any::<i8>(), "[a-z0-9-]{1,12}"),
        time_basis_strategy(),
    )
        .prop_map(|(body, event_time, sclk, ert, scet, identity, basis)| {
            let (venue, session, scid, station, vcid, host) = identity;
            let mut builder: GladRecordBuilder = GladRecord::builder(body)
                .with_venue(venue)
                .with_session_number(session)
                .with_spacecraft_id(scid)
                .with_station_id(station)
                .with_vcid(vcid)
                .with_host(host)
                .with_time_basis(basis);
            if let Some(event_time) = event_time {
                builder = builder.with_event_time(event_time);
            }
            if let Some((coarse, fine)) = sclk {
                builder = builder.with_sclk(Sclk::new(coarse, fine));
            }
            if let Some(ert) = ert {
                builder = builder.with_ert(ert);
            }
            if let Some(scet) = scet {
                builder = builder.with_scet(scet);
            }
            builder.build()
        })
}

/// Strategy for batches of records.
pub fn record_batch_strategy(
    min_records: usize,
    max_records: usize,
) -> impl Strategy<Value = Vec<GladRecord>> {
    prop::collection::vec(glad_record_strategy(), min_records..max_records)
}

/// Strategy for garbage that cannot contain or begin a packet marker.
pub fn garbage_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    let byte = any::<u8>().prop_filter("marker byte", |b| *b != PACKET_MARKER[0]);
    prop::collection::vec(byte, 1..=max_len)
}

/// Strategy for chunk sizes used to split a stream.
pub fn chunk_sizes_strategy(max_chunk: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1..=max_chunk, 1..64)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glad_codec::{decode, encode};

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn generated_dn_is_interpretable(sample in channel_sample_strategy()) {
            prop_assert!(sample.dn().is_ok());
            prop_assert!(sample.eu().is_ok());
        }

        #[test]
        fn generated_records_roundtrip(record in glad_record_strategy()) {
            let decoded = decode(&encode(&record).unwrap()).unwrap();
            prop_assert_eq!(decoded, record);
        }

        #[test]
        fn garbage_never_starts_a_marker(garbage in garbage_strategy(32)) {
            prop_assert!(!garbage.contains(&PACKET_MARKER[0]));
        }
    }
}
