//! Benchmark utilities.

use glad_codec::to_packet_bytes;
use glad_core::{
    AlarmHistory, AlarmLevel, AlarmValue, ChannelSample, ChannelType, EventRecord, GladRecord,
    Timestamp,
};
use rand::Rng;

/// Generate random bytes of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate a channel sample record with a random 4-byte DN.
pub fn random_channel_record(index: u64) -> GladRecord {
    let mut rng = rand::thread_rng();
    let dn: i32 = rng.gen();
    let eu: f64 = rng.gen_range(-500.0..500.0);
    GladRecord::channel(
        ChannelSample::new(
            format!("B-{:04}", index % 10_000),
            ChannelType::SignedInt,
            dn.to_be_bytes(),
        )
        .with_eu_raw(eu.to_be_bytes())
        .with_alarm(AlarmValue::new(AlarmLevel::Red, true, "HIGH_ALARM")),
    )
    .with_ert(Timestamp::new(
        rng.gen_range(0..u64::from(u32::MAX)),
        rng.gen_range(0..1_000_000),
    ))
    .with_scet(Timestamp::from_millis(rng.gen_range(0..u64::from(u32::MAX))))
    .with_venue("OPS")
    .with_session_number(7)
    .with_spacecraft_id(76)
    .with_host("gds-bench")
    .build()
}

/// Generate an event record with a message of `message_len` bytes.
pub fn random_event_record(index: u64, message_len: usize) -> GladRecord {
    let message: String = (0..message_len)
        .map(|_| rand::thread_rng().gen_range(b'a'..=b'z') as char)
        .collect();
    GladRecord::event(EventRecord::new(index as i64, "ACTIVITY_HI").with_message(message))
        .with_event_time(index)
        .with_venue("OPS")
        .with_host("gds-bench")
        .build()
}

/// Generate an alarm history record with a random snapshot.
pub fn random_alarm_history(snapshot_size: usize) -> GladRecord {
    GladRecord::alarm_history(AlarmHistory::new(random_data(snapshot_size)))
        .with_venue("OPS")
        .with_host("gds-bench")
        .build()
}

/// Generate `count` mixed records.
pub fn generate_records(count: usize) -> Vec<GladRecord> {
    (0..count as u64)
        .map(|i| match i % 4 {
            3 => random_event_record(i, 48),
            _ => random_channel_record(i),
        })
        .collect()
}

/// Concatenated packets for `records`.
pub fn packet_stream(records: &[GladRecord]) -> Vec<u8> {
    records
        .iter()
        .flat_map(|r| to_packet_bytes(r).unwrap_or_default())
        .collect()
}
