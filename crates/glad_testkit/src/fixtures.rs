//! Fixture records and packet streams.

use std::io::Write;

use glad_codec::{to_packet_bytes, VerifiedCounts};
use glad_core::{
    AlarmHistory, AlarmLevel, AlarmValue, ChannelSample, ChannelType, EventRecord, EvrField,
    GladRecord, Sclk, Timestamp,
};
use tempfile::NamedTempFile;

/// Base ERT of the fixture records, in milliseconds.
pub const FIXTURE_EPOCH_MS: u64 = 1_700_000_000_000;

/// A signed-int channel sample whose DN is `-(index + 1)` in one byte.
pub fn sample_channel_record(index: u64) -> GladRecord {
    let dn = (-((index % 100) as i8) - 1) as u8;
    GladRecord::channel(
        ChannelSample::new(format!("A-{index:04}"), ChannelType::SignedInt, vec![dn])
            .with_eu_raw((index as f64 * 0.5).to_be_bytes().to_vec())
            .with_alarm(AlarmValue::new(AlarmLevel::Yellow, false, "LOW_WARN")),
    )
    .with_event_time(FIXTURE_EPOCH_MS + index * 10 + 5)
    .with_sclk(Sclk::new(800_000_000 + index, 0))
    .with_ert(Timestamp::new(FIXTURE_EPOCH_MS + index * 10, 250))
    .with_scet(Timestamp::new(FIXTURE_EPOCH_MS + index * 10 - 60_000, 0))
    .with_venue("TESTSET")
    .with_session_number(1)
    .with_spacecraft_id(76)
    .with_station_id(14)
    .with_vcid(0)
    .with_host("gds-test")
    .build()
}

/// A flight software event record.
pub fn sample_event_record(index: u64) -> GladRecord {
    GladRecord::event(
        EventRecord::new(index as i64, "WARNING_HI")
            .with_name("THRM_OVER_TEMP")
            .with_message(format!("heater {index} above limit"))
            .with_field(EvrField::TaskName, b"thrm".to_vec()),
    )
    .with_event_time(FIXTURE_EPOCH_MS + index * 10 + 5)
    .with_ert(Timestamp::new(FIXTURE_EPOCH_MS + index * 10, 500))
    .with_venue("TESTSET")
    .with_session_number(1)
    .with_spacecraft_id(76)
    .with_host("gds-test")
    .build()
}

/// An alarm history snapshot.
pub fn sample_alarm_history(index: u64) -> GladRecord {
    GladRecord::alarm_history(AlarmHistory::new(index.to_be_bytes().to_vec()))
        .with_event_time(FIXTURE_EPOCH_MS + index * 10)
        .with_venue("TESTSET")
        .with_session_number(1)
        .with_host("gds-test")
        .build()
}

/// `count` records cycling through the three variants.
pub fn sample_records(count: usize) -> Vec<GladRecord> {
    (0..count as u64)
        .map(|i| match i % 3 {
            0 => sample_channel_record(i),
            1 => sample_event_record(i),
            _ => sample_alarm_history(i),
        })
        .collect()
}

/// Concatenated packets for `records`.
pub fn packet_stream(records: &[GladRecord]) -> Vec<u8> {
    records
        .iter()
        .flat_map(|r| to_packet_bytes(r).expect("fixture record must encode"))
        .collect()
}

/// A verified stream: the count prefix followed by the packets.
pub fn verified_stream(counts: VerifiedCounts, records: &[GladRecord]) -> Vec<u8> {
    let mut out = counts.to_bytes().to_vec();
    out.extend(packet_stream(records));
    out
}

/// Writes `bytes` to a temporary file that lives as long as the handle.
pub fn write_stream_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(bytes).expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use glad_codec::{SampleValues, PACKET_MARKER};

    #[test]
    fn sample_dn_is_negative() {
        let record = sample_channel_record(4);
        let dn = record.as_channel().unwrap().dn().unwrap();
        assert_eq!(dn, glad_codec::DnValue::Signed(-5));
    }

    #[test]
    fn sample_records_cycle_variants() {
        let names: Vec<_> = sample_records(4).iter().map(|r| r.variant_name()).collect();
        assert_eq!(names, vec!["eha", "evr", "alarm_history", "eha"]);
    }

    #[test]
    fn verified_stream_starts_with_counts() {
        let stream = verified_stream(VerifiedCounts::new(1, 0, 0), &sample_records(1));
        assert_eq!(&stream[..12], &[0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&stream[12..16], &PACKET_MARKER);
    }
}
