//! Dump command implementation.

use glad_codec::SampleValues;
use glad_core::{GladRecord, RecordBody};
use glad_stream::{DeliveredRecord, ReconstructorConfig, RecordReconstructor, StreamError};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use super::open_input;

/// Record representation for output.
#[derive(Debug, Serialize)]
pub struct RecordInfo {
    /// Stream offset of the frame marker.
    pub offset: u64,
    /// Record variant.
    pub variant: &'static str,
    /// Channel ID, EVR level, or host/venue/session.
    pub identifier: String,
    /// User data type tag.
    pub user_data_type: u8,
    /// Primary time basis.
    pub time_basis: String,
    /// Earth receive time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ert: Option<String>,
    /// Spacecraft event time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scet: Option<String>,
    /// Event time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_time: Option<u64>,
    /// Spacecraft clock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sclk: Option<String>,
    /// Interpreted DN (channel samples).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dn: Option<String>,
    /// Interpreted EU (channel samples).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eu: Option<f64>,
    /// Worst DN alarm state (channel samples).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm: Option<String>,
    /// EVR message (event records).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Snapshot size in bytes (alarm history).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_size: Option<usize>,
    /// Completeness in verified streams.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completeness: Option<String>,
}

impl RecordInfo {
    /// Builds the output view of a delivered record.
    pub fn from_delivered(delivered: &DeliveredRecord<GladRecord>) -> Self {
        let record = &delivered.record;
        let envelope = record.envelope();
        let mut info = RecordInfo {
            offset: delivered.offset,
            variant: record.variant_name(),
            identifier: record.identifier().into_owned(),
            user_data_type: record.user_data_type().0,
            time_basis: envelope.primary_time_basis.to_string(),
            ert: envelope.ert.map(|t| t.to_string()),
            scet: envelope.scet.map(|t| t.to_string()),
            event_time: envelope.event_time,
            sclk: envelope.sclk.map(|s| s.to_string()),
            dn: None,
            eu: None,
            alarm: None,
            message: None,
            snapshot_size: None,
            completeness: delivered.completeness.map(|c| c.to_string()),
        };

        match record.body() {
            RecordBody::Channel(sample) => {
                info.dn = Some(match sample.dn() {
                    Ok(dn) => dn.to_string(),
                    Err(e) => format!("<{e}>"),
                });
                info.eu = sample.eu().ok().flatten();
                if sample.alarms().in_alarm() {
                    info.alarm = Some(format!(
                        "{} {}",
                        sample.alarm_level(false),
                        sample.alarm_state(false)
                    ));
                }
            }
            RecordBody::Event(event) => {
                info.message = Some(event.message().into_owned());
            }
            RecordBody::AlarmHistory(history) => {
                info.snapshot_size = Some(history.snapshot().len());
            }
        }
        info
    }
}

/// Frame fault representation for output.
#[derive(Debug, Serialize)]
pub struct FaultInfo {
    /// Stream offset of the frame marker.
    pub offset: u64,
    /// Description.
    pub error: String,
}

impl From<&StreamError> for FaultInfo {
    fn from(fault: &StreamError) -> Self {
        Self {
            offset: fault.offset(),
            error: fault.to_string(),
        }
    }
}

/// One line of dump output.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DumpEntry {
    /// A decoded record.
    Record(RecordInfo),
    /// A frame that failed.
    Fault(FaultInfo),
}

/// Runs the dump command.
pub fn run(
    input: &Path,
    config: ReconstructorConfig,
    limit: Option<usize>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = open_input(input)?;
    let entries = read_entries(source, config, limit);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        _ => {
            print_text_output(&entries);
        }
    }

    Ok(())
}

/// Reads up to `limit` records, keeping faults inline.
pub fn read_entries<R: Read>(
    source: R,
    config: ReconstructorConfig,
    limit: Option<usize>,
) -> Vec<DumpEntry> {
    let max_records = limit.unwrap_or(usize::MAX);
    let mut reader = RecordReconstructor::new(source, config);
    let mut entries = Vec::new();
    let mut records = 0;

    while records < max_records {
        let Some(item) = reader.next() else {
            break;
        };
        match item {
            Ok(delivered) => {
                records += 1;
                entries.push(DumpEntry::Record(RecordInfo::from_delivered(&delivered)));
            }
            Err(fault) => entries.push(DumpEntry::Fault(FaultInfo::from(&fault))),
        }
    }

    entries
}

fn print_text_output(entries: &[DumpEntry]) {
    println!(
        "{:<10} {:<14} {:<4} {:<28} {:<20}",
        "Offset", "Variant", "UDT", "Time", "Identifier"
    );
    println!("{}", "-".repeat(80));

    for entry in entries {
        match entry {
            DumpEntry::Record(info) => {
                let time = info
                    .ert
                    .clone()
                    .or_else(|| info.scet.clone())
                    .or_else(|| info.event_time.map(|t| t.to_string()))
                    .unwrap_or_else(|| "-".to_string());
                let mut detail = String::new();
                if let Some(dn) = &info.dn {
                    detail.push_str(&format!(" dn={dn}"));
                }
                if let Some(eu) = info.eu {
                    detail.push_str(&format!(" eu={eu}"));
                }
                if let Some(alarm) = &info.alarm {
                    detail.push_str(&format!(" alarm={alarm}"));
                }
                if let Some(message) = &info.message {
                    detail.push_str(&format!(" msg={message:?}"));
                }
                if let Some(size) = info.snapshot_size {
                    detail.push_str(&format!(" snapshot={size}B"));
                }
                if let Some(completeness) = &info.completeness {
                    detail.push_str(&format!(" [{completeness}]"));
                }
                println!(
                    "{:<10} {:<14} {:<4} {:<28} {:<20}{}",
                    info.offset, info.variant, info.user_data_type, time, info.identifier, detail
                );
            }
            DumpEntry::Fault(fault) => {
                println!("{:<10} FAULT: {}", fault.offset, fault.error);
            }
        }
    }

    let records = entries
        .iter()
        .filter(|e| matches!(e, DumpEntry::Record(_)))
        .count();
    println!();
    println!("Total: {} records, {} faults", records, entries.len() - records);
}
