//! Record to payload encoding.

use ciborium::value::Value;
use glad_core::{
    AlarmHistory, ChannelSample, Envelope, EventRecord, EvrField, GladRecord, RecordBody,
    TimeBasis, Timestamp,
};

use crate::error::{CodecError, CodecResult};
use crate::schema;

/// Encodes the envelope map of a record.
///
/// Absent time values are left out of the map entirely.
pub fn encode_envelope(record: &GladRecord) -> CodecResult<Vec<u8>> {
    write_value(&envelope_value(record.envelope()))
}

/// Encodes the variant map of a record: a single entry keyed by the variant
/// name whose value is the variant's field map.
pub fn encode_variant(record: &GladRecord) -> CodecResult<Vec<u8>> {
    write_value(&variant_value(record.body()))
}

/// Encodes a full payload: `[envelope, variant]`.
pub fn encode(record: &GladRecord) -> CodecResult<Vec<u8>> {
    write_value(&Value::Array(vec![
        envelope_value(record.envelope()),
        variant_value(record.body()),
    ]))
}

pub(crate) fn write_value(value: &Value) -> CodecResult<Vec<u8>> {
    let mut out = Vec::new();
    ciborium::into_writer(value, &mut out).map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    Ok(out)
}

fn key(k: u64) -> Value {
    Value::Integer(k.into())
}

fn timestamp_value(t: Timestamp) -> Value {
    Value::Array(vec![
        Value::Integer(t.milliseconds.into()),
        Value::Integer(t.nanoseconds.into()),
    ])
}

fn envelope_value(env: &Envelope) -> Value {
    use schema::envelope as k;

    let mut map = Vec::with_capacity(12);
    if let Some(event_time) = env.event_time {
        map.push((key(k::EVENT_TIME), Value::Integer(event_time.into())));
    }
    if let Some(sclk) = env.sclk {
        map.push((
            key(k::SCLK),
            Value::Array(vec![
                Value::Integer(sclk.coarse.into()),
                Value::Integer(sclk.fine.into()),
            ]),
        ));
    }
    if let Some(ert) = env.ert {
        map.push((key(k::ERT), timestamp_value(ert)));
    }
    if let Some(scet) = env.scet {
        map.push((key(k::SCET), timestamp_value(scet)));
    }
    map.push((key(k::VENUE), Value::Text(env.venue.clone())));
    map.push((key(k::SESSION_NUMBER), Value::Integer(env.session_number.into())));
    map.push((key(k::SPACECRAFT_ID), Value::Integer(env.spacecraft_id.into())));
    map.push((key(k::STATION_ID), Value::Integer(env.station_id.into())));
    map.push((key(k::VCID), Value::Integer(env.vcid.into())));
    map.push((key(k::HOST), Value::Text(env.host.clone())));
    map.push((
        key(k::USER_DATA_TYPE),
        Value::Integer(env.user_data_type.as_u8().into()),
    ));
    if env.primary_time_basis != TimeBasis::Ert {
        map.push((
            key(k::TIME_BASIS),
            Value::Integer(env.primary_time_basis.as_tag().into()),
        ));
    }
    Value::Map(map)
}

fn variant_value(body: &RecordBody) -> Value {
    let (name, fields) = match body {
        RecordBody::Channel(c) => (schema::variant::EHA, channel_value(c)),
        RecordBody::Event(e) => (schema::variant::EVR, event_value(e)),
        RecordBody::AlarmHistory(h) => (schema::variant::ALARM_HISTORY, alarm_history_value(h)),
    };
    Value::Map(vec![(Value::Text(name.to_string()), fields)])
}

fn channel_value(sample: &ChannelSample) -> Value {
    use schema::channel as k;

    let mut map = vec![
        (key(k::CHANNEL_ID), Value::Text(sample.channel_id().to_string())),
        (key(k::DN_TYPE), Value::Integer(sample.dn_type().as_tag().into())),
        (key(k::DN), Value::Bytes(sample.dn_raw().to_vec())),
    ];
    if sample.has_eu() {
        map.push((key(k::EU), Value::Bytes(sample.eu_raw().to_vec())));
    }
    if !sample.status().is_empty() {
        map.push((key(k::STATUS), Value::Text(sample.status().to_string())));
    }
    if !sample.alarms().is_empty() {
        let alarms = sample
            .alarms()
            .values()
            .iter()
            .map(|a| {
                Value::Array(vec![
                    Value::Integer(a.level.as_tag().into()),
                    Value::Bool(a.on_eu),
                    Value::Text(a.state.clone()),
                ])
            })
            .collect();
        map.push((key(k::ALARMS), Value::Array(alarms)));
    }
    map.push((key(k::REALTIME), Value::Bool(sample.is_realtime())));
    map.push((key(k::HEADER), Value::Bool(sample.is_header())));
    map.push((key(k::MONITOR), Value::Bool(sample.is_monitor())));
    map.push((key(k::SSE), Value::Bool(sample.is_sse())));
    map.push((key(k::FSW), Value::Bool(sample.is_fsw())));
    Value::Map(map)
}

fn event_value(event: &EventRecord) -> Value {
    use schema::event as k;

    let mut map = vec![
        (key(k::EVR_ID), Value::Integer(event.evr_id().into())),
        (key(k::LEVEL), Value::Text(event.level().to_string())),
    ];
    for field in EvrField::ALL {
        let raw = event.raw(field);
        if !raw.is_empty() {
            map.push((key(k::metadata_key(field)), Value::Bytes(raw.to_vec())));
        }
    }
    map.push((key(k::REALTIME), Value::Bool(event.is_realtime())));
    map.push((key(k::FSW), Value::Bool(event.is_fsw())));
    Value::Map(map)
}

fn alarm_history_value(history: &AlarmHistory) -> Value {
    Value::Map(vec![(
        key(schema::alarm_history::SNAPSHOT),
        Value::Bytes(history.snapshot().to_vec()),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use glad_core::{ChannelType, Sclk};

    fn minimal() -> GladRecord {
        GladRecord::channel(ChannelSample::new("A-1", ChannelType::UnsignedInt, vec![7]))
            .with_venue("V")
            .with_host("h")
            .build()
    }

    #[test]
    fn absent_time_pairs_are_omitted() {
        let bare = encode_envelope(&minimal()).unwrap();
        let timed = encode_envelope(
            &GladRecord::channel(ChannelSample::new("A-1", ChannelType::UnsignedInt, vec![7]))
                .with_venue("V")
                .with_host("h")
                .with_event_time(1)
                .with_sclk(Sclk::new(2, 3))
                .with_ert(Timestamp::new(4, 5))
                .with_scet(Timestamp::new(6, 7))
                .build(),
        )
        .unwrap();
        assert!(timed.len() > bare.len());

        let value: Value = ciborium::from_reader(bare.as_slice()).unwrap();
        let Value::Map(entries) = value else {
            panic!("envelope is not a map");
        };
        let keys: Vec<_> = entries
            .iter()
            .filter_map(|(k, _)| match k {
                Value::Integer(i) => Some(i128::from(*i)),
                _ => None,
            })
            .collect();
        assert_eq!(keys, vec![5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn time_basis_written_only_when_not_ert() {
        let ert = encode_envelope(&minimal()).unwrap();
        let scet = encode_envelope(
            &GladRecord::channel(ChannelSample::new("A-1", ChannelType::UnsignedInt, vec![7]))
                .with_venue("V")
                .with_host("h")
                .with_time_basis(TimeBasis::Scet)
                .build(),
        )
        .unwrap();
        assert_eq!(scet.len(), ert.len() + 2);
    }

    #[test]
    fn variant_map_is_keyed_by_name() {
        let bytes = encode_variant(&minimal()).unwrap();
        let value: Value = ciborium::from_reader(bytes.as_slice()).unwrap();
        let Value::Map(entries) = value else {
            panic!("variant is not a map");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, Value::Text("eha".into()));
    }
}
