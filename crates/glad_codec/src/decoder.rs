//! Payload to record decoding.

use ciborium::value::{Integer, Value};
use glad_core::{
    AlarmHistory, AlarmLevel, AlarmValue, AlarmValueSet, ChannelSample, ChannelType, Envelope,
    EventRecord, EvrField, GladRecord, RecordBody, Sclk, TimeBasis, Timestamp, UserDataType,
};

use crate::error::{CodecError, CodecResult};
use crate::schema;

/// Decodes a record from separately encoded envelope and variant maps.
pub fn decode_parts(envelope_bytes: &[u8], variant_bytes: &[u8]) -> CodecResult<GladRecord> {
    let envelope = envelope_from(&read_value(envelope_bytes)?)?;
    let body = body_from(&read_value(variant_bytes)?)?;
    Ok(GladRecord::from_parts(envelope, body))
}

/// Decodes a full `[envelope, variant]` payload.
///
/// The payload must be exactly one CBOR item; trailing bytes are an error.
pub fn decode(bytes: &[u8]) -> CodecResult<GladRecord> {
    let value = read_value(bytes)?;
    let Value::Array(items) = value else {
        return Err(CodecError::invalid_structure("payload is not an array"));
    };
    let [envelope, variant] = items.as_slice() else {
        return Err(CodecError::invalid_structure(format!(
            "payload has {} items, expected 2",
            items.len()
        )));
    };
    Ok(GladRecord::from_parts(envelope_from(envelope)?, body_from(variant)?))
}

pub(crate) fn read_value(bytes: &[u8]) -> CodecResult<Value> {
    let mut remaining = bytes;
    let value: Value = ciborium::from_reader(&mut remaining)
        .map_err(|e| CodecError::decoding_failed(e.to_string()))?;
    if !remaining.is_empty() {
        return Err(CodecError::TrailingBytes {
            count: remaining.len(),
        });
    }
    Ok(value)
}

/// View over a CBOR map with integer keys.
struct Fields<'a> {
    scope: &'static str,
    entries: &'a [(Value, Value)],
}

impl<'a> Fields<'a> {
    fn new(scope: &'static str, value: &'a Value) -> CodecResult<Self> {
        match value {
            Value::Map(entries) => Ok(Self { scope, entries }),
            _ => Err(CodecError::invalid_structure(format!("{scope} is not a map"))),
        }
    }

    fn get(&self, key: u64) -> Option<&'a Value> {
        self.entries.iter().find_map(|(k, v)| match k {
            Value::Integer(i) if i128::from(*i) == i128::from(key) => Some(v),
            _ => None,
        })
    }

    fn required(&self, key: u64, field: &'static str) -> CodecResult<&'a Value> {
        self.get(key)
            .ok_or_else(|| CodecError::missing_field(self.scope, field))
    }

    fn int<T: TryFrom<i128>>(&self, value: &Value, field: &'static str) -> CodecResult<T> {
        let Value::Integer(i) = value else {
            return Err(CodecError::invalid_field(self.scope, field, "expected integer"));
        };
        T::try_from(i128::from(*i))
            .map_err(|_| CodecError::invalid_field(self.scope, field, "integer out of range"))
    }

    fn required_int<T: TryFrom<i128>>(&self, key: u64, field: &'static str) -> CodecResult<T> {
        self.int(self.required(key, field)?, field)
    }

    fn required_text(&self, key: u64, field: &'static str) -> CodecResult<String> {
        self.text(self.required(key, field)?, field)
    }

    fn optional_text(&self, key: u64, field: &'static str) -> CodecResult<Option<String>> {
        self.get(key).map(|v| self.text(v, field)).transpose()
    }

    fn text(&self, value: &Value, field: &'static str) -> CodecResult<String> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            _ => Err(CodecError::invalid_field(self.scope, field, "expected text")),
        }
    }

    fn optional_bytes(&self, key: u64, field: &'static str) -> CodecResult<Option<Vec<u8>>> {
        self.get(key)
            .map(|v| match v {
                Value::Bytes(b) => Ok(b.clone()),
                _ => Err(CodecError::invalid_field(self.scope, field, "expected bytes")),
            })
            .transpose()
    }

    fn required_bytes(&self, key: u64, field: &'static str) -> CodecResult<Vec<u8>> {
        self.optional_bytes(key, field)?
            .ok_or_else(|| CodecError::missing_field(self.scope, field))
    }

    fn flag(&self, key: u64, field: &'static str) -> CodecResult<bool> {
        match self.get(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(CodecError::invalid_field(self.scope, field, "expected bool")),
        }
    }

    fn optional_pair<A, B>(&self, key: u64, field: &'static str) -> CodecResult<Option<(A, B)>>
    where
        A: TryFrom<i128>,
        B: TryFrom<i128>,
    {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match value {
            Value::Array(items) if items.len() == 2 => {
                Ok(Some((self.int(&items[0], field)?, self.int(&items[1], field)?)))
            }
            _ => Err(CodecError::invalid_field(self.scope, field, "expected a pair")),
        }
    }
}

fn envelope_from(value: &Value) -> CodecResult<Envelope> {
    use schema::envelope as k;

    let fields = Fields::new("envelope", value)?;
    let primary_time_basis = match fields.get(k::TIME_BASIS) {
        Some(v) => TimeBasis::from_tag(fields.int(v, "primary_time_basis")?)?,
        None => TimeBasis::Ert,
    };

    Ok(Envelope {
        event_time: fields
            .get(k::EVENT_TIME)
            .map(|v| fields.int(v, "event_time"))
            .transpose()?,
        sclk: fields
            .optional_pair(k::SCLK, "sclk")?
            .map(|(coarse, fine)| Sclk::new(coarse, fine)),
        ert: fields
            .optional_pair(k::ERT, "ert")?
            .map(|(ms, ns)| Timestamp::new(ms, ns)),
        scet: fields
            .optional_pair(k::SCET, "scet")?
            .map(|(ms, ns)| Timestamp::new(ms, ns)),
        venue: fields.required_text(k::VENUE, "venue")?,
        session_number: fields.required_int(k::SESSION_NUMBER, "session_number")?,
        spacecraft_id: fields.required_int(k::SPACECRAFT_ID, "spacecraft_id")?,
        station_id: fields.required_int(k::STATION_ID, "station_id")?,
        vcid: fields.required_int(k::VCID, "vcid")?,
        host: fields.required_text(k::HOST, "host")?,
        user_data_type: UserDataType(fields.required_int(k::USER_DATA_TYPE, "user_data_type")?),
        primary_time_basis,
    })
}

fn body_from(value: &Value) -> CodecResult<RecordBody> {
    let Value::Map(entries) = value else {
        return Err(CodecError::invalid_structure("variant is not a map"));
    };
    let [(Value::Text(name), fields)] = entries.as_slice() else {
        return Err(CodecError::invalid_structure(
            "variant map must hold exactly one named entry",
        ));
    };

    match name.as_str() {
        schema::variant::EHA => channel_from(fields).map(RecordBody::Channel),
        schema::variant::EVR => event_from(fields).map(RecordBody::Event),
        schema::variant::ALARM_HISTORY => alarm_history_from(fields).map(RecordBody::AlarmHistory),
        other => Err(CodecError::UnknownVariant {
            name: other.to_string(),
        }),
    }
}

fn channel_from(value: &Value) -> CodecResult<ChannelSample> {
    use schema::channel as k;

    let fields = Fields::new(schema::variant::EHA, value)?;
    let channel_id = fields.required_text(k::CHANNEL_ID, "channel_id")?;
    let dn_type = ChannelType::from_tag(fields.required_int(k::DN_TYPE, "dn_type")?)?;
    let dn = fields.required_bytes(k::DN, "dn")?;

    let mut sample = ChannelSample::new(channel_id, dn_type, dn)
        .with_eu_raw(fields.optional_bytes(k::EU, "eu")?.unwrap_or_default())
        .with_realtime(fields.flag(k::REALTIME, "realtime")?)
        .with_header(fields.flag(k::HEADER, "header")?)
        .with_monitor(fields.flag(k::MONITOR, "monitor")?)
        .with_sse(fields.flag(k::SSE, "sse")?)
        .with_fsw(fields.flag(k::FSW, "fsw")?);

    if let Some(status) = fields.optional_text(k::STATUS, "status")? {
        sample = sample.with_status(status);
    }
    if let Some(alarms) = fields.get(k::ALARMS) {
        sample = sample.with_alarms(alarms_from(&fields, alarms)?);
    }
    Ok(sample)
}

fn alarms_from(fields: &Fields<'_>, value: &Value) -> CodecResult<AlarmValueSet> {
    let Value::Array(items) = value else {
        return Err(CodecError::invalid_field(fields.scope, "alarms", "expected array"));
    };
    items
        .iter()
        .map(|item| -> CodecResult<AlarmValue> {
            let Value::Array(parts) = item else {
                return Err(CodecError::invalid_field(
                    fields.scope,
                    "alarms",
                    "expected array entry",
                ));
            };
            match parts.as_slice() {
                [Value::Integer(level), Value::Bool(on_eu), Value::Text(state)] => Ok(AlarmValue::new(
                    AlarmLevel::from_tag(integer_i64(*level))?,
                    *on_eu,
                    state.clone(),
                )),
                _ => Err(CodecError::invalid_field(
                    fields.scope,
                    "alarms",
                    "expected [level, on_eu, state]",
                )),
            }
        })
        .collect()
}

fn integer_i64(i: Integer) -> i64 {
    i64::try_from(i128::from(i)).unwrap_or(i64::MAX)
}

fn event_from(value: &Value) -> CodecResult<EventRecord> {
    use schema::event as k;

    let fields = Fields::new(schema::variant::EVR, value)?;
    let mut event = EventRecord::new(
        fields.required_int(k::EVR_ID, "evr_id")?,
        fields.required_text(k::LEVEL, "level")?,
    )
    .with_realtime(fields.flag(k::REALTIME, "realtime")?)
    .with_fsw(fields.flag(k::FSW, "fsw")?);

    for field in EvrField::ALL {
        if let Some(raw) = fields.optional_bytes(k::metadata_key(field), field.name())? {
            event = event.with_field(field, raw);
        }
    }
    Ok(event)
}

fn alarm_history_from(value: &Value) -> CodecResult<AlarmHistory> {
    let fields = Fields::new(schema::variant::ALARM_HISTORY, value)?;
    let snapshot = fields.required_bytes(schema::alarm_history::SNAPSHOT, "snapshot")?;
    Ok(AlarmHistory::new(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{encode, encode_envelope, encode_variant, write_value};
    use glad_core::InsertNumber;

    fn channel_record() -> GladRecord {
        GladRecord::channel(
            ChannelSample::new("B-0042", ChannelType::Status, vec![0x01])
                .with_status("ON")
                .with_alarm(AlarmValue::new(AlarmLevel::Red, false, "HI")),
        )
        .with_ert(Timestamp::new(1_700_000_000_000, 250))
        .with_venue("OPS")
        .with_session_number(12)
        .with_spacecraft_id(-1)
        .with_station_id(-14)
        .with_vcid(3)
        .with_host("gds2")
        .build()
    }

    #[test]
    fn decode_parts_matches_source() {
        let record = channel_record();
        let decoded = decode_parts(
            &encode_envelope(&record).unwrap(),
            &encode_variant(&record).unwrap(),
        )
        .unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn decoded_record_has_no_insert_number() {
        let mut record = channel_record();
        record.assign_insert_number(InsertNumber(9)).unwrap();
        let decoded = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(decoded.insert_number(), None);
        assert_eq!(decoded, record);
    }

    #[test]
    fn missing_dn_type_is_reported() {
        let record = channel_record();
        let variant = Value::Map(vec![(
            Value::Text("eha".into()),
            Value::Map(vec![
                (Value::Integer(1.into()), Value::Text("B-0042".into())),
                (Value::Integer(3.into()), Value::Bytes(vec![1])),
            ]),
        )]);
        let err = decode_parts(&encode_envelope(&record).unwrap(), &write_value(&variant).unwrap())
            .unwrap_err();
        assert_eq!(err, CodecError::missing_field("eha", "dn_type"));
    }

    #[test]
    fn missing_envelope_host_is_reported() {
        let envelope = Value::Map(vec![
            (Value::Integer(5.into()), Value::Text("OPS".into())),
            (Value::Integer(6.into()), Value::Integer(1.into())),
            (Value::Integer(7.into()), Value::Integer(1.into())),
            (Value::Integer(8.into()), Value::Integer(1.into())),
            (Value::Integer(9.into()), Value::Integer(1.into())),
            (Value::Integer(11.into()), Value::Integer(0.into())),
        ]);
        let err = decode_parts(
            &write_value(&envelope).unwrap(),
            &encode_variant(&channel_record()).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, CodecError::missing_field("envelope", "host"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let record = channel_record();
        let mut envelope: Value = ciborium::from_reader(encode_envelope(&record).unwrap().as_slice()).unwrap();
        if let Value::Map(entries) = &mut envelope {
            entries.push((Value::Integer(99.into()), Value::Text("future".into())));
        }
        let decoded = decode_parts(
            &write_value(&envelope).unwrap(),
            &encode_variant(&record).unwrap(),
        )
        .unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = encode(&channel_record()).unwrap();
        bytes.push(0x00);
        assert_eq!(decode(&bytes).unwrap_err(), CodecError::TrailingBytes { count: 1 });
    }

    #[test]
    fn truncated_payload_fails() {
        let bytes = encode(&channel_record()).unwrap();
        assert!(matches!(
            decode(&bytes[..bytes.len() - 1]),
            Err(CodecError::DecodingFailed { .. })
        ));
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let payload = Value::Array(vec![
            ciborium::from_reader(encode_envelope(&channel_record()).unwrap().as_slice()).unwrap(),
            Value::Map(vec![(Value::Text("product".into()), Value::Map(vec![]))]),
        ]);
        assert_eq!(
            decode(&write_value(&payload).unwrap()).unwrap_err(),
            CodecError::UnknownVariant {
                name: "product".into()
            }
        );
    }

    #[test]
    fn out_of_range_station_is_rejected() {
        let envelope = Value::Map(vec![
            (Value::Integer(5.into()), Value::Text("OPS".into())),
            (Value::Integer(6.into()), Value::Integer(1.into())),
            (Value::Integer(7.into()), Value::Integer(1.into())),
            (Value::Integer(8.into()), Value::Integer(300.into())),
            (Value::Integer(9.into()), Value::Integer(1.into())),
            (Value::Integer(10.into()), Value::Text("h".into())),
            (Value::Integer(11.into()), Value::Integer(0.into())),
        ]);
        let err = decode_parts(
            &write_value(&envelope).unwrap(),
            &encode_variant(&channel_record()).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidField {
                field: "station_id",
                ..
            }
        ));
    }

    #[test]
    fn bad_channel_type_surfaces_core_error() {
        let variant = Value::Map(vec![(
            Value::Text("eha".into()),
            Value::Map(vec![
                (Value::Integer(1.into()), Value::Text("X".into())),
                (Value::Integer(2.into()), Value::Integer(42.into())),
                (Value::Integer(3.into()), Value::Bytes(vec![1])),
            ]),
        )]);
        let err = decode_parts(
            &encode_envelope(&channel_record()).unwrap(),
            &write_value(&variant).unwrap(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CodecError::Core(glad_core::CoreError::InvalidChannelType { tag: 42 })
        );
    }
}
