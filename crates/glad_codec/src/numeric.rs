//! DN and EU interpretation.
//!
//! Channel samples carry their values as big-endian bytes whose width varies
//! with the producer. Reading them back depends on the channel type:
//!
//! | Type | 1..=4 bytes | 5..=8 bytes |
//! |---|---|---|
//! | signed, status | sign-extend to `i32` | sign-extend to `i64` |
//! | unsigned, digital, boolean, time | zero-extend to `u32` | zero-extend to `u64` |
//! | float | 4 bytes: `f32` | 8 bytes: `f64` |
//!
//! Short signed buffers are filled with `0xFF` when the top stored bit is
//! set. Zero padding them would turn small negatives into large positives.

use std::fmt;

use glad_core::{ChannelSample, ChannelType};

use crate::error::{CodecError, CodecResult};

/// Interpreted DN value.
#[derive(Debug, Clone, PartialEq)]
pub enum DnValue {
    /// Signed integer, from signed and status channels.
    Signed(i64),
    /// Unsigned integer, from unsigned, digital, boolean and time channels.
    Unsigned(u64),
    /// Floating point.
    Float(f64),
    /// Text.
    Ascii(String),
}

impl DnValue {
    /// Returns true if the value kind fits the channel type.
    #[must_use]
    pub fn matches(&self, dn_type: ChannelType) -> bool {
        match self {
            DnValue::Signed(_) => dn_type.is_signed(),
            DnValue::Unsigned(_) => dn_type.is_unsigned(),
            DnValue::Float(_) => dn_type == ChannelType::Float,
            DnValue::Ascii(_) => dn_type == ChannelType::Ascii,
        }
    }
}

impl fmt::Display for DnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnValue::Signed(v) => write!(f, "{v}"),
            DnValue::Unsigned(v) => write!(f, "{v}"),
            DnValue::Float(v) => write!(f, "{v}"),
            DnValue::Ascii(v) => f.write_str(v),
        }
    }
}

/// Interprets raw DN bytes according to the channel type.
pub fn interpret_dn(dn_type: ChannelType, raw: &[u8]) -> CodecResult<DnValue> {
    if dn_type == ChannelType::Ascii {
        return Ok(DnValue::Ascii(String::from_utf8_lossy(raw).into_owned()));
    }
    if raw.is_empty() || raw.len() > 8 {
        return Err(CodecError::invalid_dn(format!(
            "{dn_type} DN of {} bytes",
            raw.len()
        )));
    }

    if dn_type.is_signed() {
        Ok(DnValue::Signed(sign_extend(raw)))
    } else if dn_type.is_unsigned() {
        Ok(DnValue::Unsigned(zero_extend(raw)))
    } else {
        read_float(raw).map(DnValue::Float)
    }
}

/// Interprets raw EU bytes. Empty means the channel has no EU.
pub fn interpret_eu(raw: &[u8]) -> CodecResult<Option<f64>> {
    if raw.is_empty() {
        return Ok(None);
    }
    read_float(raw).map(Some)
}

/// Writes a DN value as `width` big-endian bytes.
///
/// Integers must fit the width; floats accept 4 or 8. Text ignores the
/// width.
pub fn dn_to_raw(value: &DnValue, width: usize) -> CodecResult<Vec<u8>> {
    match value {
        DnValue::Ascii(text) => Ok(text.as_bytes().to_vec()),
        DnValue::Float(v) => match width {
            4 => Ok((*v as f32).to_be_bytes().to_vec()),
            8 => Ok(v.to_be_bytes().to_vec()),
            _ => Err(CodecError::invalid_dn(format!("float width {width}"))),
        },
        DnValue::Signed(v) => {
            check_width(width)?;
            let raw = v.to_be_bytes()[8 - width..].to_vec();
            if sign_extend(&raw) != *v {
                return Err(CodecError::invalid_dn(format!("{v} does not fit {width} bytes")));
            }
            Ok(raw)
        }
        DnValue::Unsigned(v) => {
            check_width(width)?;
            let raw = v.to_be_bytes()[8 - width..].to_vec();
            if zero_extend(&raw) != *v {
                return Err(CodecError::invalid_dn(format!("{v} does not fit {width} bytes")));
            }
            Ok(raw)
        }
    }
}

/// Writes an EU value. `None` becomes the empty array.
#[must_use]
pub fn eu_to_raw(eu: Option<f64>) -> Vec<u8> {
    eu.map(|v| v.to_be_bytes().to_vec()).unwrap_or_default()
}

/// Typed DN/EU access on [`ChannelSample`].
pub trait SampleValues: Sized {
    /// Interpreted DN.
    fn dn(&self) -> CodecResult<DnValue>;

    /// Interpreted EU, `None` when absent.
    fn eu(&self) -> CodecResult<Option<f64>>;

    /// Replaces the DN with `value` written at `width` bytes.
    fn with_dn(self, value: DnValue, width: usize) -> CodecResult<Self>;

    /// Replaces the EU.
    #[must_use]
    fn with_eu(self, eu: Option<f64>) -> Self;
}

impl SampleValues for ChannelSample {
    fn dn(&self) -> CodecResult<DnValue> {
        interpret_dn(self.dn_type(), self.dn_raw())
    }

    fn eu(&self) -> CodecResult<Option<f64>> {
        interpret_eu(self.eu_raw())
    }

    fn with_dn(self, value: DnValue, width: usize) -> CodecResult<Self> {
        if !value.matches(self.dn_type()) {
            return Err(CodecError::invalid_dn(format!(
                "{value:?} is not a {} value",
                self.dn_type()
            )));
        }
        let raw = dn_to_raw(&value, width)?;
        Ok(self.with_dn_raw(raw))
    }

    fn with_eu(self, eu: Option<f64>) -> Self {
        self.with_eu_raw(eu_to_raw(eu))
    }
}

fn check_width(width: usize) -> CodecResult<()> {
    if (1..=8).contains(&width) {
        Ok(())
    } else {
        Err(CodecError::invalid_dn(format!("integer width {width}")))
    }
}

fn sign_extend(raw: &[u8]) -> i64 {
    let negative = raw.first().is_some_and(|b| b & 0x80 != 0);
    let fill = if negative { 0xFF } else { 0x00 };
    if raw.len() <= 4 {
        let mut word = [fill; 4];
        word[4 - raw.len()..].copy_from_slice(raw);
        i64::from(i32::from_be_bytes(word))
    } else {
        let mut word = [fill; 8];
        word[8 - raw.len()..].copy_from_slice(raw);
        i64::from_be_bytes(word)
    }
}

fn zero_extend(raw: &[u8]) -> u64 {
    if raw.len() <= 4 {
        let mut word = [0u8; 4];
        word[4 - raw.len()..].copy_from_slice(raw);
        u64::from(u32::from_be_bytes(word))
    } else {
        let mut word = [0u8; 8];
        word[8 - raw.len()..].copy_from_slice(raw);
        u64::from_be_bytes(word)
    }
}

fn read_float(raw: &[u8]) -> CodecResult<f64> {
    match <[u8; 8]>::try_from(raw) {
        Ok(bytes) => Ok(f64::from_be_bytes(bytes)),
        Err(_) => match <[u8; 4]>::try_from(raw) {
            Ok(bytes) => Ok(f64::from(f32::from_be_bytes(bytes))),
            Err(_) => Err(CodecError::invalid_dn(format!(
                "float of {} bytes",
                raw.len()
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_byte_negative_sign_extends() {
        assert_eq!(
            interpret_dn(ChannelType::SignedInt, &[0xFE]).unwrap(),
            DnValue::Signed(-2)
        );
        assert_eq!(
            interpret_dn(ChannelType::Status, &[0x80, 0x00]).unwrap(),
            DnValue::Signed(-32768)
        );
        assert_eq!(
            interpret_dn(ChannelType::SignedInt, &[0xFF, 0xFF, 0xFF, 0xFF, 0xFB]).unwrap(),
            DnValue::Signed(-5)
        );
    }

    #[test]
    fn positive_signed_is_zero_filled() {
        assert_eq!(
            interpret_dn(ChannelType::SignedInt, &[0x7F]).unwrap(),
            DnValue::Signed(127)
        );
    }

    #[test]
    fn unsigned_high_bit_stays_positive() {
        assert_eq!(
            interpret_dn(ChannelType::UnsignedInt, &[0xFF]).unwrap(),
            DnValue::Unsigned(255)
        );
        assert_eq!(
            interpret_dn(ChannelType::Time, &[0x80, 0, 0, 0, 0, 0, 0, 0]).unwrap(),
            DnValue::Unsigned(1 << 63)
        );
        for t in [ChannelType::Digital, ChannelType::Boolean] {
            assert_eq!(interpret_dn(t, &[0x80, 0x01]).unwrap(), DnValue::Unsigned(0x8001));
        }
    }

    #[test]
    fn floats_by_width() {
        assert_eq!(
            interpret_dn(ChannelType::Float, &1.5f32.to_be_bytes()).unwrap(),
            DnValue::Float(1.5)
        );
        assert_eq!(
            interpret_dn(ChannelType::Float, &(-2.25f64).to_be_bytes()).unwrap(),
            DnValue::Float(-2.25)
        );
        assert!(interpret_dn(ChannelType::Float, &[0; 6]).is_err());
    }

    #[test]
    fn bad_widths_are_errors() {
        assert!(interpret_dn(ChannelType::SignedInt, &[]).is_err());
        assert!(interpret_dn(ChannelType::UnsignedInt, &[0; 9]).is_err());
    }

    #[test]
    fn ascii_is_raw_text() {
        assert_eq!(
            interpret_dn(ChannelType::Ascii, b"NOMINAL").unwrap(),
            DnValue::Ascii("NOMINAL".into())
        );
        assert_eq!(interpret_dn(ChannelType::Ascii, b"").unwrap(), DnValue::Ascii(String::new()));
    }

    #[test]
    fn eu_interpretation() {
        assert_eq!(interpret_eu(&[]).unwrap(), None);
        assert_eq!(interpret_eu(&eu_to_raw(Some(3.75))).unwrap(), Some(3.75));
        assert_eq!(interpret_eu(&0.5f32.to_be_bytes()).unwrap(), Some(0.5));
        assert!(interpret_eu(&[1, 2, 3]).is_err());
    }

    #[test]
    fn values_must_fit_width() {
        assert_eq!(dn_to_raw(&DnValue::Signed(-1), 1).unwrap(), vec![0xFF]);
        assert!(dn_to_raw(&DnValue::Signed(200), 1).is_err());
        assert!(dn_to_raw(&DnValue::Unsigned(256), 1).is_err());
        assert!(dn_to_raw(&DnValue::Unsigned(1), 0).is_err());
        assert!(dn_to_raw(&DnValue::Float(1.0), 2).is_err());
    }

    #[test]
    fn with_dn_checks_kind() {
        let sample = ChannelSample::new("A-1", ChannelType::SignedInt, vec![0]);
        assert!(sample.clone().with_dn(DnValue::Unsigned(1), 1).is_err());

        let sample = sample.with_dn(DnValue::Signed(-3), 2).unwrap().with_eu(Some(9.0));
        assert_eq!(sample.dn_raw(), &[0xFF, 0xFD]);
        assert_eq!(sample.dn().unwrap(), DnValue::Signed(-3));
        assert_eq!(sample.eu().unwrap(), Some(9.0));
    }

    proptest! {
        #[test]
        fn narrow_signed_widens_to_same_value(v in any::<i8>(), width in 1usize..=8) {
            let raw = dn_to_raw(&DnValue::Signed(i64::from(v)), width).unwrap();
            prop_assert_eq!(raw.len(), width);
            prop_assert_eq!(
                interpret_dn(ChannelType::SignedInt, &raw).unwrap(),
                DnValue::Signed(i64::from(v))
            );
        }

        #[test]
        fn one_byte_signed_matches_wide_encodings(v in any::<i8>()) {
            let narrow = interpret_dn(ChannelType::SignedInt, &[v as u8]).unwrap();
            let four = interpret_dn(ChannelType::SignedInt, &i32::from(v).to_be_bytes()).unwrap();
            let eight = interpret_dn(ChannelType::SignedInt, &i64::from(v).to_be_bytes()).unwrap();
            prop_assert_eq!(&narrow, &four);
            prop_assert_eq!(&narrow, &eight);
        }

        #[test]
        fn unsigned_is_never_negative(raw in proptest::collection::vec(any::<u8>(), 1..=8)) {
            let DnValue::Unsigned(v) = interpret_dn(ChannelType::UnsignedInt, &raw).unwrap() else {
                panic!("unsigned channel produced non-unsigned value");
            };
            let mut expected = 0u64;
            for b in &raw {
                expected = (expected << 8) | u64::from(*b);
            }
            prop_assert_eq!(v, expected);
        }
    }
}
