//! Packet framing.
//!
//! ```text
//! +------------------+-------------------+------------------+
//! | marker (4 bytes) | length (4 bytes)  | payload          |
//! | 1A CF FC 1D      | big-endian, 4 + n | n bytes          |
//! +------------------+-------------------+------------------+
//! ```
//!
//! The length counts itself but not the marker. A verified stream starts
//! with a 12-byte prefix of three big-endian counts before the first packet.

use glad_core::GladRecord;

use crate::encoder::encode;
use crate::error::{CodecError, CodecResult};

/// Sync marker preceding every packet.
pub const PACKET_MARKER: [u8; 4] = [0x1A, 0xCF, 0xFC, 0x1D];

/// Size of the length field.
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Size of marker plus length field.
pub const PACKET_HEADER_SIZE: usize = PACKET_MARKER.len() + LENGTH_FIELD_SIZE;

/// Size of the verified stream prefix.
pub const VERIFIED_PREFIX_SIZE: usize = 12;

/// Frames a payload: marker, length `4 + payload.len()`, payload.
pub fn wrap_packet(payload: &[u8]) -> CodecResult<Vec<u8>> {
    let length = payload
        .len()
        .checked_add(LENGTH_FIELD_SIZE)
        .and_then(|len| i32::try_from(len).ok())
        .ok_or(CodecError::PayloadTooLarge { len: payload.len() })?;

    let mut packet = Vec::with_capacity(PACKET_HEADER_SIZE + payload.len());
    packet.extend_from_slice(&PACKET_MARKER);
    packet.extend_from_slice(&length.to_be_bytes());
    packet.extend_from_slice(payload);
    Ok(packet)
}

/// Encodes and frames a record.
pub fn to_packet_bytes(record: &GladRecord) -> CodecResult<Vec<u8>> {
    wrap_packet(&encode(record)?)
}

/// Counts announced at the start of a verified stream.
///
/// The first `complete` records are complete, the next `incomplete` are
/// incomplete, and anything after is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VerifiedCounts {
    /// Records known to be complete.
    pub complete: u32,
    /// Records known to be incomplete.
    pub incomplete: u32,
    /// Records of unknown completeness.
    pub unknown: u32,
}

impl VerifiedCounts {
    /// Creates a set of counts.
    #[must_use]
    pub const fn new(complete: u32, incomplete: u32, unknown: u32) -> Self {
        Self {
            complete,
            incomplete,
            unknown,
        }
    }

    /// Sum of all three counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        u64::from(self.complete) + u64::from(self.incomplete) + u64::from(self.unknown)
    }

    /// Encodes the 12-byte prefix.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; VERIFIED_PREFIX_SIZE] {
        let mut out = [0u8; VERIFIED_PREFIX_SIZE];
        out[0..4].copy_from_slice(&self.complete.to_be_bytes());
        out[4..8].copy_from_slice(&self.incomplete.to_be_bytes());
        out[8..12].copy_from_slice(&self.unknown.to_be_bytes());
        out
    }

    /// Decodes the 12-byte prefix.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; VERIFIED_PREFIX_SIZE]) -> Self {
        let word = |i: usize| u32::from_be_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        Self {
            complete: word(0),
            incomplete: word(4),
            unknown: word(8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glad_core::{ChannelSample, ChannelType};

    #[test]
    fn framing_is_bit_exact() {
        let payload = [0xAAu8; 16];
        let packet = wrap_packet(&payload).unwrap();
        assert_eq!(&packet[..8], &[0x1A, 0xCF, 0xFC, 0x1D, 0x00, 0x00, 0x00, 0x14]);
        assert_eq!(&packet[8..], &payload);
        assert_eq!(packet.len(), 24);
    }

    #[test]
    fn empty_payload_has_length_four() {
        assert_eq!(
            wrap_packet(&[]).unwrap(),
            vec![0x1A, 0xCF, 0xFC, 0x1D, 0, 0, 0, 4]
        );
    }

    #[test]
    fn record_packet_wraps_encoding() {
        let record = GladRecord::channel(ChannelSample::new("A-1", ChannelType::Ascii, b"OK".to_vec()))
            .with_venue("V")
            .with_host("h")
            .build();
        let packet = to_packet_bytes(&record).unwrap();
        let payload = encode(&record).unwrap();
        assert_eq!(&packet[PACKET_HEADER_SIZE..], payload.as_slice());
        let declared = u32::from_be_bytes([packet[4], packet[5], packet[6], packet[7]]) as usize;
        assert_eq!(declared, payload.len() + 4);
    }

    #[test]
    fn verified_prefix_layout() {
        let counts = VerifiedCounts::new(2, 1, 0x0102_0304);
        let bytes = counts.to_bytes();
        assert_eq!(bytes, [0, 0, 0, 2, 0, 0, 0, 1, 1, 2, 3, 4]);
        assert_eq!(VerifiedCounts::from_bytes(&bytes), counts);
        assert_eq!(counts.total(), 3 + 0x0102_0304);
    }
}
