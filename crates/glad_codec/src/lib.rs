//! # Global LAD Codec
//!
//! Wire format for Global LAD records.
//!
//! A record travels as a CBOR payload `[envelope, variant]` built from small
//! integer-keyed maps (see [`schema`]), wrapped in a packet frame:
//!
//! ```
//! use glad_codec::{decode, to_packet_bytes, PACKET_HEADER_SIZE};
//! use glad_core::{ChannelSample, ChannelType, GladRecord};
//!
//! let record = GladRecord::channel(ChannelSample::new("A-0001", ChannelType::SignedInt, vec![0xFE]))
//!     .with_venue("OPS")
//!     .with_host("gds1")
//!     .build();
//!
//! let packet = to_packet_bytes(&record).unwrap();
//! assert_eq!(&packet[..4], &[0x1A, 0xCF, 0xFC, 0x1D]);
//!
//! let decoded = decode(&packet[PACKET_HEADER_SIZE..]).unwrap();
//! assert_eq!(decoded, record);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
pub mod numeric;
mod packet;
pub mod schema;

pub use decoder::{decode, decode_parts};
pub use encoder::{encode, encode_envelope, encode_variant};
pub use error::{CodecError, CodecResult};
pub use numeric::{DnValue, SampleValues};
pub use packet::{
    to_packet_bytes, wrap_packet, VerifiedCounts, LENGTH_FIELD_SIZE, PACKET_HEADER_SIZE,
    PACKET_MARKER, VERIFIED_PREFIX_SIZE,
};

use glad_core::GladRecord;

/// Trait for types that can be encoded to a packet payload.
pub trait Encode {
    /// Encode this value to payload bytes.
    fn encode(&self) -> CodecResult<Vec<u8>>;
}

/// Trait for types that can be decoded from a packet payload.
pub trait Decode: Sized {
    /// Decode this value from payload bytes.
    fn decode(bytes: &[u8]) -> CodecResult<Self>;
}

impl Encode for GladRecord {
    fn encode(&self) -> CodecResult<Vec<u8>> {
        encode(self)
    }
}

impl Decode for GladRecord {
    fn decode(bytes: &[u8]) -> CodecResult<Self> {
        decode(bytes)
    }
}
