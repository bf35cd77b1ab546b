//! golcode is a compressing, typed binary serialization library built around
//! an Exponential-Golomb bit packer, with a byte-packed varint codec and a
//! fixed-width native codec as sibling backends sharing one contract.
//!
//! A value is decomposed by shape ([`Encode`] / [`Decode`]) into a sequence
//! of primitive leaves, and a pluggable codec ([`Serializer`] /
//! [`Deserializer`]) maps those leaves to bytes. Any codec can additionally
//! be wrapped in the type-safe layer, which stamps a one-byte type tag on
//! every leaf and verifies it on the way back in.
//!
//! # Quickstart
//!
//! ```
//! # #[cfg(feature = "derive")] {
//! use golcode::{Decode, Encode};
//!
//! #[derive(Encode, Decode, Debug, PartialEq)]
//! struct Record {
//!     id: u64,
//!     scale: f32,
//!     label: String,
//!     attempts: Vec<u32>,
//! }
//!
//! let record = Record {
//!     id: 42,
//!     scale: 0.5,
//!     label: "first".to_string(),
//!     attempts: vec![1, 2, 3],
//! };
//!
//! let bytes = golcode::encode_bit_packed(&record).unwrap();
//! let decoded: Record = golcode::decode_bit_packed(&bytes).unwrap();
//! assert_eq!(record, decoded);
//! # }
//! ```
//!
//! # Codecs
//!
//! | Codec | Integers | Floats | Bool |
//! |---|---|---|---|
//! | [`BitPackSerializer`] | Exponential-Golomb bit strings | bit-reversed, then Exp-Golomb | 1 bit |
//! | [`BytePackSerializer`] | LSB-first varint, 7 payload bits + continuation bit per byte | bitcast, then varint | 1 byte |
//! | [`NativeSerializer`] | native in-memory layout | native in-memory layout | 1 byte |
//!
//! The bit-packed codec buffers up to seven bits across leaf writes, so its
//! [`Serializer::flush`] must run after the last value; it pads the trailing
//! partial byte with zero bits. The other codecs flush as a no-op.
//!
//! Compound shapes share one wire form across all codecs: optionals write a
//! presence flag and then the payload, containers write their element count
//! (as `u64`) and then the elements, enums write the variant index (as
//! `u64`) and then the variant's fields, and struct fields follow source
//! declaration order.
//!
//! # Hand-written shapes
//!
//! Deriving is the common path, but any type can participate by implementing
//! [`Encode`] and [`Decode`] directly against the codec contract:
//!
//! ```
//! use golcode::{Decode, Deserializer, Encode, ReadResult, Serializer, WriteResult};
//!
//! struct Celsius(f64);
//!
//! impl Encode for Celsius {
//!     fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
//!         serializer.write_f64(self.0)
//!     }
//! }
//!
//! impl Decode for Celsius {
//!     fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
//!         Ok(Celsius(deserializer.read_f64()?))
//!     }
//! }
//!
//! let bytes = golcode::encode_byte_packed(&Celsius(21.5)).unwrap();
//! let decoded: Celsius = golcode::decode_byte_packed(&bytes).unwrap();
//! assert_eq!(decoded.0, 21.5);
//! ```

mod bits;

pub mod bitpack;
pub mod bitset;
pub mod bytepack;
pub mod de;
pub mod error;
pub mod io;
pub mod native;
pub mod ser;
pub mod type_safe;

pub use {
    bitpack::{BitPackDeserializer, BitPackSerializer},
    bitset::BitSet,
    bytepack::{BytePackDeserializer, BytePackSerializer},
    de::{Decode, Deserializer},
    error::{Error, ReadError, ReadResult, Result, WriteError, WriteResult},
    io::{ByteSink, ByteSource, Cursor, IoReader, IoWriter},
    native::{NativeDeserializer, NativeSerializer},
    ser::{Encode, Serializer},
    type_safe::{TypeSafeDeserializer, TypeSafeSerializer, TypeTag},
};

#[cfg(feature = "derive")]
pub use golcode_derive::{Decode, Encode};

/// Encode `value` through the bit-packed codec into a fresh buffer,
/// flushing the trailing partial byte.
pub fn encode_bit_packed<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut serializer = BitPackSerializer::new(Vec::new());
    value.encode(&mut serializer)?;
    serializer.flush()?;
    Ok(serializer.into_inner())
}

/// Decode a value the bit-packed codec encoded.
pub fn decode_bit_packed<T: Decode>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = BitPackDeserializer::new(bytes);
    Ok(T::decode(&mut deserializer)?)
}

/// Encode `value` through the byte-packed varint codec into a fresh buffer.
pub fn encode_byte_packed<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut serializer = BytePackSerializer::new(Vec::new());
    value.encode(&mut serializer)?;
    serializer.flush()?;
    Ok(serializer.into_inner())
}

/// Decode a value the byte-packed varint codec encoded.
pub fn decode_byte_packed<T: Decode>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = BytePackDeserializer::new(bytes);
    Ok(T::decode(&mut deserializer)?)
}

/// Encode `value` through the fixed-width native codec into a fresh buffer.
pub fn encode_native<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut serializer = NativeSerializer::new(Vec::new());
    value.encode(&mut serializer)?;
    serializer.flush()?;
    Ok(serializer.into_inner())
}

/// Decode a value the fixed-width native codec encoded.
pub fn decode_native<T: Decode>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = NativeDeserializer::new(bytes);
    Ok(T::decode(&mut deserializer)?)
}
