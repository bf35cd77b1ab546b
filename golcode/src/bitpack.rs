//! The bit-packed codec: Exponential-Golomb integers with a carry-over cache.
//!
//! Every integer leaf is promoted to the 64-bit path and coded as a
//! self-delimiting bit string, so small magnitudes cost a handful of bits.
//! Floating-point values are bit-reversed before coding: the exponent bits
//! that are almost always set move to the low end, and "round" values with
//! zero mantissas gain long trailing-zero runs, both of which shorten the
//! resulting codeword. The reversal is its own inverse and is part of the
//! wire format.
use crate::{
    bits::{
        decode_exp_golomb, decode_signed_exp_golomb, encode_exp_golomb, encode_signed_exp_golomb,
        BitCache,
    },
    de::Deserializer,
    error::{invalid_bool, invalid_char, value_overflow, ReadResult, WriteResult},
    io::{ByteSink, ByteSource},
    ser::Serializer,
};

macro_rules! promote_int_writes {
    (unsigned: $($u:ty),* ; signed: $($i:ty),*) => { pastey::paste! {
        $(
            #[inline]
            fn [<write_ $u>](&mut self, val: $u) -> WriteResult<()> {
                self.write_u64(val as u64)
            }
        )*
        $(
            #[inline]
            fn [<write_ $i>](&mut self, val: $i) -> WriteResult<()> {
                self.write_i64(val as i64)
            }
        )*
    } };
}

macro_rules! narrowing_int_reads {
    (unsigned: $($u:ty),* ; signed: $($i:ty),*) => { pastey::paste! {
        $(
            #[inline]
            fn [<read_ $u>](&mut self) -> ReadResult<$u> {
                let val = self.read_u64()?;
                <$u>::try_from(val).map_err(|_| value_overflow(stringify!($u)))
            }
        )*
        $(
            #[inline]
            fn [<read_ $i>](&mut self) -> ReadResult<$i> {
                let val = self.read_i64()?;
                <$i>::try_from(val).map_err(|_| value_overflow(stringify!($i)))
            }
        )*
    } };
}

pub(crate) use {narrowing_int_reads, promote_int_writes};

/// Serializer compressing integer leaves via Exponential-Golomb coding.
///
/// [`flush`](Serializer::flush) must be called after the last value, or up to
/// seven bits of it stay in the cache.
pub struct BitPackSerializer<S: ByteSink> {
    sink: S,
    cache: BitCache,
}

impl<S: ByteSink> BitPackSerializer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            cache: BitCache::default(),
        }
    }

    /// Release the sink. Does not flush.
    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: ByteSink> Serializer for BitPackSerializer<S> {
    #[inline]
    fn write_bool(&mut self, val: bool) -> WriteResult<()> {
        self.write_u64(val as u64)
    }

    promote_int_writes!(unsigned: u8, u16, u32; signed: i8, i16, i32);

    #[inline]
    fn write_u64(&mut self, val: u64) -> WriteResult<()> {
        self.cache.write_bits(&mut self.sink, encode_exp_golomb(val))
    }

    #[inline]
    fn write_i64(&mut self, val: i64) -> WriteResult<()> {
        self.cache
            .write_bits(&mut self.sink, encode_signed_exp_golomb(val))
    }

    #[inline]
    fn write_f32(&mut self, val: f32) -> WriteResult<()> {
        self.write_u64(val.to_bits().reverse_bits() as u64)
    }

    #[inline]
    fn write_f64(&mut self, val: f64) -> WriteResult<()> {
        self.write_u64(val.to_bits().reverse_bits())
    }

    #[inline]
    fn write_char(&mut self, val: char) -> WriteResult<()> {
        self.write_u64(val as u64)
    }

    fn flush(&mut self) -> WriteResult<()> {
        self.cache.flush(&mut self.sink)
    }
}

/// Deserializer reversing [`BitPackSerializer`].
pub struct BitPackDeserializer<R: ByteSource> {
    source: R,
    cache: BitCache,
}

impl<R: ByteSource> BitPackDeserializer<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            cache: BitCache::default(),
        }
    }

    /// Release the source. Bits already pulled into the cache are lost.
    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R: ByteSource> Deserializer for BitPackDeserializer<R> {
    fn read_bool(&mut self) -> ReadResult<bool> {
        match self.read_u64()? {
            0 => Ok(false),
            1 => Ok(true),
            val => Err(invalid_bool(val)),
        }
    }

    narrowing_int_reads!(unsigned: u8, u16, u32; signed: i8, i16, i32);

    #[inline]
    fn read_u64(&mut self) -> ReadResult<u64> {
        let code = self.cache.read_exp_golomb(&mut self.source)?;
        u64::try_from(decode_exp_golomb(code.value)).map_err(|_| value_overflow("u64"))
    }

    #[inline]
    fn read_i64(&mut self) -> ReadResult<i64> {
        let code = self.cache.read_exp_golomb(&mut self.source)?;
        decode_signed_exp_golomb(code.value)
    }

    #[inline]
    fn read_f32(&mut self) -> ReadResult<f32> {
        Ok(f32::from_bits(self.read_u32()?.reverse_bits()))
    }

    #[inline]
    fn read_f64(&mut self) -> ReadResult<f64> {
        Ok(f64::from_bits(self.read_u64()?.reverse_bits()))
    }

    fn read_char(&mut self) -> ReadResult<char> {
        let val = self.read_u32()?;
        char::from_u32(val).ok_or_else(|| invalid_char(val))
    }
}
