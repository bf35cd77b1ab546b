//! The byte-packed codec: continuation-bit varints, one byte at minimum.
//!
//! Each unsigned integer is emitted LSB-first as 7-bit groups, the high bit
//! of every byte flagging whether more follow. Signed integers are
//! reinterpreted as unsigned two's-complement (not zigzag-folded), floats as
//! their raw bit patterns. There is no bit cache and flushing is a no-op.
use crate::{
    bitpack::{narrowing_int_reads, promote_int_writes},
    de::Deserializer,
    error::{
        invalid_bool, invalid_char, unexpected_end_of_stream, value_overflow, ReadResult,
        WriteResult,
    },
    io::{ByteSink, ByteSource},
    ser::Serializer,
};

const BYTE_VALUE_MASK: u8 = 0x7F;
const BYTE_CONTINUATION_FLAG: u8 = 0x80;
const BYTE_CONTINUATION_OFFSET: u32 = 7;

/// Serializer applying byte-level compression via a varint coding.
pub struct BytePackSerializer<S: ByteSink> {
    sink: S,
}

impl<S: ByteSink> BytePackSerializer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: ByteSink> Serializer for BytePackSerializer<S> {
    #[inline]
    fn write_bool(&mut self, val: bool) -> WriteResult<()> {
        self.write_u64(val as u64)
    }

    promote_int_writes!(unsigned: u8, u16, u32; signed: i8, i16, i32);

    fn write_u64(&mut self, mut val: u64) -> WriteResult<()> {
        if val == 0 {
            return self.sink.put(0);
        }
        while val != 0 {
            let current = (val as u8) & BYTE_VALUE_MASK;
            val >>= BYTE_CONTINUATION_OFFSET;
            let more = if val != 0 { BYTE_CONTINUATION_FLAG } else { 0 };
            self.sink.put(current | more)?;
        }
        Ok(())
    }

    #[inline]
    fn write_i64(&mut self, val: i64) -> WriteResult<()> {
        self.write_u64(val as u64)
    }

    #[inline]
    fn write_f32(&mut self, val: f32) -> WriteResult<()> {
        self.write_u64(val.to_bits() as u64)
    }

    #[inline]
    fn write_f64(&mut self, val: f64) -> WriteResult<()> {
        self.write_u64(val.to_bits())
    }

    #[inline]
    fn write_char(&mut self, val: char) -> WriteResult<()> {
        self.write_u64(val as u64)
    }

    fn flush(&mut self) -> WriteResult<()> {
        Ok(())
    }
}

/// Deserializer reversing [`BytePackSerializer`].
pub struct BytePackDeserializer<R: ByteSource> {
    source: R,
}

impl<R: ByteSource> BytePackDeserializer<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R: ByteSource> Deserializer for BytePackDeserializer<R> {
    fn read_bool(&mut self) -> ReadResult<bool> {
        match self.read_u64()? {
            0 => Ok(false),
            1 => Ok(true),
            val => Err(invalid_bool(val)),
        }
    }

    narrowing_int_reads!(unsigned: u8, u16, u32; signed: i8, i16, i32);

    fn read_u64(&mut self) -> ReadResult<u64> {
        let mut val: u64 = 0;
        let mut offset: u32 = 0;
        loop {
            let Some(byte) = self.source.pull()? else {
                return Err(unexpected_end_of_stream());
            };
            let has_more = byte & BYTE_CONTINUATION_FLAG != 0;
            let current = (byte & BYTE_VALUE_MASK) as u64;
            if offset < u64::BITS {
                if offset > u64::BITS - BYTE_CONTINUATION_OFFSET
                    && current >> (u64::BITS - offset) != 0
                {
                    return Err(value_overflow("u64"));
                }
                val |= current << offset;
            } else if current != 0 {
                return Err(value_overflow("u64"));
            }
            offset += BYTE_CONTINUATION_OFFSET;
            if !has_more {
                return Ok(val);
            }
        }
    }

    #[inline]
    fn read_i64(&mut self) -> ReadResult<i64> {
        Ok(self.read_u64()? as i64)
    }

    #[inline]
    fn read_f32(&mut self) -> ReadResult<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    #[inline]
    fn read_f64(&mut self) -> ReadResult<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    fn read_char(&mut self) -> ReadResult<char> {
        let val = self.read_u32()?;
        char::from_u32(val).ok_or_else(|| invalid_char(val))
    }
}
