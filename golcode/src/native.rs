//! The fixed-width passthrough codec.
//!
//! Every leaf is written as its in-memory byte pattern in the producer's
//! native byte order. This is the only codec that overrides the bulk path
//! with a raw copy, making it the cheapest backend for byte-heavy data.
use crate::{
    de::Deserializer,
    error::{invalid_bool, invalid_char, ReadResult, WriteResult},
    io::{ByteSink, ByteSource},
    ser::Serializer,
};

macro_rules! native_writes {
    ($($ty:ty),*) => { pastey::paste! { $(
        #[inline]
        fn [<write_ $ty>](&mut self, val: $ty) -> WriteResult<()> {
            self.sink.put_slice(&val.to_ne_bytes())
        }
    )* } };
}

macro_rules! native_reads {
    ($($ty:ty),*) => { pastey::paste! { $(
        #[inline]
        fn [<read_ $ty>](&mut self) -> ReadResult<$ty> {
            let mut buf = [0u8; size_of::<$ty>()];
            self.source.pull_exact(&mut buf)?;
            Ok(<$ty>::from_ne_bytes(buf))
        }
    )* } };
}

/// Serializer writing raw native-layout primitives.
pub struct NativeSerializer<S: ByteSink> {
    sink: S,
}

impl<S: ByteSink> NativeSerializer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: ByteSink> Serializer for NativeSerializer<S> {
    #[inline]
    fn write_bool(&mut self, val: bool) -> WriteResult<()> {
        self.sink.put(val as u8)
    }

    native_writes!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

    #[inline]
    fn write_char(&mut self, val: char) -> WriteResult<()> {
        self.write_u32(val as u32)
    }

    fn write_bulk(&mut self, count: usize, bytes: &[u8]) -> WriteResult<()> {
        self.write_u64(count as u64)?;
        self.sink.put_slice(bytes)
    }

    fn flush(&mut self) -> WriteResult<()> {
        Ok(())
    }
}

/// Deserializer reversing [`NativeSerializer`].
pub struct NativeDeserializer<R: ByteSource> {
    source: R,
}

impl<R: ByteSource> NativeDeserializer<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R: ByteSource> Deserializer for NativeDeserializer<R> {
    fn read_bool(&mut self) -> ReadResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            val => Err(invalid_bool(val as u64)),
        }
    }

    native_reads!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

    fn read_char(&mut self) -> ReadResult<char> {
        let val = self.read_u32()?;
        char::from_u32(val).ok_or_else(|| invalid_char(val))
    }

    fn read_bulk(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        self.source.pull_exact(buf)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::ReadError};

    #[test]
    fn leaves_use_their_own_width() {
        let mut serializer = NativeSerializer::new(Vec::new());
        serializer.write_u8(0xAB).unwrap();
        serializer.write_u16(0x1234).unwrap();
        serializer.write_u32(1).unwrap();
        serializer.write_u64(2).unwrap();
        serializer.write_f32(17.0).unwrap();
        serializer.write_bool(true).unwrap();
        serializer.write_char('x').unwrap();
        serializer.flush().unwrap();
        let bytes = serializer.into_inner();
        assert_eq!(bytes.len(), 1 + 2 + 4 + 8 + 4 + 1 + 4);

        let mut deserializer = NativeDeserializer::new(bytes.as_slice());
        assert_eq!(deserializer.read_u8().unwrap(), 0xAB);
        assert_eq!(deserializer.read_u16().unwrap(), 0x1234);
        assert_eq!(deserializer.read_u32().unwrap(), 1);
        assert_eq!(deserializer.read_u64().unwrap(), 2);
        assert_eq!(deserializer.read_f32().unwrap(), 17.0);
        assert!(deserializer.read_bool().unwrap());
        assert_eq!(deserializer.read_char().unwrap(), 'x');
    }

    #[test]
    fn bulk_path_is_count_plus_raw_bytes() {
        let mut serializer = NativeSerializer::new(Vec::new());
        serializer.write_bulk(7, b"So easy").unwrap();
        let bytes = serializer.into_inner();
        assert_eq!(bytes.len(), size_of::<u64>() + 7);
        assert_eq!(&bytes[8..], b"So easy");

        let mut deserializer = NativeDeserializer::new(bytes.as_slice());
        assert_eq!(deserializer.read_u64().unwrap(), 7);
        let mut buf = [0u8; 7];
        deserializer.read_bulk(&mut buf).unwrap();
        assert_eq!(&buf, b"So easy");
    }

    #[test]
    fn short_reads_are_fatal() {
        let mut serializer = NativeSerializer::new(Vec::new());
        serializer.write_i32(-1).unwrap();
        let bytes = serializer.into_inner();

        let mut deserializer = NativeDeserializer::new(bytes.as_slice());
        assert!(matches!(
            deserializer.read_u64(),
            Err(ReadError::UnexpectedEndOfStream)
        ));
    }

    #[test]
    fn invalid_bool_byte_is_rejected() {
        let mut deserializer = NativeDeserializer::new([7u8].as_slice());
        assert!(matches!(
            deserializer.read_bool(),
            Err(ReadError::InvalidBool(7))
        ));
    }

    #[test]
    fn invalid_char_value_is_rejected() {
        let mut serializer = NativeSerializer::new(Vec::new());
        serializer.write_u32(0xD800).unwrap();
        let bytes = serializer.into_inner();
        let mut deserializer = NativeDeserializer::new(bytes.as_slice());
        assert!(matches!(
            deserializer.read_char(),
            Err(ReadError::InvalidChar(0xD800))
        ));
    }
}
