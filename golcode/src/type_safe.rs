//! Type-safe wrappers binding every wire leaf to its source-level type.
//!
//! The wrappers compose over any codec: each leaf write is preceded by a
//! one-byte [`TypeTag`] through the inner codec's `u8` path, and each leaf
//! read checks the tag against the statically requested type before
//! delegating. Composite structure (sequences, optionals, unions) is
//! expressed purely through the primitive stream, so tags appear exactly
//! once per leaf and never around compounds.
use {
    crate::{
        de::Deserializer,
        error::{invalid_type_tag, type_mismatch, ReadResult, WriteResult},
        ser::Serializer,
    },
    core::fmt,
};

/// One-byte identifier for a primitive leaf family.
///
/// Tag values are frozen: a value, once assigned, is never changed or
/// reused. Changing one would be a breaking change to every stream written
/// through the type-safe wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TypeTag {
    Bool = 0,
    I8 = 1,
    U8 = 2,
    I16 = 3,
    U16 = 4,
    I32 = 5,
    U32 = 6,
    I64 = 7,
    U64 = 8,
    F32 = 9,
    F64 = 10,
    Char = 11,
}

impl TypeTag {
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Bool => "bool",
            TypeTag::I8 => "i8",
            TypeTag::U8 => "u8",
            TypeTag::I16 => "i16",
            TypeTag::U16 => "u16",
            TypeTag::I32 => "i32",
            TypeTag::U32 => "u32",
            TypeTag::I64 => "i64",
            TypeTag::U64 => "u64",
            TypeTag::F32 => "f32",
            TypeTag::F64 => "f64",
            TypeTag::Char => "char",
        }
    }

    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => TypeTag::Bool,
            1 => TypeTag::I8,
            2 => TypeTag::U8,
            3 => TypeTag::I16,
            4 => TypeTag::U16,
            5 => TypeTag::I32,
            6 => TypeTag::U32,
            7 => TypeTag::I64,
            8 => TypeTag::U64,
            9 => TypeTag::F32,
            10 => TypeTag::F64,
            11 => TypeTag::Char,
            _ => return None,
        })
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! tagged_writes {
    ($(($ty:ty, $tag:ident)),* $(,)?) => { pastey::paste! { $(
        #[inline]
        fn [<write_ $ty>](&mut self, val: $ty) -> WriteResult<()> {
            self.inner.write_u8(TypeTag::$tag as u8)?;
            self.inner.[<write_ $ty>](val)
        }
    )* } };
}

macro_rules! tagged_reads {
    ($(($ty:ty, $tag:ident)),* $(,)?) => { pastey::paste! { $(
        #[inline]
        fn [<read_ $ty>](&mut self) -> ReadResult<$ty> {
            self.expect_tag(TypeTag::$tag)?;
            self.inner.[<read_ $ty>]()
        }
    )* } };
}

/// Serializer wrapper emitting a [`TypeTag`] before every leaf.
pub struct TypeSafeSerializer<S: Serializer> {
    inner: S,
}

impl<S: Serializer> TypeSafeSerializer<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Serializer> Serializer for TypeSafeSerializer<S> {
    tagged_writes!(
        (bool, Bool),
        (u8, U8),
        (i8, I8),
        (u16, U16),
        (i16, I16),
        (u32, U32),
        (i32, I32),
        (u64, U64),
        (i64, I64),
        (f32, F32),
        (f64, F64),
        (char, Char),
    );

    // write_bulk deliberately not overridden: the defaulted per-element path
    // runs through the tagged leaf methods, so bulk data stays type-checked.

    fn flush(&mut self) -> WriteResult<()> {
        self.inner.flush()
    }
}

/// Deserializer wrapper verifying the [`TypeTag`] written by
/// [`TypeSafeSerializer`] before every leaf read.
pub struct TypeSafeDeserializer<D: Deserializer> {
    inner: D,
}

impl<D: Deserializer> TypeSafeDeserializer<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> D {
        self.inner
    }

    fn expect_tag(&mut self, expected: TypeTag) -> ReadResult<()> {
        let byte = self.inner.read_u8()?;
        let found = TypeTag::from_byte(byte).ok_or_else(|| invalid_type_tag(byte))?;
        if found != expected {
            return Err(type_mismatch(expected, found));
        }
        Ok(())
    }
}

impl<D: Deserializer> Deserializer for TypeSafeDeserializer<D> {
    tagged_reads!(
        (bool, Bool),
        (u8, U8),
        (i8, I8),
        (u16, U16),
        (i16, I16),
        (u32, U32),
        (i32, I32),
        (u64, U64),
        (i64, I64),
        (f32, F32),
        (f64, F64),
        (char, Char),
    );
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{io::Cursor, NativeDeserializer, NativeSerializer, ReadError},
    };

    #[test]
    fn tag_values_are_frozen() {
        // the wire table; a failure here means a breaking format change
        let table = [
            (TypeTag::Bool, 0u8),
            (TypeTag::I8, 1),
            (TypeTag::U8, 2),
            (TypeTag::I16, 3),
            (TypeTag::U16, 4),
            (TypeTag::I32, 5),
            (TypeTag::U32, 6),
            (TypeTag::I64, 7),
            (TypeTag::U64, 8),
            (TypeTag::F32, 9),
            (TypeTag::F64, 10),
            (TypeTag::Char, 11),
        ];
        for (tag, byte) in table {
            assert_eq!(tag as u8, byte);
            assert_eq!(TypeTag::from_byte(byte), Some(tag));
        }
        assert_eq!(TypeTag::from_byte(12), None);
        assert_eq!(TypeTag::from_byte(255), None);
    }

    #[test]
    fn every_leaf_carries_exactly_one_tag() {
        let mut serializer = TypeSafeSerializer::new(NativeSerializer::new(Vec::new()));
        serializer.write_u16(7).unwrap();
        serializer.write_bool(true).unwrap();
        serializer.flush().unwrap();
        let bytes = serializer.into_inner().into_inner();
        // tag + 2 payload bytes, tag + 1 payload byte
        assert_eq!(bytes.len(), 3 + 2);
        assert_eq!(bytes[0], TypeTag::U16 as u8);
        assert_eq!(bytes[3], TypeTag::Bool as u8);
    }

    #[test]
    fn mismatch_then_reposition_recovers() {
        let mut serializer = TypeSafeSerializer::new(NativeSerializer::new(Vec::new()));
        serializer.write_f32(17.0).unwrap();
        serializer.flush().unwrap();
        let bytes = serializer.into_inner().into_inner();

        let mut cursor = Cursor::new(&bytes);
        let mut deserializer = TypeSafeDeserializer::new(NativeDeserializer::new(&mut cursor));
        assert!(matches!(
            deserializer.read_i32(),
            Err(ReadError::TypeMismatch {
                expected: TypeTag::I32,
                found: TypeTag::F32,
            })
        ));

        cursor.set_position(0);
        let mut deserializer = TypeSafeDeserializer::new(NativeDeserializer::new(&mut cursor));
        assert_eq!(deserializer.read_f32().unwrap(), 17.0);
    }

    #[test]
    fn unknown_tag_byte_is_its_own_error() {
        let bytes = [0xEEu8, 0, 0, 0, 0];
        let mut deserializer =
            TypeSafeDeserializer::new(NativeDeserializer::new(bytes.as_slice()));
        assert!(matches!(
            deserializer.read_u32(),
            Err(ReadError::InvalidTypeTag(0xEE))
        ));
    }
}
