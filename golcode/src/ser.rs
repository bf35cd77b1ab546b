//! The serializer contract and the shape-directed `Encode` walker.
//!
//! [`Serializer`] is the codec side: one `write_*` per primitive leaf plus
//! `flush`. [`Encode`] is the walker side: it decomposes a value into the
//! sequence of leaf writes that make up its wire form. Wire order rules:
//! presence flags and union indices come first, aggregate fields and tuple
//! elements go left to right in declaration order, containers write their
//! element count followed by the elements in iteration order.
use {
    crate::error::WriteResult,
    std::{
        collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
        sync::atomic::{AtomicBool, AtomicI32, AtomicI64, AtomicU32, AtomicU64, Ordering},
        time::Duration,
    },
};

/// Codec contract for encoding.
///
/// A serializer maps primitive leaves to bytes. Compound structure never
/// reaches the codec; the walker reduces it to leaf calls.
pub trait Serializer {
    fn write_bool(&mut self, val: bool) -> WriteResult<()>;
    fn write_u8(&mut self, val: u8) -> WriteResult<()>;
    fn write_i8(&mut self, val: i8) -> WriteResult<()>;
    fn write_u16(&mut self, val: u16) -> WriteResult<()>;
    fn write_i16(&mut self, val: i16) -> WriteResult<()>;
    fn write_u32(&mut self, val: u32) -> WriteResult<()>;
    fn write_i32(&mut self, val: i32) -> WriteResult<()>;
    fn write_u64(&mut self, val: u64) -> WriteResult<()>;
    fn write_i64(&mut self, val: i64) -> WriteResult<()>;
    fn write_f32(&mut self, val: f32) -> WriteResult<()>;
    fn write_f64(&mut self, val: f64) -> WriteResult<()>;
    fn write_char(&mut self, val: char) -> WriteResult<()>;

    /// Bulk write of `count` elements backed by the contiguous `bytes`.
    ///
    /// The default provision writes the count followed by every byte through
    /// the `u8` path, which is exactly the per-element wire form. Codecs
    /// whose leaf encoding matches raw memory override this with a single
    /// copy; wrappers that must see every leaf (the type-safe wrapper) leave
    /// the default in place.
    fn write_bulk(&mut self, count: usize, bytes: &[u8]) -> WriteResult<()> {
        self.write_u64(count as u64)?;
        for &byte in bytes {
            self.write_u8(byte)?;
        }
        Ok(())
    }

    /// Flush buffered state into the sink.
    ///
    /// Must be called after the last value; the bit-packed codec holds up to
    /// seven bits of the final byte until it is.
    fn flush(&mut self) -> WriteResult<()>;
}

/// Types whose values can be written through any [`Serializer`].
pub trait Encode {
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()>;
}

macro_rules! impl_encode_leaf {
    ($($ty:ty),* $(,)?) => { pastey::paste! { $(
        impl Encode for $ty {
            #[inline]
            fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
                serializer.[<write_ $ty>](*self)
            }
        }
    )* } };
}

impl_encode_leaf!(bool, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, char);

impl Encode for usize {
    #[inline]
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
        serializer.write_u64(*self as u64)
    }
}

impl Encode for isize {
    #[inline]
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
        serializer.write_i64(*self as i64)
    }
}

impl Encode for () {
    #[inline]
    fn encode<S: Serializer>(&self, _serializer: &mut S) -> WriteResult<()> {
        Ok(())
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    #[inline]
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
        (**self).encode(serializer)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    #[inline]
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
        (**self).encode(serializer)
    }
}

/// Presence flag first, then the payload.
impl<T: Encode> Encode for Option<T> {
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
        serializer.write_bool(self.is_some())?;
        if let Some(value) = self {
            value.encode(serializer)?;
        }
        Ok(())
    }
}

/// Byte length, then the raw UTF-8 bytes through the bulk path.
impl Encode for str {
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
        serializer.write_bulk(self.len(), self.as_bytes())
    }
}

impl Encode for String {
    #[inline]
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
        self.as_str().encode(serializer)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
        serializer.write_u64(self.len() as u64)?;
        for item in self {
            item.encode(serializer)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    #[inline]
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
        self.as_slice().encode(serializer)
    }
}

// The count is redundant for a fixed-size array but stays on the wire so the
// form matches the growable containers.
impl<T: Encode, const N: usize> Encode for [T; N] {
    #[inline]
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
        self.as_slice().encode(serializer)
    }
}

impl<T: Encode> Encode for VecDeque<T> {
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
        serializer.write_u64(self.len() as u64)?;
        for item in self {
            item.encode(serializer)?;
        }
        Ok(())
    }
}

/// Atomics encode as a plain load of their current value.
macro_rules! impl_encode_atomic {
    ($(($atomic:ty, $method:ident)),* $(,)?) => { $(
        impl Encode for $atomic {
            #[inline]
            fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
                serializer.$method(self.load(Ordering::SeqCst))
            }
        }
    )* };
}

impl_encode_atomic!(
    (AtomicBool, write_bool),
    (AtomicU32, write_u32),
    (AtomicI32, write_i32),
    (AtomicU64, write_u64),
    (AtomicI64, write_i64),
);

/// Whole seconds, then the subsecond nanoseconds.
impl Encode for Duration {
    fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
        serializer.write_u64(self.as_secs())?;
        serializer.write_u32(self.subsec_nanos())
    }
}

macro_rules! impl_encode_map {
    ($($map:ident),*) => { $(
        impl<K: Encode, V: Encode> Encode for $map<K, V> {
            fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
                serializer.write_u64(self.len() as u64)?;
                for (key, value) in self {
                    key.encode(serializer)?;
                    value.encode(serializer)?;
                }
                Ok(())
            }
        }
    )* };
}

macro_rules! impl_encode_set {
    ($($set:ident),*) => { $(
        impl<T: Encode> Encode for $set<T> {
            fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
                serializer.write_u64(self.len() as u64)?;
                for item in self {
                    item.encode(serializer)?;
                }
                Ok(())
            }
        }
    )* };
}

impl_encode_map!(HashMap, BTreeMap);
impl_encode_set!(HashSet, BTreeSet);

macro_rules! impl_encode_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Encode),+> Encode for ($($name,)+) {
            fn encode<S: Serializer>(&self, serializer: &mut S) -> WriteResult<()> {
                $( self.$idx.encode(serializer)?; )+
                Ok(())
            }
        }
    };
}

impl_encode_tuple!(A 0, B 1);
impl_encode_tuple!(A 0, B 1, C 2);
impl_encode_tuple!(A 0, B 1, C 2, D 3);
impl_encode_tuple!(A 0, B 1, C 2, D 3, E 4);
impl_encode_tuple!(A 0, B 1, C 2, D 3, E 4, F 5);
impl_encode_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_encode_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
impl_encode_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8);
impl_encode_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9);
impl_encode_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10);
impl_encode_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11);
impl_encode_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11, M 12);
impl_encode_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11, M 12, N 13);
impl_encode_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11, M 12, N 13, O 14);
impl_encode_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11, M 12, N 13, O 14, P 15);
