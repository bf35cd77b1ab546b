//! The deserializer contract and the shape-directed `Decode` walker.
//!
//! Exact mirror of [`crate::ser`]: every `Decode` impl consumes precisely the
//! leaves its `Encode` counterpart wrote, in the same order. Any leaf-level
//! failure aborts the decode in progress and propagates; no partially built
//! value escapes.
use {
    crate::error::{
        invalid_value, length_mismatch, pointer_sized_decode_error, ReadError, ReadResult,
    },
    std::{
        collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
        hash::Hash,
        sync::atomic::{AtomicBool, AtomicI32, AtomicI64, AtomicU32, AtomicU64},
        time::Duration,
    },
};

/// Codec contract for decoding, symmetric to [`crate::Serializer`].
pub trait Deserializer {
    fn read_bool(&mut self) -> ReadResult<bool>;
    fn read_u8(&mut self) -> ReadResult<u8>;
    fn read_i8(&mut self) -> ReadResult<i8>;
    fn read_u16(&mut self) -> ReadResult<u16>;
    fn read_i16(&mut self) -> ReadResult<i16>;
    fn read_u32(&mut self) -> ReadResult<u32>;
    fn read_i32(&mut self) -> ReadResult<i32>;
    fn read_u64(&mut self) -> ReadResult<u64>;
    fn read_i64(&mut self) -> ReadResult<i64>;
    fn read_f32(&mut self) -> ReadResult<f32>;
    fn read_f64(&mut self) -> ReadResult<f64>;
    fn read_char(&mut self) -> ReadResult<char>;

    /// Bulk read mirroring [`crate::Serializer::write_bulk`], minus the count
    /// (the caller has already read it to size `buf`).
    fn read_bulk(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        for slot in buf {
            *slot = self.read_u8()?;
        }
        Ok(())
    }
}

/// Types whose values can be read back through any [`Deserializer`].
pub trait Decode: Sized {
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self>;
}

/// Ceiling on speculative preallocation for decoded containers.
///
/// A length prefix is attacker-controlled data; capacity beyond this grows by
/// insertion only, so a hostile count costs stream bytes, not memory.
const PREALLOCATION_BYTE_LIMIT: usize = 1 << 16;

pub(crate) fn cautious_capacity<T>(len: usize) -> usize {
    len.min(PREALLOCATION_BYTE_LIMIT / size_of::<T>().max(1))
}

pub(crate) fn read_len(deserializer: &mut impl Deserializer) -> ReadResult<usize> {
    usize::try_from(deserializer.read_u64()?).map_err(|_| pointer_sized_decode_error())
}

macro_rules! impl_decode_leaf {
    ($($ty:ty),* $(,)?) => { pastey::paste! { $(
        impl Decode for $ty {
            #[inline]
            fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
                deserializer.[<read_ $ty>]()
            }
        }
    )* } };
}

impl_decode_leaf!(bool, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, char);

impl Decode for usize {
    #[inline]
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        read_len(deserializer)
    }
}

impl Decode for isize {
    #[inline]
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        isize::try_from(deserializer.read_i64()?).map_err(|_| pointer_sized_decode_error())
    }
}

impl Decode for () {
    #[inline]
    fn decode<D: Deserializer>(_deserializer: &mut D) -> ReadResult<Self> {
        Ok(())
    }
}

impl<T: Decode> Decode for Box<T> {
    #[inline]
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        Ok(Box::new(T::decode(deserializer)?))
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        if deserializer.read_bool()? {
            Ok(Some(T::decode(deserializer)?))
        } else {
            Ok(None)
        }
    }
}

impl Decode for String {
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        let len = read_len(deserializer)?;
        let mut bytes = Vec::with_capacity(cautious_capacity::<u8>(len));
        // read through a fixed chunk so a hostile length prefix cannot force
        // a giant up-front allocation
        let mut chunk = [0u8; 512];
        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(chunk.len());
            deserializer.read_bulk(&mut chunk[..n])?;
            bytes.extend_from_slice(&chunk[..n]);
            remaining -= n;
        }
        String::from_utf8(bytes).map_err(|e| ReadError::InvalidUtf8(e.utf8_error()))
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        let len = read_len(deserializer)?;
        let mut vec = Vec::with_capacity(cautious_capacity::<T>(len));
        for _ in 0..len {
            vec.push(T::decode(deserializer)?);
        }
        Ok(vec)
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        let len = read_len(deserializer)?;
        if len != N {
            return Err(length_mismatch(N as u64, len as u64));
        }
        let mut vec = Vec::with_capacity(N);
        for _ in 0..N {
            vec.push(T::decode(deserializer)?);
        }
        match vec.try_into() {
            Ok(array) => Ok(array),
            Err(_) => Err(length_mismatch(N as u64, len as u64)),
        }
    }
}

impl<T: Decode> Decode for VecDeque<T> {
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        let len = read_len(deserializer)?;
        let mut deque = VecDeque::with_capacity(cautious_capacity::<T>(len));
        for _ in 0..len {
            deque.push_back(T::decode(deserializer)?);
        }
        Ok(deque)
    }
}

macro_rules! impl_decode_atomic {
    ($(($atomic:ty, $method:ident)),* $(,)?) => { $(
        impl Decode for $atomic {
            #[inline]
            fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
                Ok(<$atomic>::new(deserializer.$method()?))
            }
        }
    )* };
}

impl_decode_atomic!(
    (AtomicBool, read_bool),
    (AtomicU32, read_u32),
    (AtomicI32, read_i32),
    (AtomicU64, read_u64),
    (AtomicI64, read_i64),
);

impl Decode for Duration {
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        let secs = deserializer.read_u64()?;
        let nanos = deserializer.read_u32()?;
        if nanos >= 1_000_000_000 {
            return Err(invalid_value("subsecond nanoseconds out of range"));
        }
        Ok(Duration::new(secs, nanos))
    }
}

impl<K: Decode + Eq + Hash, V: Decode> Decode for HashMap<K, V> {
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        let len = read_len(deserializer)?;
        let mut map = HashMap::with_capacity(cautious_capacity::<(K, V)>(len));
        for _ in 0..len {
            let key = K::decode(deserializer)?;
            let value = V::decode(deserializer)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        let len = read_len(deserializer)?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let key = K::decode(deserializer)?;
            let value = V::decode(deserializer)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<T: Decode + Eq + Hash> Decode for HashSet<T> {
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        let len = read_len(deserializer)?;
        let mut set = HashSet::with_capacity(cautious_capacity::<T>(len));
        for _ in 0..len {
            set.insert(T::decode(deserializer)?);
        }
        Ok(set)
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode<D: Deserializer>(deserializer: &mut D) -> ReadResult<Self> {
        let len = read_len(deserializer)?;
        let mut set = BTreeSet::new();
        for _ in 0..len {
            set.insert(T::decode(deserializer)?);
        }
        Ok(set)
    }
}

macro_rules! impl_decode_tuple {
    ($($name:ident),+) => {
        impl<$($name: Decode),+> Decode for ($($name,)+) {
            fn decode<__D: Deserializer>(deserializer: &mut __D) -> ReadResult<Self> {
                // tuple expressions evaluate left to right
                Ok(($($name::decode(deserializer)?,)+))
            }
        }
    };
}

impl_decode_tuple!(A, B);
impl_decode_tuple!(A, B, C);
impl_decode_tuple!(A, B, C, D);
impl_decode_tuple!(A, B, C, D, E);
impl_decode_tuple!(A, B, C, D, E, F);
impl_decode_tuple!(A, B, C, D, E, F, G);
impl_decode_tuple!(A, B, C, D, E, F, G, H);
impl_decode_tuple!(A, B, C, D, E, F, G, H, I);
impl_decode_tuple!(A, B, C, D, E, F, G, H, I, J);
impl_decode_tuple!(A, B, C, D, E, F, G, H, I, J, K);
impl_decode_tuple!(A, B, C, D, E, F, G, H, I, J, K, L);
impl_decode_tuple!(A, B, C, D, E, F, G, H, I, J, K, L, M);
impl_decode_tuple!(A, B, C, D, E, F, G, H, I, J, K, L, M, N);
impl_decode_tuple!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O);
impl_decode_tuple!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P);
