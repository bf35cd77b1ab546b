//! Walker round trips per shape category through all three codecs.
use {
    golcode::{BitSet, Decode, Encode, Error, ReadError},
    proptest::prelude::*,
    std::{
        collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
        fmt::Debug,
    },
};

#[derive(Encode, Decode, Debug, PartialEq, Clone)]
struct Inner {
    flag: bool,
    scale: f64,
    tags: Vec<u16>,
}

#[derive(Encode, Decode, Debug, PartialEq, Clone)]
enum Payload {
    Empty,
    Number(i64),
    Text { value: String, weight: f32 },
    Pair(u8, u8),
}

#[derive(Encode, Decode, Debug, PartialEq, Clone)]
struct Record {
    u: u64,
    f: f32,
    s: String,
    v: Payload,
}

#[derive(Encode, Decode, Debug, PartialEq, Clone)]
struct Generic<T> {
    value: T,
    rest: Option<Box<Generic<T>>>,
}

#[track_caller]
fn round_trip_all<T: Encode + Decode + PartialEq + Debug>(value: &T) {
    let bytes = golcode::encode_bit_packed(value).unwrap();
    assert_eq!(&golcode::decode_bit_packed::<T>(&bytes).unwrap(), value);

    let bytes = golcode::encode_byte_packed(value).unwrap();
    assert_eq!(&golcode::decode_byte_packed::<T>(&bytes).unwrap(), value);

    let bytes = golcode::encode_native(value).unwrap();
    assert_eq!(&golcode::decode_native::<T>(&bytes).unwrap(), value);
}

#[test]
fn primitives() {
    round_trip_all(&true);
    round_trip_all(&0u8);
    round_trip_all(&i8::MIN);
    round_trip_all(&u16::MAX);
    round_trip_all(&-12345i16);
    round_trip_all(&0xDEADBEEFu32);
    round_trip_all(&i32::MIN);
    round_trip_all(&u64::MAX);
    round_trip_all(&i64::MIN);
    round_trip_all(&i64::MAX);
    round_trip_all(&core::f32::consts::PI);
    round_trip_all(&-17.0f32);
    round_trip_all(&f64::MIN_POSITIVE);
    round_trip_all(&5e-324f64); // subnormal
    round_trip_all(&'x');
    round_trip_all(&'仁');
    round_trip_all(&usize::MAX);
    round_trip_all(&isize::MIN);
}

#[test]
fn strings() {
    round_trip_all(&String::new());
    round_trip_all(&"Foo".to_string());
    round_trip_all(&"So easy".to_string());
    round_trip_all(&"snowman ☃ and friends".to_string());
    round_trip_all(&"x".repeat(4096));
}

#[test]
fn optionals_and_boxes() {
    round_trip_all(&None::<u32>);
    round_trip_all(&Some(42u32));
    round_trip_all(&Some(Some(7u8)));
    round_trip_all(&None::<Option<u8>>);
    round_trip_all(&Some(None::<u8>));
    round_trip_all(&Box::new(17i64));
    round_trip_all(&None::<Box<u64>>);
    round_trip_all(&Some(Box::new("boxed".to_string())));
}

#[test]
fn sequences() {
    round_trip_all(&Vec::<u64>::new());
    round_trip_all(&vec![42u64]);
    round_trip_all(&(0..1000u64).collect::<Vec<_>>());
    round_trip_all(&vec![-1i64, 0, 1, i64::MIN, i64::MAX]);
    round_trip_all(&vec!["a".to_string(), String::new(), "ccc".to_string()]);
    round_trip_all(&VecDeque::from([1u8, 2, 3]));
    round_trip_all(&[0u8; 0]);
    round_trip_all(&[7u32, 8, 9]);
    round_trip_all(&[[1u8, 2], [3, 4], [5, 6]]);
}

#[test]
fn maps_and_sets() {
    round_trip_all(&HashMap::<u32, String>::new());
    round_trip_all(&HashMap::from([(1u32, "one".to_string()), (2, "two".to_string())]));
    round_trip_all(&BTreeMap::from([(-1i64, vec![1u8]), (8i64, vec![])]));
    round_trip_all(&HashSet::from([1u16, 512, 65535]));
    round_trip_all(&BTreeSet::from(["a".to_string(), "b".to_string()]));
}

#[test]
fn tuples() {
    round_trip_all(&(1u8, -2i16));
    round_trip_all(&(1u8, "two".to_string(), 3.0f64));
    round_trip_all(&(true, (2u64, 'c'), Some(4i32)));
}

#[test]
fn aggregates() {
    round_trip_all(&Inner {
        flag: true,
        scale: 2.5,
        tags: vec![1, 2, 3],
    });
    round_trip_all(&Record {
        u: u64::MAX,
        f: 0.0,
        s: "deep".to_string(),
        v: Payload::Text {
            value: "inner".to_string(),
            weight: -1.25,
        },
    });
    // deep generic recursion
    round_trip_all(&Generic {
        value: 1u32,
        rest: Some(Box::new(Generic {
            value: 2,
            rest: Some(Box::new(Generic {
                value: 3,
                rest: None,
            })),
        })),
    });
}

#[test]
fn durations_and_atomics() {
    use std::{
        sync::atomic::{AtomicI64, AtomicU64, Ordering},
        time::Duration,
    };

    round_trip_all(&Duration::ZERO);
    round_trip_all(&Duration::new(86_400, 999_999_999));
    round_trip_all(&Duration::MAX);

    let counter = AtomicU64::new(7_000_000_000);
    let bytes = golcode::encode_bit_packed(&counter).unwrap();
    let decoded: AtomicU64 = golcode::decode_bit_packed(&bytes).unwrap();
    assert_eq!(decoded.load(Ordering::SeqCst), 7_000_000_000);

    let signed = AtomicI64::new(-42);
    let bytes = golcode::encode_byte_packed(&signed).unwrap();
    let decoded: AtomicI64 = golcode::decode_byte_packed(&bytes).unwrap();
    assert_eq!(decoded.load(Ordering::SeqCst), -42);
}

#[test]
fn aggregate_through_bit_packed_codec() {
    let record = Record {
        u: 42,
        f: -17.0,
        s: "Foo".to_string(),
        v: Payload::Number(123),
    };
    let bytes = golcode::encode_bit_packed(&record).unwrap();
    let decoded: Record = golcode::decode_bit_packed(&bytes).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn every_union_arm_survives() {
    let arms = [
        Payload::Empty,
        Payload::Number(-123),
        Payload::Text {
            value: "arm".to_string(),
            weight: 0.5,
        },
        Payload::Pair(1, 2),
    ];
    for arm in &arms {
        round_trip_all(arm);
    }
}

#[test]
fn out_of_range_union_index_is_rejected() {
    let bytes = golcode::encode_bit_packed(&99u64).unwrap();
    assert!(matches!(
        golcode::decode_bit_packed::<Payload>(&bytes),
        Err(Error::Read(ReadError::InvalidUnionIndex(99)))
    ));
}

#[test]
fn wide_bitset_round_trips_everywhere() {
    let mut set = BitSet::<267>::new();
    for index in [0, 2, 4, 8, 16, 32, 41, 176, 200, 231, 265, 266] {
        set.set(index, true);
    }
    round_trip_all(&set);

    let mut small = BitSet::<17>::new();
    small.set(0, true);
    small.set(16, true);
    round_trip_all(&small);

    round_trip_all(&BitSet::<64>::new());
}

proptest! {
    #[test]
    fn arbitrary_records_round_trip(
        u in any::<u64>(),
        f in any::<f32>(),
        s in ".*",
        n in any::<i64>(),
    ) {
        let record = Record {
            u,
            f,
            s,
            v: Payload::Number(n),
        };
        let bytes = golcode::encode_bit_packed(&record).unwrap();
        let decoded: Record = golcode::decode_bit_packed(&bytes).unwrap();
        // compare floats by bit pattern so NaN payloads count
        prop_assert_eq!(decoded.u, record.u);
        prop_assert_eq!(decoded.f.to_bits(), record.f.to_bits());
        prop_assert_eq!(decoded.s, record.s);
        prop_assert_eq!(decoded.v, record.v);
    }

    #[test]
    fn arbitrary_collections_round_trip(
        vec in proptest::collection::vec(any::<i64>(), 0..128),
        map in proptest::collection::btree_map(any::<u32>(), ".*", 0..32),
        opt in proptest::option::of(any::<u16>()),
    ) {
        round_trip_all(&vec);
        round_trip_all(&map);
        round_trip_all(&opt);
    }
}
