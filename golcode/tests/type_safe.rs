//! The type-safe wrapper composed over full walker encodes.
use golcode::{
    BitPackDeserializer, BitPackSerializer, Cursor, Decode, Encode, NativeDeserializer,
    NativeSerializer, ReadError, Serializer, TypeSafeDeserializer, TypeSafeSerializer, TypeTag,
};

#[derive(Encode, Decode, Debug, PartialEq)]
struct Telemetry {
    sensor: u16,
    reading: f64,
    label: String,
    window: Option<u32>,
}

fn encode_type_safe_bit_packed<T: Encode>(value: &T) -> Vec<u8> {
    let mut serializer = TypeSafeSerializer::new(BitPackSerializer::new(Vec::new()));
    value.encode(&mut serializer).unwrap();
    serializer.flush().unwrap();
    serializer.into_inner().into_inner()
}

#[test]
fn tagged_aggregate_round_trips() {
    let telemetry = Telemetry {
        sensor: 7,
        reading: -40.25,
        label: "intake".to_string(),
        window: Some(12),
    };
    let bytes = encode_type_safe_bit_packed(&telemetry);

    let mut deserializer =
        TypeSafeDeserializer::new(BitPackDeserializer::new(bytes.as_slice()));
    assert_eq!(Telemetry::decode(&mut deserializer).unwrap(), telemetry);
}

#[test]
fn tags_are_per_leaf_not_per_compound() {
    // Option<u32> = tagged bool + tagged u32; no tag for the option itself
    let mut serializer = TypeSafeSerializer::new(NativeSerializer::new(Vec::new()));
    Some(9u32).encode(&mut serializer).unwrap();
    serializer.flush().unwrap();
    let bytes = serializer.into_inner().into_inner();
    assert_eq!(bytes.len(), (1 + 1) + (1 + 4));
    assert_eq!(bytes[0], TypeTag::Bool as u8);
    assert_eq!(bytes[2], TypeTag::U32 as u8);
}

#[test]
fn wrong_leaf_type_is_detected_mid_stream() {
    let bytes = {
        let mut serializer = TypeSafeSerializer::new(NativeSerializer::new(Vec::new()));
        vec![1.5f32, 2.5].encode(&mut serializer).unwrap();
        serializer.flush().unwrap();
        serializer.into_inner().into_inner()
    };

    // the length leaf matches (u64), the first element does not
    let mut deserializer =
        TypeSafeDeserializer::new(NativeDeserializer::new(bytes.as_slice()));
    assert!(matches!(
        Vec::<i32>::decode(&mut deserializer),
        Err(ReadError::TypeMismatch {
            expected: TypeTag::I32,
            found: TypeTag::F32,
        })
    ));
}

#[test]
fn reposition_after_mismatch_recovers_the_value() {
    let bytes = {
        let mut serializer = TypeSafeSerializer::new(NativeSerializer::new(Vec::new()));
        17.0f32.encode(&mut serializer).unwrap();
        serializer.flush().unwrap();
        serializer.into_inner().into_inner()
    };

    let mut cursor = Cursor::new(&bytes);
    {
        let mut deserializer =
            TypeSafeDeserializer::new(NativeDeserializer::new(&mut cursor));
        assert!(matches!(
            i32::decode(&mut deserializer),
            Err(ReadError::TypeMismatch { .. })
        ));
    }

    cursor.set_position(0);
    let mut deserializer = TypeSafeDeserializer::new(NativeDeserializer::new(&mut cursor));
    assert_eq!(f32::decode(&mut deserializer).unwrap(), 17.0);
}

#[test]
fn untagged_stream_is_not_accepted() {
    // a plain native stream fed to the type-safe reader trips on the first
    // byte it tries to interpret as a tag
    let bytes = golcode::encode_native(&0xEEEE_EEEEu32).unwrap();
    let mut deserializer =
        TypeSafeDeserializer::new(NativeDeserializer::new(bytes.as_slice()));
    assert!(matches!(
        u32::decode(&mut deserializer),
        Err(ReadError::InvalidTypeTag(0xEE))
    ));
}
