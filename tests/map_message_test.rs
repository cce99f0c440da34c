//! Integration test - siklus producer → wire → consumer
//!
//! Mensimulasikan kontrak transport layer: encode sebelum kirim,
//! mark read-only setelah terkirim/diterima, decode saat diterima, dan
//! clear sebelum message di-reuse.
//!
//! Usage:
//!   cargo test --test map_message_test

use mapmsg::{
    decode, encode, DecodeError, FieldStore, MapMessage, MapMessageError, MessageState,
    OpaqueValue, Value,
};
use proptest::prelude::*;

fn full_message() -> MapMessage {
    let mut msg = MapMessage::new();
    msg.set_boolean("active", true).unwrap();
    msg.set_byte("priority", 4).unwrap();
    msg.set_short("port", 9876).unwrap();
    msg.set_char("grade", 'A').unwrap();
    msg.set_int("count", 42).unwrap();
    msg.set_long("offset", 1 << 40).unwrap();
    msg.set_float("ratio", 0.75).unwrap();
    msg.set_double("price", 1234.5678).unwrap();
    msg.set_string("topic", "orders.eu").unwrap();
    msg.set_bytes("blob", vec![1u8, 2, 3]).unwrap();
    msg
}

/// Bandingkan dua message lewat setiap getter bertipe
fn assert_observably_equal(a: &MapMessage, b: &MapMessage) {
    assert_eq!(a.map_names(), b.map_names());
    for name in &a.map_names() {
        assert_eq!(a.get_object(name).unwrap(), b.get_object(name).unwrap());
        assert_eq!(a.get_boolean(name).ok(), b.get_boolean(name).ok());
        assert_eq!(a.get_byte(name).ok(), b.get_byte(name).ok());
        assert_eq!(a.get_short(name).ok(), b.get_short(name).ok());
        assert_eq!(a.get_char(name).ok(), b.get_char(name).ok());
        assert_eq!(a.get_int(name).ok(), b.get_int(name).ok());
        assert_eq!(a.get_long(name).ok(), b.get_long(name).ok());
        assert_eq!(
            a.get_float(name).ok().map(f32::to_bits),
            b.get_float(name).ok().map(f32::to_bits)
        );
        assert_eq!(
            a.get_double(name).ok().map(f64::to_bits),
            b.get_double(name).ok().map(f64::to_bits)
        );
        assert_eq!(a.get_string(name).ok(), b.get_string(name).ok());
        assert_eq!(a.get_bytes(name).ok(), b.get_bytes(name).ok());
    }
}

#[test]
fn test_producer_consumer_cycle() {
    let mut produced = full_message();
    let wire = produced.to_wire().unwrap();
    assert_eq!(produced.state(), MessageState::ReadOnly);

    let consumed = MapMessage::from_wire(&wire).unwrap();
    assert_eq!(consumed.state(), MessageState::ReadOnly);
    assert_observably_equal(&produced, &consumed);

    // Reuse instance untuk send berikutnya
    produced.clear();
    assert!(produced.is_empty());
    produced.set_string("topic", "orders.us").unwrap();
    assert_eq!(produced.get_string("topic").unwrap().as_deref(), Some("orders.us"));
}

#[test]
fn test_consumer_cannot_write_until_cleared() {
    let wire = full_message().body_bytes().unwrap();
    let mut consumed = MapMessage::from_wire(&wire).unwrap();

    assert_eq!(consumed.set_int("count", 1), Err(MapMessageError::NotWritable));
    assert_eq!(
        consumed.set_bytes_range("blob", &[1, 2], 0, 1),
        Err(MapMessageError::NotWritable)
    );
    assert_eq!(consumed.get_int("count").unwrap(), 42);

    consumed.clear();
    assert!(consumed.map_names().is_empty());
    consumed.set_int("count", 1).unwrap();
}

#[test]
fn test_coercion_examples() {
    let mut msg = MapMessage::new();
    msg.set_int("n", 42).unwrap();
    msg.set_string("b", "true").unwrap();
    msg.set_string("s", "abc").unwrap();

    assert_eq!(msg.get_string("n").unwrap().as_deref(), Some("42"));
    assert!(msg.get_boolean("b").unwrap());
    assert!(matches!(
        msg.get_int("s"),
        Err(MapMessageError::FormatMismatch { .. })
    ));

    // Coercion lewat wire tetap sama
    let decoded = MapMessage::from_wire(&msg.body_bytes().unwrap()).unwrap();
    assert_eq!(decoded.get_long("n").unwrap(), 42);
    assert_eq!(decoded.get_string("n").unwrap().as_deref(), Some("42"));
}

#[test]
fn test_blank_names() {
    let mut msg = MapMessage::new();
    assert_eq!(msg.set_int("", 1), Err(MapMessageError::InvalidName));
    assert_eq!(msg.get_int("  "), Err(MapMessageError::InvalidName));
}

#[test]
fn test_truncated_encoding_fails() {
    let wire = encode(full_message().body()).unwrap();
    let truncated = &wire[..wire.len() - 2];

    assert!(matches!(
        decode(truncated),
        Err(MapMessageError::MalformedEncoding(DecodeError::Truncated { .. }))
    ));
    assert!(MapMessage::from_wire(truncated).is_err());
}

#[test]
fn test_opaque_stays_in_memory() {
    let mut msg = full_message();
    msg.set_object("ctx", Value::Opaque(OpaqueValue::new(vec!["a", "b"])))
        .unwrap();

    assert!(matches!(
        msg.body_bytes(),
        Err(MapMessageError::NotSerializable { ref name, .. }) if name == "ctx"
    ));

    let ctx = msg.get_object("ctx").unwrap().unwrap();
    match ctx {
        Value::Opaque(o) => assert_eq!(o.downcast_ref::<Vec<&str>>(), Some(&vec!["a", "b"])),
        other => panic!("expected opaque, got {other:?}"),
    }
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Boolean),
        any::<i8>().prop_map(Value::Byte),
        any::<i16>().prop_map(Value::Short),
        any::<char>().prop_map(Value::Char),
        any::<i32>().prop_map(Value::Int),
        any::<i64>().prop_map(Value::Long),
        any::<f32>()
            .prop_filter("NaN != NaN", |f| !f.is_nan())
            .prop_map(Value::Float),
        any::<f64>()
            .prop_filter("NaN != NaN", |f| !f.is_nan())
            .prop_map(Value::Double),
        ".{0,24}".prop_map(Value::String),
        proptest::collection::vec(any::<u8>(), 0..48).prop_map(Value::Bytes),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_preserves_fields(
        fields in proptest::collection::hash_map("[a-zA-Z_][a-zA-Z0-9_.]{0,15}", arb_value(), 0..24)
    ) {
        let store = FieldStore::try_from(fields).unwrap();
        let original = MapMessage::from_fields(store);

        let wire = encode(original.body()).unwrap();
        let decoded = MapMessage::from_fields(decode(&wire).unwrap());

        prop_assert_eq!(original.body(), decoded.body());
        assert_observably_equal(&original, &decoded);
    }

    #[test]
    fn prop_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let _ = decode(&bytes);
    }
}
