use std::io::Cursor;

use duper_core::{
    dump, dumps, load, loads, BoundValue, DuperError, SerializeOptions, TypeBinding, TypeRegistry,
    UntaggedMapPolicy,
};

fn plain() -> SerializeOptions {
    SerializeOptions::default().untagged_maps(UntaggedMapPolicy::Plain)
}

/// Assert that decode → encode reproduces the input text exactly, and that
/// decoding the output again yields an equal bound value.
fn assert_roundtrip(text: &str) {
    let registry = TypeRegistry::new();
    let bound = loads(text, &registry).expect("loads failed");
    let encoded = dumps(&bound, &registry, plain()).expect("dumps failed");
    assert_eq!(
        encoded, text,
        "text roundtrip failed:\n  input:  {text}\n  output: {encoded}"
    );
    let rebound = loads(&encoded, &registry).expect("re-loads failed");
    assert_eq!(bound, rebound, "value roundtrip failed for {text}");
}

// ============================================================================
// Scalar Roundtrips
// ============================================================================

#[test]
fn roundtrip_null() {
    assert_roundtrip("null");
}

#[test]
fn roundtrip_booleans() {
    assert_roundtrip("true");
    assert_roundtrip("false");
}

#[test]
fn roundtrip_integers() {
    assert_roundtrip("0");
    assert_roundtrip("42");
    assert_roundtrip("-7");
    assert_roundtrip("9223372036854775807");
    assert_roundtrip("-9223372036854775808");
}

#[test]
fn roundtrip_floats() {
    assert_roundtrip("3.14");
    assert_roundtrip("-0.5");
    assert_roundtrip("1.0");
}

#[test]
fn roundtrip_strings() {
    assert_roundtrip(r#""hello""#);
    assert_roundtrip(r#""""#);
    assert_roundtrip(r#""say \"hi\"""#);
    assert_roundtrip(r#""line1\nline2""#);
    assert_roundtrip(r#""café""#);
}

// ============================================================================
// Structural Roundtrips
// ============================================================================

#[test]
fn roundtrip_lists() {
    assert_roundtrip("[]");
    assert_roundtrip("[1, 2, 3]");
    assert_roundtrip(r#"[1, "two", true, null, 2.5]"#);
    assert_roundtrip("[[1], [[2]]]");
}

#[test]
fn roundtrip_maps() {
    assert_roundtrip("{}");
    assert_roundtrip("{a: 1}");
    assert_roundtrip(r#"{a: 1, b: {c: [true]}, "odd key": null}"#);
}

#[test]
fn roundtrip_duplicate_keys() {
    assert_roundtrip("{a: 1, a: 2}");
}

#[test]
fn roundtrip_tagged_values() {
    assert_roundtrip("Point({x: 1, y: 2})");
    assert_roundtrip("Set([1, 2])");
    assert_roundtrip(r#"Uuid("7039311b-02d2-4849-a6de-900d4dbe9acb")"#);
    assert_roundtrip(r#"User({id: Uuid("abc"), metadata: Meta({ip: "127.0.0.1"})})"#);
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

#[test]
fn scenario_integer_document() {
    let registry = TypeRegistry::new();
    let bound = loads("42", &registry).unwrap();
    assert_eq!(bound, BoundValue::Integer(42));
    assert_eq!(
        dumps(&bound, &registry, SerializeOptions::default()).unwrap(),
        "42"
    );
}

#[test]
fn scenario_list_document() {
    let registry = TypeRegistry::new();
    let bound = loads("[1, 2, 3]", &registry).unwrap();
    assert_eq!(
        bound,
        BoundValue::List(vec![
            BoundValue::Integer(1),
            BoundValue::Integer(2),
            BoundValue::Integer(3),
        ])
    );
    assert_eq!(
        dumps(&bound, &registry, SerializeOptions::default()).unwrap(),
        "[1, 2, 3]"
    );
}

#[test]
fn scenario_unknown_tag_preservation() {
    let registry = TypeRegistry::new();
    let bound = loads("Point({x: 1, y: 2})", &registry).unwrap();
    match &bound {
        BoundValue::UnknownTagged { tag, .. } => assert_eq!(tag, "Point"),
        other => panic!("expected UnknownTagged, got {other:?}"),
    }
    assert_eq!(
        dumps(&bound, &registry, SerializeOptions::default()).unwrap(),
        "Point({x: 1, y: 2})"
    );
}

#[test]
fn scenario_bare_map_gains_the_unknown_tag() {
    // Documented asymmetry: untagged in, tagged out under the default
    // policy. See the serializer tests for the Plain opt-out.
    let registry = TypeRegistry::new();
    let bound = loads("{a: 1}", &registry).unwrap();
    assert_eq!(
        dumps(&bound, &registry, SerializeOptions::default()).unwrap(),
        "DuperUnknown({a: 1})"
    );
}

#[test]
fn scenario_unclosed_tag_fails_with_position() {
    let registry = TypeRegistry::new();
    match loads("Foo(", &registry) {
        Err(DuperError::Parse { position, .. }) => {
            assert_eq!(position.offset, 4);
            assert_eq!(position.column, 5);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

// ============================================================================
// Registered-Type Roundtrips
// ============================================================================

fn point_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    let binding = TypeBinding::new("Point")
        .unwrap()
        .with_constructor(|payload| match &payload {
            BoundValue::UntaggedMap(fields) if fields.len() == 2 => Ok(payload),
            _ => Err("expected exactly {x, y}".to_string()),
        });
    registry.register(binding).unwrap();
    registry
}

#[test]
fn roundtrip_registered_instance() {
    let registry = point_registry();
    let bound = loads("Point({x: 1, y: 2})", &registry).unwrap();
    assert!(matches!(bound, BoundValue::Known { .. }));

    let text = dumps(&bound, &registry, SerializeOptions::default()).unwrap();
    assert_eq!(text, "Point({x: 1, y: 2})");

    // Field-for-field, order-preserving equality after the second trip.
    let rebound = loads(&text, &registry).unwrap();
    assert_eq!(bound, rebound);
}

#[test]
fn strip_identifiers_then_reload_loses_the_binding() {
    let registry = point_registry();
    let bound = loads("Point({x: 1, y: 2})", &registry).unwrap();
    let stripped = dumps(
        &bound,
        &registry,
        SerializeOptions::default()
            .strip_identifiers(true)
            .untagged_maps(UntaggedMapPolicy::Plain),
    )
    .unwrap();
    assert_eq!(stripped, "{x: 1, y: 2}");
    assert!(matches!(
        loads(&stripped, &registry).unwrap(),
        BoundValue::UntaggedMap(_)
    ));
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn dumps_loads_reaches_a_fixpoint() {
    let registry = TypeRegistry::new();
    for source in [
        "{a: 1}",
        "Point({x: 1, y: 2})",
        "[{nested: {deep: 1}}, Foo(null)]",
        "// comment\n[1, 2,]",
    ] {
        let first = dumps(
            &loads(source, &registry).unwrap(),
            &registry,
            SerializeOptions::default(),
        )
        .unwrap();
        let second = dumps(
            &loads(&first, &registry).unwrap(),
            &registry,
            SerializeOptions::default(),
        )
        .unwrap();
        assert_eq!(first, second, "no fixpoint for {source:?}");
    }
}

// ============================================================================
// Stream Variants
// ============================================================================

#[test]
fn dump_and_load_through_byte_buffers() {
    let registry = TypeRegistry::new();
    let bound = loads("Point({x: 1, y: 2})", &registry).unwrap();

    let mut sink = Vec::new();
    dump(&bound, &mut sink, &registry, SerializeOptions::default()).unwrap();
    assert_eq!(sink, b"Point({x: 1, y: 2})");

    let reloaded = load(Cursor::new(sink), &registry).unwrap();
    assert_eq!(bound, reloaded);
}

#[test]
fn load_rejects_invalid_utf8() {
    let registry = TypeRegistry::new();
    let result = load(Cursor::new(vec![0xff, 0xfe, b'1']), &registry);
    assert!(matches!(result, Err(DuperError::Utf8(_))));
}

#[test]
fn output_has_no_trailing_newline() {
    let registry = TypeRegistry::new();
    let bound = loads("{a: 1}", &registry).unwrap();
    let text = dumps(&bound, &registry, SerializeOptions::default()).unwrap();
    assert!(!text.ends_with('\n'));
}
