// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec contract properties against the reference engine.

use schemac::bind::{BoundSet, ReferenceBinder};
use schemac::codec::{CodecEngine, CodecError, InstanceData, TypeKey, Value};
use schemac::registry::ModuleRegistry;
use schemac::schema::{
    EnumBuilder, ModuleBuilder, PrimitiveKind, StructBuilder, TypeRef, Version,
};
use serde_json::json;

fn v(s: &str) -> Version {
    s.parse().unwrap()
}

/// bar 1.0.0 and 2.0.0 both publish Other, with different shapes.
fn registry() -> ModuleRegistry {
    let mut reg = ModuleRegistry::new();
    reg.register(
        ModuleBuilder::new("bar", v("1.0.0"))
            .type_def(StructBuilder::new("Other").string_field("name").build())
            .build(),
    )
    .unwrap();
    reg.register(
        ModuleBuilder::new("bar", v("2.0.0"))
            .type_def(
                StructBuilder::new("Other")
                    .string_field("name")
                    .optional_field("weight", TypeRef::Primitive(PrimitiveKind::F64))
                    .build(),
            )
            .build(),
    )
    .unwrap();
    reg.register(
        ModuleBuilder::new("foo", v("4.0.0"))
            .type_def(
                StructBuilder::new("Thing")
                    .optional_field("name", TypeRef::Primitive(PrimitiveKind::String))
                    .optional_field("count", TypeRef::Primitive(PrimitiveKind::U32))
                    .optional_field("ratio", TypeRef::Primitive(PrimitiveKind::F64))
                    .optional_field("active", TypeRef::Primitive(PrimitiveKind::Bool))
                    .optional_field("other", TypeRef::import("bar", "^1.0".parse().unwrap(), "Other"))
                    .optional_field("other2", TypeRef::import("bar", "^2.0".parse().unwrap(), "Other"))
                    .optional_field("level", TypeRef::local("Level"))
                    .build(),
            )
            .type_def(
                EnumBuilder::new("Level")
                    .member("Low", 1i64)
                    .member("High", 2i64)
                    .build(),
            )
            .build(),
    )
    .unwrap();
    reg
}

fn bind(reg: &ModuleRegistry) -> BoundSet {
    ReferenceBinder::new(reg).bind_all().unwrap()
}

fn thing_key() -> TypeKey {
    TypeKey::new("foo", v("4.0.0"), "Thing")
}

fn other_value(name: &str) -> Value {
    let mut other = Value::empty_struct();
    other.set_field("name", name.into());
    other
}

#[test]
fn round_trip_preserves_every_present_field() {
    let reg = registry();
    let set = bind(&reg);
    let engine = CodecEngine::new(&set);

    let mut thing = InstanceData::new_struct(thing_key());
    thing.set("name", "widget").unwrap();
    thing.set("count", 7u32).unwrap();
    thing.set("ratio", 0.5f64).unwrap();
    thing.set("active", true).unwrap();
    thing.set("other", other_value("from v1")).unwrap();
    thing.set("level", Value::Enum("High".to_string())).unwrap();

    let encoded = engine.encode(&thing).unwrap();
    let decoded = engine.decode(&thing_key(), &encoded).unwrap();
    assert_eq!(decoded, thing);
}

#[test]
fn absent_optional_fields_are_omitted_not_null() {
    let reg = registry();
    let set = bind(&reg);
    let engine = CodecEngine::new(&set);

    let mut thing = InstanceData::new_struct(thing_key());
    thing.set("name", "widget").unwrap();

    let encoded = engine.encode(&thing).unwrap();
    let object = encoded.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert!(!object.contains_key("count"));
    assert!(!object.contains_key("other"));
}

#[test]
fn unknown_keys_are_tolerated() {
    let reg = registry();
    let set = bind(&reg);
    let engine = CodecEngine::new(&set);

    let raw = json!({
        "name": "widget",
        "introduced_later": {"nested": true},
    });
    let decoded = engine.decode(&thing_key(), &raw).unwrap();
    assert_eq!(decoded.get::<String>("name").unwrap(), "widget");
    assert!(!decoded.is_present("introduced_later"));
}

#[test]
fn nested_fields_delegate_to_their_own_version() {
    let reg = registry();
    let set = bind(&reg);
    let engine = CodecEngine::new(&set);

    // "weight" exists only in bar 2.0.0; the ^1.0 binding must ignore it,
    // the ^2.0 binding must keep it.
    let raw = json!({
        "other": {"name": "a", "weight": 1.5},
        "other2": {"name": "b", "weight": 1.5},
    });
    let decoded = engine.decode(&thing_key(), &raw).unwrap();

    let other = decoded.get::<Value>("other").unwrap();
    assert!(other.get_field("weight").is_none());

    let other2 = decoded.get::<Value>("other2").unwrap();
    assert_eq!(other2.get_field("weight").and_then(Value::as_f64), Some(1.5));
}

#[test]
fn integer_enum_round_trips_by_raw_value() {
    let reg = registry();
    let set = bind(&reg);
    let engine = CodecEngine::new(&set);
    let key = TypeKey::new("foo", v("4.0.0"), "Level");

    let low = InstanceData::enum_member(key.clone(), "Low");
    let encoded = engine.encode(&low).unwrap();
    assert_eq!(encoded, json!(1));

    let decoded = engine.decode(&key, &encoded).unwrap();
    assert_eq!(decoded, low);
}

#[test]
fn enum_decode_failure_is_fatal() {
    let reg = registry();
    let set = bind(&reg);
    let engine = CodecEngine::new(&set);
    let key = TypeKey::new("foo", v("4.0.0"), "Level");

    let err = engine.decode(&key, &json!(99)).unwrap_err();
    match err {
        CodecError::NoMatchingEnumValue { enum_name, .. } => assert_eq!(enum_name, "Level"),
        other => panic!("expected NoMatchingEnumValue, got {}", other),
    }
}

#[test]
fn randomized_instances_round_trip() {
    let reg = registry();
    let set = bind(&reg);
    let engine = CodecEngine::new(&set);

    fastrand::seed(0x5eed);
    for _ in 0..200 {
        let mut thing = InstanceData::new_struct(thing_key());
        if fastrand::bool() {
            thing.set("name", format!("n{}", fastrand::u32(..))).unwrap();
        }
        if fastrand::bool() {
            thing.set("count", fastrand::u32(..)).unwrap();
        }
        if fastrand::bool() {
            thing.set("active", fastrand::bool()).unwrap();
        }
        if fastrand::bool() {
            let member = if fastrand::bool() { "Low" } else { "High" };
            thing.set("level", Value::Enum(member.to_string())).unwrap();
        }
        if fastrand::bool() {
            thing
                .set("other", other_value(&format!("o{}", fastrand::u16(..))))
                .unwrap();
        }

        let encoded = engine.encode(&thing).unwrap();
        let decoded = engine.decode(&thing_key(), &encoded).unwrap();
        assert_eq!(decoded, thing);
    }
}
