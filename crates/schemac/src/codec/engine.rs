// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reference encode/decode implementing the codec contract.
//!
//! Executes the exact semantics every emitted codec must exhibit, against
//! the key→value interchange mapping (JSON value trees). Used to validate
//! the contract and as the runtime codec for dynamic embedders.

use crate::bind::{BoundModule, BoundRef, BoundSet};
use crate::codec::{InstanceData, TypeKey, Value};
use crate::schema::{EnumDef, PrimitiveKind, RawValue, StructDef, TypeDef};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CodecError
// ---------------------------------------------------------------------------

/// Errors raised by encode/decode against live data.
#[derive(Debug)]
pub enum CodecError {
    /// The raw value matched no declared enum member. Fatal to the decode
    /// call; never recovered by substituting a default.
    NoMatchingEnumValue { enum_name: String, raw: String },
    /// The instance names a type the bound set does not contain.
    UnknownType(TypeKey),
    /// A value does not fit the declared shape.
    TypeMismatch { expected: String, got: String },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatchingEnumValue { enum_name, raw } => {
                write!(f, "no matching value for enum {}: {}", enum_name, raw)
            }
            Self::UnknownType(key) => write!(f, "unknown type: {}", key),
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {}, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for CodecError {}

// ---------------------------------------------------------------------------
// CodecEngine
// ---------------------------------------------------------------------------

/// Encode/decode driver over a run's bound modules.
pub struct CodecEngine<'a> {
    set: &'a BoundSet,
}

impl<'a> CodecEngine<'a> {
    /// Create an engine over the bound output of a compilation run.
    pub fn new(set: &'a BoundSet) -> Self {
        Self { set }
    }

    /// Encode an instance to the interchange mapping.
    ///
    /// Struct entries are emitted per *present* field only; absent fields
    /// are omitted entirely. Nested values delegate to the referenced
    /// type's own encode. Enum instances encode to their raw value.
    pub fn encode(&self, data: &InstanceData) -> Result<JsonValue, CodecError> {
        let (owner, ty) = self.type_def(data.type_key())?;
        self.encode_value(owner, ty, data.value())
    }

    /// Decode an interchange mapping into an instance of `key`.
    ///
    /// Declared keys missing from the input (or carrying null) leave the
    /// field absent; unknown keys are silently ignored, so data produced by
    /// a newer schema version stays decodable.
    pub fn decode(&self, key: &TypeKey, raw: &JsonValue) -> Result<InstanceData, CodecError> {
        let (owner, ty) = self.type_def(key)?;
        let value = self.decode_value(owner, ty, raw)?;
        Ok(InstanceData::from_value(key.clone(), value))
    }

    fn type_def(
        &self,
        key: &TypeKey,
    ) -> Result<(&'a BoundModule, &'a TypeDef<BoundRef>), CodecError> {
        let module = self
            .set
            .get(&key.module, &key.version)
            .ok_or_else(|| CodecError::UnknownType(key.clone()))?;
        let ty = module
            .type_def(&key.name)
            .ok_or_else(|| CodecError::UnknownType(key.clone()))?;
        Ok((module, ty))
    }

    /// Follow a bound reference to the type definition it names.
    fn deref_type(
        &self,
        owner: &'a BoundModule,
        reference: &BoundRef,
    ) -> Result<(&'a BoundModule, &'a TypeDef<BoundRef>), CodecError> {
        match reference {
            BoundRef::Primitive(_) => Err(CodecError::TypeMismatch {
                expected: "struct or enum reference".to_string(),
                got: "primitive".to_string(),
            }),
            BoundRef::Local(name) => {
                let ty = owner.type_def(name).ok_or_else(|| {
                    CodecError::UnknownType(TypeKey::new(
                        owner.name.clone(),
                        owner.version.clone(),
                        name.clone(),
                    ))
                })?;
                Ok((owner, ty))
            }
            BoundRef::Imported { binding, name } => self.type_def(&TypeKey::new(
                binding.module.clone(),
                binding.version.clone(),
                name.clone(),
            )),
        }
    }

    fn encode_value(
        &self,
        owner: &'a BoundModule,
        ty: &TypeDef<BoundRef>,
        value: &Value,
    ) -> Result<JsonValue, CodecError> {
        match ty {
            TypeDef::Struct(def) => self.encode_struct(owner, def, value),
            TypeDef::Enum(def) => encode_enum(def, value),
        }
    }

    fn encode_struct(
        &self,
        owner: &'a BoundModule,
        def: &StructDef<BoundRef>,
        value: &Value,
    ) -> Result<JsonValue, CodecError> {
        let fields = match value {
            Value::Struct(fields) => fields,
            other => {
                return Err(CodecError::TypeMismatch {
                    expected: format!("struct {}", def.name),
                    got: other.kind_name().to_string(),
                })
            }
        };

        let mut out = JsonMap::new();
        for field in &def.fields {
            // Absent fields are omitted entirely, not written as null.
            let present = match fields.get(&field.name) {
                Some(v) => v,
                None => continue,
            };
            let encoded = match &field.ty {
                BoundRef::Primitive(kind) => primitive_to_json(*kind, present)?,
                reference => {
                    let (target_owner, target) = self.deref_type(owner, reference)?;
                    self.encode_value(target_owner, target, present)?
                }
            };
            out.insert(field.name.clone(), encoded);
        }
        Ok(JsonValue::Object(out))
    }

    fn decode_value(
        &self,
        owner: &'a BoundModule,
        ty: &TypeDef<BoundRef>,
        raw: &JsonValue,
    ) -> Result<Value, CodecError> {
        match ty {
            TypeDef::Struct(def) => self.decode_struct(owner, def, raw),
            TypeDef::Enum(def) => decode_enum(def, raw),
        }
    }

    fn decode_struct(
        &self,
        owner: &'a BoundModule,
        def: &StructDef<BoundRef>,
        raw: &JsonValue,
    ) -> Result<Value, CodecError> {
        let object = match raw {
            JsonValue::Object(object) => object,
            other => {
                return Err(CodecError::TypeMismatch {
                    expected: format!("mapping for struct {}", def.name),
                    got: json_kind_name(other).to_string(),
                })
            }
        };

        // Keys in `object` that match no declared field are ignored: data
        // from a newer schema version must stay decodable here.
        let mut fields = HashMap::new();
        for field in &def.fields {
            let present = match object.get(&field.name) {
                Some(v) if !v.is_null() => v,
                _ => continue,
            };
            let decoded = match &field.ty {
                BoundRef::Primitive(kind) => json_to_primitive(*kind, present)?,
                reference => {
                    let (target_owner, target) = self.deref_type(owner, reference)?;
                    self.decode_value(target_owner, target, present)?
                }
            };
            fields.insert(field.name.clone(), decoded);
        }
        Ok(Value::Struct(fields))
    }
}

// ---------------------------------------------------------------------------
// Enum codec
// ---------------------------------------------------------------------------

fn encode_enum(def: &EnumDef, value: &Value) -> Result<JsonValue, CodecError> {
    let member_name = value.enum_member().ok_or_else(|| CodecError::TypeMismatch {
        expected: format!("enum {}", def.name),
        got: value.kind_name().to_string(),
    })?;
    let member = def
        .member(member_name)
        .ok_or_else(|| CodecError::TypeMismatch {
            expected: format!("member of enum {}", def.name),
            got: member_name.to_string(),
        })?;

    Ok(match &member.value {
        RawValue::Str(s) => JsonValue::String(s.clone()),
        RawValue::Int(i) => JsonValue::from(*i),
    })
}

fn decode_enum(def: &EnumDef, raw: &JsonValue) -> Result<Value, CodecError> {
    // Linear scan in declaration order; first raw-equal member wins.
    for member in &def.members {
        let matches = match (&member.value, raw) {
            (RawValue::Str(s), JsonValue::String(r)) => s == r,
            (RawValue::Int(i), JsonValue::Number(n)) => n.as_i64() == Some(*i),
            _ => false,
        };
        if matches {
            return Ok(Value::Enum(member.name.clone()));
        }
    }
    Err(CodecError::NoMatchingEnumValue {
        enum_name: def.name.clone(),
        raw: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Primitive codec
// ---------------------------------------------------------------------------

fn primitive_to_json(kind: PrimitiveKind, value: &Value) -> Result<JsonValue, CodecError> {
    let mismatch = || CodecError::TypeMismatch {
        expected: kind.name().to_string(),
        got: value.kind_name().to_string(),
    };

    match (kind, value) {
        (PrimitiveKind::Bool, Value::Bool(v)) => Ok(JsonValue::Bool(*v)),
        (PrimitiveKind::U32, Value::U32(v)) => Ok(JsonValue::from(*v)),
        (PrimitiveKind::U64, Value::U64(v)) => Ok(JsonValue::from(*v)),
        (PrimitiveKind::I32, Value::I32(v)) => Ok(JsonValue::from(*v)),
        (PrimitiveKind::I64, Value::I64(v)) => Ok(JsonValue::from(*v)),
        (PrimitiveKind::F32, Value::F32(v)) => Number::from_f64(f64::from(*v))
            .map(JsonValue::Number)
            .ok_or_else(|| CodecError::TypeMismatch {
                expected: "finite f32".to_string(),
                got: v.to_string(),
            }),
        (PrimitiveKind::F64, Value::F64(v)) => Number::from_f64(*v)
            .map(JsonValue::Number)
            .ok_or_else(|| CodecError::TypeMismatch {
                expected: "finite f64".to_string(),
                got: v.to_string(),
            }),
        (PrimitiveKind::String, Value::String(s)) => Ok(JsonValue::String(s.clone())),
        _ => Err(mismatch()),
    }
}

fn json_to_primitive(kind: PrimitiveKind, raw: &JsonValue) -> Result<Value, CodecError> {
    let mismatch = || CodecError::TypeMismatch {
        expected: kind.name().to_string(),
        got: json_kind_name(raw).to_string(),
    };

    match kind {
        PrimitiveKind::Bool => raw.as_bool().map(Value::Bool).ok_or_else(mismatch),
        PrimitiveKind::U32 => raw
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Value::U32)
            .ok_or_else(mismatch),
        PrimitiveKind::U64 => raw.as_u64().map(Value::U64).ok_or_else(mismatch),
        PrimitiveKind::I32 => raw
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Value::I32)
            .ok_or_else(mismatch),
        PrimitiveKind::I64 => raw.as_i64().map(Value::I64).ok_or_else(mismatch),
        // f32 → f64 widening is exact, so casting back loses nothing.
        PrimitiveKind::F32 => raw
            .as_f64()
            .map(|f| Value::F32(f as f32))
            .ok_or_else(mismatch),
        PrimitiveKind::F64 => raw.as_f64().map(Value::F64).ok_or_else(mismatch),
        PrimitiveKind::String => raw
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(mismatch),
    }
}

fn json_kind_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::ReferenceBinder;
    use crate::registry::ModuleRegistry;
    use crate::schema::{EnumBuilder, ModuleBuilder, PrimitiveKind, StructBuilder, TypeRef, Version};
    use serde_json::json;

    fn test_set() -> (ModuleRegistry, Version) {
        let mut reg = ModuleRegistry::new();
        reg.register(
            ModuleBuilder::new("test", Version::new(1, 0, 0))
                .type_def(
                    StructBuilder::new("Thing")
                        .string_field("name")
                        .optional_field("count", TypeRef::Primitive(PrimitiveKind::U32))
                        .optional_field("entry", TypeRef::local("Entry"))
                        .build(),
                )
                .type_def(
                    EnumBuilder::new("Entry")
                        .member("A", "foo")
                        .member("B", "bar")
                        .build(),
                )
                .build(),
        )
        .unwrap();
        (reg, Version::new(1, 0, 0))
    }

    fn thing_key(version: &Version) -> TypeKey {
        TypeKey::new("test", version.clone(), "Thing")
    }

    #[test]
    fn encode_omits_absent_fields() {
        let (reg, version) = test_set();
        let set = ReferenceBinder::new(&reg).bind_all().unwrap();
        let engine = CodecEngine::new(&set);

        let mut data = InstanceData::new_struct(thing_key(&version));
        data.set("name", "x").unwrap();

        let encoded = engine.encode(&data).unwrap();
        assert_eq!(encoded, json!({"name": "x"}));
        assert!(encoded.get("count").is_none());
    }

    #[test]
    fn decode_ignores_unknown_keys() {
        let (reg, version) = test_set();
        let set = ReferenceBinder::new(&reg).bind_all().unwrap();
        let engine = CodecEngine::new(&set);

        let decoded = engine
            .decode(
                &thing_key(&version),
                &json!({"name": "x", "added_in_v2": 123}),
            )
            .unwrap();
        assert_eq!(decoded.get::<String>("name").unwrap(), "x");
        assert!(!decoded.is_present("added_in_v2"));
    }

    #[test]
    fn decode_treats_null_as_absent() {
        let (reg, version) = test_set();
        let set = ReferenceBinder::new(&reg).bind_all().unwrap();
        let engine = CodecEngine::new(&set);

        let decoded = engine
            .decode(&thing_key(&version), &json!({"name": "x", "count": null}))
            .unwrap();
        assert!(!decoded.is_present("count"));
    }

    #[test]
    fn enum_decode_matches_nth_member_and_fails_otherwise() {
        let (reg, version) = test_set();
        let set = ReferenceBinder::new(&reg).bind_all().unwrap();
        let engine = CodecEngine::new(&set);
        let key = TypeKey::new("test", version, "Entry");

        let decoded = engine.decode(&key, &json!("bar")).unwrap();
        assert_eq!(decoded.value().enum_member(), Some("B"));

        let err = engine.decode(&key, &json!("baz")).unwrap_err();
        assert!(matches!(err, CodecError::NoMatchingEnumValue { .. }));
    }

    #[test]
    fn nested_enum_round_trips_through_struct() {
        let (reg, version) = test_set();
        let set = ReferenceBinder::new(&reg).bind_all().unwrap();
        let engine = CodecEngine::new(&set);

        let mut data = InstanceData::new_struct(thing_key(&version));
        data.set("name", "x").unwrap();
        data.set("entry", Value::Enum("A".to_string())).unwrap();

        let encoded = engine.encode(&data).unwrap();
        assert_eq!(encoded, json!({"name": "x", "entry": "foo"}));

        let decoded = engine.decode(&thing_key(&version), &encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn primitive_shape_is_checked() {
        let (reg, version) = test_set();
        let set = ReferenceBinder::new(&reg).bind_all().unwrap();
        let engine = CodecEngine::new(&set);

        let err = engine
            .decode(&thing_key(&version), &json!({"count": "not a number"}))
            .unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }
}
