// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed instance container bound to a concrete schema type.

use crate::codec::Value;
use crate::schema::Version;
use std::fmt;

// ---------------------------------------------------------------------------
// InstanceError
// ---------------------------------------------------------------------------

/// Errors for instance field access.
#[derive(Debug)]
pub enum InstanceError {
    FieldAbsent(String),
    TypeMismatch { expected: String, got: String },
    NotAStruct(String),
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldAbsent(name) => write!(f, "field absent: {}", name),
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {}, got {}", expected, got)
            }
            Self::NotAStruct(op) => write!(f, "{} requires a struct instance", op),
        }
    }
}

impl std::error::Error for InstanceError {}

// ---------------------------------------------------------------------------
// TypeKey
// ---------------------------------------------------------------------------

/// Identifies a concrete bound type: (module, version, type name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub module: String,
    pub version: Version,
    pub name: String,
}

impl TypeKey {
    pub fn new(module: impl Into<String>, version: Version, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            version,
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.module, self.version, self.name)
    }
}

// ---------------------------------------------------------------------------
// InstanceData
// ---------------------------------------------------------------------------

/// A dynamic value paired with the bound type it conforms to.
///
/// Struct instances start with every field absent; `set` makes a field
/// present and `clear` returns it to absent. Extra keys set on an instance
/// are not emitted by encode, which only walks declared fields.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceData {
    key: TypeKey,
    value: Value,
}

impl InstanceData {
    /// Create an empty struct instance.
    pub fn new_struct(key: TypeKey) -> Self {
        Self {
            key,
            value: Value::empty_struct(),
        }
    }

    /// Create an enum instance holding the given member.
    pub fn enum_member(key: TypeKey, member: impl Into<String>) -> Self {
        Self {
            key,
            value: Value::Enum(member.into()),
        }
    }

    /// Wrap an existing value.
    pub fn from_value(key: TypeKey, value: Value) -> Self {
        Self { key, value }
    }

    /// The bound type this instance conforms to.
    pub fn type_key(&self) -> &TypeKey {
        &self.key
    }

    /// The underlying value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Mutable access to the underlying value.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Into the inner value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Get a typed field value. Fails if the field is absent.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, InstanceError> {
        let field = self
            .value
            .get_field(name)
            .ok_or_else(|| InstanceError::FieldAbsent(name.to_string()))?;
        T::from_value(field)
    }

    /// Set a field, making it present.
    pub fn set<T: IntoValue>(&mut self, name: &str, value: T) -> Result<(), InstanceError> {
        if self.value.set_field(name, value.into_value()) {
            Ok(())
        } else {
            Err(InstanceError::NotAStruct("set".into()))
        }
    }

    /// Clear a field, making it absent.
    pub fn clear(&mut self, name: &str) -> Result<(), InstanceError> {
        if matches!(self.value, Value::Struct(_)) {
            self.value.clear_field(name);
            Ok(())
        } else {
            Err(InstanceError::NotAStruct("clear".into()))
        }
    }

    /// Whether a field is present.
    pub fn is_present(&self, name: &str) -> bool {
        self.value.get_field(name).is_some()
    }
}

// ---------------------------------------------------------------------------
// Conversion traits
// ---------------------------------------------------------------------------

/// Trait for converting from a dynamic value.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, InstanceError>;
}

/// Trait for converting into a dynamic value.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, InstanceError> {
                match value {
                    Value::$variant(v) => Ok(*v),
                    other => Err(InstanceError::TypeMismatch {
                        expected: $name.to_string(),
                        got: other.kind_name().to_string(),
                    }),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(u32, U32, "u32");
impl_from_value!(u64, U64, "u64");
impl_from_value!(i32, I32, "i32");
impl_from_value!(i64, I64, "i64");
impl_from_value!(f32, F32, "f32");
impl_from_value!(f64, F64, "f64");

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, InstanceError> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, InstanceError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(InstanceError::TypeMismatch {
                expected: "string".to_string(),
                got: other.kind_name().to_string(),
            }),
        }
    }
}

macro_rules! impl_into_value {
    ($ty:ty, $variant:ident) => {
        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

impl_into_value!(bool, Bool);
impl_into_value!(u32, U32);
impl_into_value!(u64, U64);
impl_into_value!(i32, I32);
impl_into_value!(i64, I64);
impl_into_value!(f32, F32);
impl_into_value!(f64, F64);
impl_into_value!(String, String);

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}
