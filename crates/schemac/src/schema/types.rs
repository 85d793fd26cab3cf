// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema IR: type definitions and the references between them.

use crate::schema::VersionReq;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive kinds available to schema fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Bool,
    U32,
    U64,
    I32,
    I64,
    F32,
    F64,
    String,
}

impl PrimitiveKind {
    /// Diagnostic name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
        }
    }
}

/// Raw value attached to an enum member.
///
/// Decode matching compares raw values by exact equality, never identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawValue {
    Str(String),
    Int(i64),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{:?}", s),
            Self::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

/// Reference to a field's type as written in the schema source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    /// Sibling type in the same module.
    Local(String),
    /// Type in another module, pinned by a version constraint.
    Import {
        module: String,
        req: VersionReq,
        name: String,
    },
}

impl TypeRef {
    /// Reference a sibling type.
    pub fn local(name: impl Into<String>) -> Self {
        Self::Local(name.into())
    }

    /// Reference a type in another module under a constraint.
    pub fn import(module: impl Into<String>, req: VersionReq, name: impl Into<String>) -> Self {
        Self::Import {
            module: module.into(),
            req,
            name: name.into(),
        }
    }
}

/// A struct field, generic over the reference representation.
///
/// Binding rewrites `Field<TypeRef>` into `Field<BoundRef>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field<R> {
    pub name: String,
    pub ty: R,
    /// Optional fields may be absent; emitters give them a nullable shape.
    pub optional: bool,
}

impl<R> Field<R> {
    /// Create a required field.
    pub fn new(name: impl Into<String>, ty: R) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    /// Mark as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Struct body: an ordered field sequence. May be empty.
///
/// Field order drives deterministic emission; decode correctness does not
/// depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef<R> {
    pub name: String,
    pub fields: Vec<Field<R>>,
}

impl<R> StructDef<R> {
    pub fn new(name: impl Into<String>, fields: Vec<Field<R>>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&Field<R>> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// An enum member and its raw value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: RawValue,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Enum body: an ordered member sequence, never empty for well-formed input.
///
/// Raw values are unique within the enum (parser contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub members: Vec<EnumMember>,
    /// Name of the payload carrier slot generated variants attach their raw
    /// value to. Carries no decode semantics; matching stays value-based.
    pub payload: Option<String>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>, members: Vec<EnumMember>) -> Self {
        Self {
            name: name.into(),
            members,
            payload: None,
        }
    }

    /// Attach a payload carrier slot.
    #[must_use]
    pub fn with_payload(mut self, slot: impl Into<String>) -> Self {
        self.payload = Some(slot.into());
        self
    }

    /// Get a member by name.
    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// First member whose raw value compares equal, in declaration order.
    pub fn member_by_value(&self, value: &RawValue) -> Option<&EnumMember> {
        self.members.iter().find(|m| &m.value == value)
    }
}

/// A type definition in a module, generic over the reference representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDef<R> {
    Struct(StructDef<R>),
    Enum(EnumDef),
}

impl<R> TypeDef<R> {
    /// Name of the defined type.
    pub fn name(&self) -> &str {
        match self {
            Self::Struct(s) => &s.name,
            Self::Enum(e) => &e.name,
        }
    }

    /// Get the struct body, if this is a struct.
    pub fn as_struct(&self) -> Option<&StructDef<R>> {
        match self {
            Self::Struct(s) => Some(s),
            Self::Enum(_) => None,
        }
    }

    /// Get the enum body, if this is an enum.
    pub fn as_enum(&self) -> Option<&EnumDef> {
        match self {
            Self::Struct(_) => None,
            Self::Enum(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_member_lookup_is_declaration_ordered() {
        let def = EnumDef::new(
            "Entry",
            vec![EnumMember::new("A", "foo"), EnumMember::new("B", "bar")],
        );

        assert_eq!(
            def.member_by_value(&RawValue::from("bar")).map(|m| &*m.name),
            Some("B")
        );
        assert!(def.member_by_value(&RawValue::from("baz")).is_none());
    }

    #[test]
    fn raw_value_equality_not_identity() {
        assert_eq!(RawValue::from("foo"), RawValue::Str("foo".to_string()));
        assert_ne!(RawValue::from("foo"), RawValue::from(0i64));
    }

    #[test]
    fn struct_field_lookup() {
        let def = StructDef::new(
            "Thing",
            vec![
                Field::new("name", TypeRef::Primitive(PrimitiveKind::String)),
                Field::new("other", TypeRef::local("Other")).optional(),
            ],
        );

        assert!(def.field("name").is_some());
        assert!(def.field("other").map(|f| f.optional).unwrap_or(false));
        assert!(def.field("missing").is_none());
    }
}
