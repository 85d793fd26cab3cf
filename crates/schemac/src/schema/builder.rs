// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builders for schema modules and type definitions.
//!
//! Convenience layer for embedders and tests; parsers typically construct
//! the IR types directly.

use crate::schema::{
    EnumDef, EnumMember, Field, PrimitiveKind, RawValue, SchemaModule, StructDef, TypeDef, TypeRef,
    Version,
};

/// Builder for a [`SchemaModule`].
#[derive(Debug)]
pub struct ModuleBuilder {
    name: String,
    version: Version,
    types: Vec<TypeDef<TypeRef>>,
}

impl ModuleBuilder {
    /// Start a module with the given identity.
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            types: Vec::new(),
        }
    }

    /// Add a finished type definition.
    pub fn type_def(mut self, def: TypeDef<TypeRef>) -> Self {
        self.types.push(def);
        self
    }

    /// Build the module.
    pub fn build(self) -> SchemaModule {
        SchemaModule::with_types(self.name, self.version, self.types)
    }
}

/// Builder for a struct type definition.
#[derive(Debug)]
pub struct StructBuilder {
    name: String,
    fields: Vec<Field<TypeRef>>,
}

impl StructBuilder {
    /// Start a struct with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a required field.
    pub fn field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(Field::new(name, ty));
        self
    }

    /// Add an optional field.
    pub fn optional_field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(Field::new(name, ty).optional());
        self
    }

    /// Add a required primitive field.
    pub fn primitive_field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field(name, TypeRef::Primitive(kind))
    }

    /// Add a required string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.primitive_field(name, PrimitiveKind::String)
    }

    /// Build the struct definition.
    pub fn build(self) -> TypeDef<TypeRef> {
        TypeDef::Struct(StructDef::new(self.name, self.fields))
    }
}

/// Builder for an enum type definition.
#[derive(Debug)]
pub struct EnumBuilder {
    name: String,
    members: Vec<EnumMember>,
    payload: Option<String>,
}

impl EnumBuilder {
    /// Start an enum with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            payload: None,
        }
    }

    /// Add a member with its raw value.
    pub fn member(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.members.push(EnumMember::new(name, value));
        self
    }

    /// Declare the payload carrier slot.
    pub fn payload(mut self, slot: impl Into<String>) -> Self {
        self.payload = Some(slot.into());
        self
    }

    /// Build the enum definition.
    ///
    /// Well-formedness (at least one member, unique raw values) is the
    /// schema author's contract; it is only asserted in debug builds.
    pub fn build(self) -> TypeDef<TypeRef> {
        debug_assert!(!self.members.is_empty(), "enum without members");
        debug_assert!(
            self.members
                .iter()
                .enumerate()
                .all(|(i, m)| !self.members[..i].iter().any(|p| p.value == m.value)),
            "duplicate raw value in enum"
        );

        let mut def = EnumDef::new(self.name, self.members);
        if let Some(slot) = self.payload {
            def = def.with_payload(slot);
        }
        TypeDef::Enum(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_module_with_struct_and_enum() {
        let module = ModuleBuilder::new("test", Version::new(1, 0, 0))
            .type_def(
                StructBuilder::new("Thing")
                    .string_field("name")
                    .optional_field("entry", TypeRef::local("Entry"))
                    .build(),
            )
            .type_def(
                EnumBuilder::new("Entry")
                    .member("A", "foo")
                    .member("B", "bar")
                    .payload("field")
                    .build(),
            )
            .build();

        assert_eq!(module.types.len(), 2);
        let entry = module.type_def("Entry").and_then(|t| t.as_enum()).unwrap();
        assert_eq!(entry.members.len(), 2);
        assert_eq!(entry.payload.as_deref(), Some("field"));

        let thing = module.type_def("Thing").and_then(|t| t.as_struct()).unwrap();
        assert!(thing.field("entry").map(|f| f.optional).unwrap_or(false));
    }
}
