// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Language-agnostic codec contract handed to emitters.
//!
//! Every emitter realizes the same behavior from this description: encode
//! emits an entry per *present* field only (absent fields are omitted, never
//! written as null); decode takes declared keys when present, leaves missing
//! keys absent, and silently ignores unknown keys; enum decode is a linear
//! scan over members in declaration order comparing raw values for equality,
//! and a miss is fatal.

use crate::bind::{BoundModule, BoundRef};
use crate::schema::{PrimitiveKind, RawValue, TypeDef, Version};
use serde::{Deserialize, Serialize};

/// How a single field value is encoded/decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValuePlan {
    /// Checked copy as the primitive kind.
    Primitive(PrimitiveKind),
    /// Delegate to the referenced type's own encode/decode.
    /// `alias = None` means a sibling type in the same output unit.
    Delegate {
        alias: Option<String>,
        name: String,
    },
}

/// Contract for one struct field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldContract {
    /// Key in the encoded mapping.
    pub key: String,
    /// Whether the emitted container gives the field a nullable shape.
    pub optional: bool,
    pub plan: ValuePlan,
}

/// Contract for a struct type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructContract {
    pub name: String,
    pub fields: Vec<FieldContract>,
}

/// Contract for an enum type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumContract {
    pub name: String,
    /// (member name, raw value) in declaration order; decode scans this
    /// table linearly.
    pub members: Vec<(String, RawValue)>,
    /// Payload carrier slot the generated variants attach their raw value
    /// to, if the schema declared one.
    pub payload: Option<String>,
}

/// Contract for one type in an output unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeContract {
    Struct(StructContract),
    Enum(EnumContract),
}

/// One imported output unit and the alias addressing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportContract {
    pub alias: String,
    pub module: String,
    pub version: Version,
}

/// The full codec contract for one bound module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleContract {
    pub module: String,
    pub version: Version,
    pub imports: Vec<ImportContract>,
    pub types: Vec<TypeContract>,
}

/// Derive the codec contract for a bound module.
pub fn module_contract(module: &BoundModule) -> ModuleContract {
    let imports = module
        .imports
        .iter()
        .map(|b| ImportContract {
            alias: b.alias.clone(),
            module: b.module.clone(),
            version: b.version.clone(),
        })
        .collect();

    let types = module
        .types
        .iter()
        .map(|ty| match ty {
            TypeDef::Struct(s) => TypeContract::Struct(StructContract {
                name: s.name.clone(),
                fields: s
                    .fields
                    .iter()
                    .map(|f| FieldContract {
                        key: f.name.clone(),
                        optional: f.optional,
                        plan: match &f.ty {
                            BoundRef::Primitive(kind) => ValuePlan::Primitive(*kind),
                            BoundRef::Local(name) => ValuePlan::Delegate {
                                alias: None,
                                name: name.clone(),
                            },
                            BoundRef::Imported { binding, name } => ValuePlan::Delegate {
                                alias: Some(binding.alias.clone()),
                                name: name.clone(),
                            },
                        },
                    })
                    .collect(),
            }),
            TypeDef::Enum(e) => TypeContract::Enum(EnumContract {
                name: e.name.clone(),
                members: e
                    .members
                    .iter()
                    .map(|m| (m.name.clone(), m.value.clone()))
                    .collect(),
                payload: e.payload.clone(),
            }),
        })
        .collect();

    ModuleContract {
        module: module.name.clone(),
        version: module.version.clone(),
        imports,
        types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::ReferenceBinder;
    use crate::registry::ModuleRegistry;
    use crate::schema::{EnumBuilder, ModuleBuilder, StructBuilder, TypeRef, Version};

    #[test]
    fn contract_mirrors_bound_module() {
        let mut reg = ModuleRegistry::new();
        reg.register(
            ModuleBuilder::new("bar", Version::new(2, 0, 0))
                .type_def(StructBuilder::new("Other").string_field("name").build())
                .build(),
        )
        .unwrap();
        reg.register(
            ModuleBuilder::new("test", Version::new(1, 0, 0))
                .type_def(
                    StructBuilder::new("Thing")
                        .string_field("name")
                        .optional_field("entry", TypeRef::local("Entry"))
                        .optional_field(
                            "other",
                            TypeRef::import("bar", "^2.0".parse().unwrap(), "Other"),
                        )
                        .build(),
                )
                .type_def(
                    EnumBuilder::new("Entry")
                        .member("A", "foo")
                        .member("B", "bar")
                        .payload("field")
                        .build(),
                )
                .build(),
        )
        .unwrap();

        let binder = ReferenceBinder::new(&reg);
        let set = binder.bind_all().unwrap();
        let bound = set.get("test", &Version::new(1, 0, 0)).unwrap();
        let contract = module_contract(bound);

        assert_eq!(contract.imports.len(), 1);
        assert_eq!(contract.imports[0].alias, "bar2");

        let thing = match &contract.types[0] {
            TypeContract::Struct(s) => s,
            other => panic!("expected struct contract, got {:?}", other),
        };
        assert_eq!(thing.fields[1].plan, ValuePlan::Delegate {
            alias: None,
            name: "Entry".to_string(),
        });
        assert_eq!(thing.fields[2].plan, ValuePlan::Delegate {
            alias: Some("bar2".to_string()),
            name: "Other".to_string(),
        });

        let entry = match &contract.types[1] {
            TypeContract::Enum(e) => e,
            other => panic!("expected enum contract, got {:?}", other),
        };
        assert_eq!(entry.members.len(), 2);
        assert_eq!(entry.payload.as_deref(), Some("field"));
    }

    #[test]
    fn contract_serializes_to_json() {
        let contract = ModuleContract {
            module: "test".to_string(),
            version: Version::new(1, 0, 0),
            imports: Vec::new(),
            types: vec![TypeContract::Enum(EnumContract {
                name: "Entry".to_string(),
                members: vec![("A".to_string(), RawValue::from("foo"))],
                payload: None,
            })],
        };

        let json = serde_json::to_string(&contract).unwrap();
        let back: ModuleContract = serde_json::from_str(&json).unwrap();
        assert_eq!(back, contract);
    }
}
