// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # schemac - version-aware schema compiler core
//!
//! The resolution and codec core of a schema-driven code generator: it takes
//! parsed type definitions (structs and enums) organized into independently
//! versioned modules and produces, for external emitters, a fully-bound IR
//! plus the exact encode/decode contract generated code must uphold.
//!
//! The hard problem is not template emission but **version-aware type
//! resolution**: deciding, for every cross-module field reference, which
//! concrete published version of the referenced type a struct binds to, and
//! letting multiple versions of the same logical module coexist in one
//! output unit without symbol collision.
//!
//! ## Quick Start
//!
//! ```rust
//! use schemac::bind::ReferenceBinder;
//! use schemac::codec::module_contract;
//! use schemac::registry::ModuleRegistry;
//! use schemac::schema::{ModuleBuilder, StructBuilder, TypeRef, Version};
//!
//! let mut registry = ModuleRegistry::new();
//! for minor in [Version::new(1, 0, 0), Version::new(2, 0, 0)] {
//!     registry
//!         .register(
//!             ModuleBuilder::new("bar", minor)
//!                 .type_def(StructBuilder::new("Other").string_field("name").build())
//!                 .build(),
//!         )
//!         .unwrap();
//! }
//! registry
//!     .register(
//!         ModuleBuilder::new("foo", Version::new(4, 0, 0))
//!             .type_def(
//!                 StructBuilder::new("Thing")
//!                     .optional_field(
//!                         "other",
//!                         TypeRef::import("bar", "^1.0".parse().unwrap(), "Other"),
//!                     )
//!                     .optional_field(
//!                         "other2",
//!                         TypeRef::import("bar", "^2.0".parse().unwrap(), "Other"),
//!                     )
//!                     .build(),
//!             )
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let bound = ReferenceBinder::new(&registry).bind_all().unwrap();
//! let foo = bound.get("foo", &Version::new(4, 0, 0)).unwrap();
//!
//! // Both versions of "bar" stay independently addressable.
//! let aliases: Vec<&str> = foo.imports.iter().map(|b| b.alias.as_str()).collect();
//! assert_eq!(aliases, vec!["bar", "bar2"]);
//!
//! // Emitters consume the bound IR as a language-agnostic contract.
//! let contract = module_contract(foo);
//! assert_eq!(contract.imports.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! raw schema text
//!       |
//!       v  (external parser)
//!  unbound IR (schema)
//!       |
//!       v
//!  ModuleRegistry ---- all versions of all modules, frozen per run
//!       |
//!       v
//!  ReferenceBinder -- VersionResolver (memoized, parallel workers)
//!       |
//!       v
//!  BoundSet + alias tables
//!       |
//!       v
//!  ModuleContract / CodecEngine
//!       |
//!       v  (external emitter)
//!  target-language source files
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`registry::ModuleRegistry`] | Every published version of every module |
//! | [`resolve::VersionResolver`] | Constraint → highest compatible version |
//! | [`bind::ReferenceBinder`] | Unbound IR → bound modules + alias tables |
//! | [`codec::ModuleContract`] | Emitter-facing codec description |
//! | [`codec::CodecEngine`] | Reference encode/decode over the mapping |

/// Reference binding and import alias tables.
pub mod bind;
/// Codec contract and reference encode/decode.
pub mod codec;
/// Module registry for one compilation run.
pub mod registry;
/// Version constraint resolution.
pub mod resolve;
/// Schema intermediate representation.
pub mod schema;

pub use bind::{BindError, BoundModule, BoundRef, BoundSet, ImportBinding, ReferenceBinder};
pub use codec::{CodecEngine, CodecError, InstanceData, ModuleContract, TypeKey, Value};
pub use registry::{ModuleRegistry, RegistryError};
pub use resolve::{ResolveError, VersionResolver};
pub use schema::{SchemaModule, TypeDef, TypeRef, Version, VersionReq};
