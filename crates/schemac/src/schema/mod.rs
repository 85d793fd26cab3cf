// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema intermediate representation.
//!
//! The unbound IR as handed over by an external parser: versioned modules
//! owning ordered struct/enum definitions whose fields reference other types
//! locally or across modules under a version constraint.
//!
//! # Example
//!
//! ```rust
//! use schemac::schema::{ModuleBuilder, PrimitiveKind, StructBuilder, TypeRef, Version};
//!
//! let module = ModuleBuilder::new("foo", Version::new(4, 0, 0))
//!     .type_def(
//!         StructBuilder::new("Thing")
//!             .string_field("name")
//!             .optional_field(
//!                 "other",
//!                 TypeRef::import("bar", "^1.0".parse().unwrap(), "Other"),
//!             )
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(module.to_string(), "foo 4.0.0");
//! # let _ = PrimitiveKind::Bool;
//! ```

mod builder;
mod module;
mod types;
mod version;

pub use builder::{EnumBuilder, ModuleBuilder, StructBuilder};
pub use module::SchemaModule;
pub use types::{
    EnumDef, EnumMember, Field, PrimitiveKind, RawValue, StructDef, TypeDef, TypeRef,
};
pub use version::{Version, VersionParseError, VersionReq};
