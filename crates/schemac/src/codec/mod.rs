// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec semantics: the encode/decode contract for bound types.
//!
//! Two faces of the same contract:
//!
//! - **Contract**: a serializable, language-agnostic description
//!   ([`ModuleContract`]) external emitters realize in their target language.
//! - **Engine**: a reference implementation ([`CodecEngine`]) that executes
//!   the contract against the key→value interchange mapping, so the
//!   round-trip laws hold by construction and embedders can work with
//!   dynamic instances directly.
//!
//! # Example
//!
//! ```rust
//! use schemac::bind::ReferenceBinder;
//! use schemac::codec::{CodecEngine, InstanceData, TypeKey};
//! use schemac::registry::ModuleRegistry;
//! use schemac::schema::{ModuleBuilder, StructBuilder, Version};
//!
//! let mut registry = ModuleRegistry::new();
//! registry
//!     .register(
//!         ModuleBuilder::new("demo", Version::new(1, 0, 0))
//!             .type_def(StructBuilder::new("Greeting").string_field("text").build())
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let bound = ReferenceBinder::new(&registry).bind_all().unwrap();
//! let engine = CodecEngine::new(&bound);
//!
//! let key = TypeKey::new("demo", Version::new(1, 0, 0), "Greeting");
//! let mut greeting = InstanceData::new_struct(key.clone());
//! greeting.set("text", "hello").unwrap();
//!
//! let encoded = engine.encode(&greeting).unwrap();
//! let decoded = engine.decode(&key, &encoded).unwrap();
//! assert_eq!(decoded, greeting);
//! ```

mod contract;
mod engine;
mod instance;
mod value;

pub use contract::{
    module_contract, EnumContract, FieldContract, ImportContract, ModuleContract, StructContract,
    TypeContract, ValuePlan,
};
pub use engine::{CodecEngine, CodecError};
pub use instance::{FromValue, InstanceData, InstanceError, IntoValue, TypeKey};
pub use value::Value;
