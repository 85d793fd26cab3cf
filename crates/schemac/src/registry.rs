// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Module registry: every published version of every schema module.
//!
//! Pure lookup structure for one compilation run. All registration happens
//! before resolution starts; afterwards the registry is only read, which is
//! safe from parallel binder workers.

use crate::schema::{SchemaModule, Version};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// Errors produced by the module registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The (name, version) pair was already registered in this run.
    DuplicateVersion { name: String, version: Version },
    /// No module matched the requested name (and version, for lookups).
    UnknownModule {
        name: String,
        version: Option<Version>,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateVersion { name, version } => {
                write!(f, "duplicate module version: {} {}", name, version)
            }
            Self::UnknownModule {
                name,
                version: Some(version),
            } => write!(f, "unknown module: {} {}", name, version),
            Self::UnknownModule {
                name,
                version: None,
            } => write!(f, "unknown module: {}", name),
        }
    }
}

impl std::error::Error for RegistryError {}

// ---------------------------------------------------------------------------
// ModuleRegistry
// ---------------------------------------------------------------------------

/// In-memory store of schema modules keyed by (name, version).
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    /// Modules in registration order; drives deterministic iteration.
    modules: Vec<SchemaModule>,
    /// Name → indices into `modules`, kept sorted ascending by version.
    by_name: HashMap<String, Vec<usize>>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema module.
    ///
    /// Fails with `DuplicateVersion` if the same (name, version) was already
    /// registered in this run.
    pub fn register(&mut self, module: SchemaModule) -> Result<(), RegistryError> {
        let indices = self.by_name.entry(module.name.clone()).or_default();
        if indices
            .iter()
            .any(|&i| self.modules[i].version == module.version)
        {
            return Err(RegistryError::DuplicateVersion {
                name: module.name.clone(),
                version: module.version.clone(),
            });
        }

        log::debug!(
            "[Registry] register {} ({} types)",
            module,
            module.types.len()
        );

        let idx = self.modules.len();
        let pos = indices
            .iter()
            .position(|&i| self.modules[i].version > module.version)
            .unwrap_or(indices.len());
        indices.insert(pos, idx);
        self.modules.push(module);
        Ok(())
    }

    /// All registered versions of a module name, ascending. Empty if the
    /// name was never registered.
    pub fn versions_of(&self, name: &str) -> Vec<Version> {
        match self.by_name.get(name) {
            Some(indices) => indices
                .iter()
                .map(|&i| self.modules[i].version.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether any version of `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Exact lookup of a registered module.
    pub fn lookup(&self, name: &str, version: &Version) -> Result<&SchemaModule, RegistryError> {
        self.by_name
            .get(name)
            .and_then(|indices| {
                indices
                    .iter()
                    .map(|&i| &self.modules[i])
                    .find(|m| &m.version == version)
            })
            .ok_or_else(|| RegistryError::UnknownModule {
                name: name.to_string(),
                version: Some(version.clone()),
            })
    }

    /// Iterate all registered modules in registration order.
    pub fn modules(&self) -> impl Iterator<Item = &SchemaModule> {
        self.modules.iter()
    }

    /// Number of registered (name, version) pairs.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
