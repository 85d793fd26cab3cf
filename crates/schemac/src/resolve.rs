// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Version resolution: constraint → concrete published version.
//!
//! Resolution is a pure function of the frozen registry snapshot and the
//! reference, so results are memoized per (module name, constraint) pair and
//! shared across binder workers.

use crate::registry::ModuleRegistry;
use crate::schema::{Version, VersionReq};
use dashmap::DashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// ResolveError
// ---------------------------------------------------------------------------

/// Errors produced by version resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The module name was never registered.
    UnknownModule { name: String },
    /// Versions of the module exist, but none satisfies the constraint.
    NoCompatibleVersion { name: String, req: VersionReq },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownModule { name } => write!(f, "unknown module: {}", name),
            Self::NoCompatibleVersion { name, req } => {
                write!(f, "no version of {} satisfies {}", name, req)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

// ---------------------------------------------------------------------------
// VersionResolver
// ---------------------------------------------------------------------------

/// Selects, for a (module name, constraint) reference, the concrete
/// published version to bind to.
///
/// Among satisfying candidates the *highest* version wins (numeric semver
/// order), so callers pick up compatible fixes without editing constraints.
/// The pinned major guarantees a breaking change is never crossed silently.
pub struct VersionResolver<'a> {
    registry: &'a ModuleRegistry,
    memo: DashMap<(String, VersionReq), Version>,
}

impl<'a> VersionResolver<'a> {
    /// Create a resolver over a frozen registry snapshot.
    pub fn new(registry: &'a ModuleRegistry) -> Self {
        Self {
            registry,
            memo: DashMap::new(),
        }
    }

    /// Resolve a constraint to the highest satisfying registered version.
    pub fn resolve(&self, name: &str, req: &VersionReq) -> Result<Version, ResolveError> {
        let key = (name.to_string(), req.clone());
        if let Some(hit) = self.memo.get(&key) {
            return Ok(hit.value().clone());
        }

        if !self.registry.contains(name) {
            return Err(ResolveError::UnknownModule {
                name: name.to_string(),
            });
        }

        // versions_of is ascending, so the last match is the highest.
        let picked = self
            .registry
            .versions_of(name)
            .into_iter()
            .rev()
            .find(|v| req.matches(v));

        match picked {
            Some(version) => {
                log::debug!("[Resolver] {} {} -> {}", name, req, version);
                self.memo.insert(key, version.clone());
                Ok(version)
            }
            None => Err(ResolveError::NoCompatibleVersion {
                name: name.to_string(),
                req: req.clone(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
