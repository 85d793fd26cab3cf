// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reference binding: unbound IR → bound modules with import alias tables.
//!
//! Binding replaces every cross-module reference with the concrete version
//! chosen by the resolver and assigns each distinct imported (module,
//! version) a unique alias, so two constraints on the same module name can
//! land on two independently addressable output units.

use crate::registry::ModuleRegistry;
use crate::resolve::{ResolveError, VersionResolver};
use crate::schema::{Field, PrimitiveKind, SchemaModule, StructDef, TypeDef, TypeRef, Version};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::thread;

// ---------------------------------------------------------------------------
// BindError
// ---------------------------------------------------------------------------

/// Why a reference could not be bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The version resolver failed for a cross-module reference.
    Resolve(ResolveError),
    /// A local reference names no sibling type.
    UnknownLocalType { name: String },
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve(e) => write!(f, "{}", e),
            Self::UnknownLocalType { name } => write!(f, "unknown local type: {}", name),
        }
    }
}

/// Errors produced by reference binding.
///
/// Carries the module under compilation and the `Type.field` path that
/// triggered the failure, so a schema author can fix the offending
/// reference without inspecting generated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    UnresolvedReference {
        module: String,
        version: Version,
        path: String,
        reason: UnresolvedReason,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedReference {
                module,
                version,
                path,
                reason,
            } => write!(
                f,
                "unresolved reference in {} {} at {}: {}",
                module, version, path, reason
            ),
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnresolvedReference {
                reason: UnresolvedReason::Resolve(e),
                ..
            } => Some(e),
            Self::UnresolvedReference { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Bound IR
// ---------------------------------------------------------------------------

/// Concrete module version an import constraint was bound to, plus the
/// alias under which the emitted code addresses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportBinding {
    pub alias: String,
    pub module: String,
    pub version: Version,
}

/// A field type reference after binding.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundRef {
    Primitive(PrimitiveKind),
    /// Sibling type in the same bound module.
    Local(String),
    /// Type in another module, pinned to a concrete version.
    Imported {
        binding: Arc<ImportBinding>,
        name: String,
    },
}

/// A module with every reference bound and its import alias table.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundModule {
    pub name: String,
    pub version: Version,
    pub types: Vec<TypeDef<BoundRef>>,
    /// One entry per distinct imported (module, version), in first-use order.
    pub imports: Vec<Arc<ImportBinding>>,
}

impl BoundModule {
    /// Get a bound type definition by name.
    pub fn type_def(&self, name: &str) -> Option<&TypeDef<BoundRef>> {
        self.types.iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for BoundModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// The run-level binding result: every bound module, addressable by
/// (name, version).
#[derive(Debug, Default)]
pub struct BoundSet {
    modules: Vec<BoundModule>,
    index: HashMap<(String, Version), usize>,
}

impl BoundSet {
    fn from_modules(modules: Vec<BoundModule>) -> Self {
        let index = modules
            .iter()
            .enumerate()
            .map(|(i, m)| ((m.name.clone(), m.version.clone()), i))
            .collect();
        Self { modules, index }
    }

    /// Get a bound module by identity.
    pub fn get(&self, name: &str, version: &Version) -> Option<&BoundModule> {
        self.index
            .get(&(name.to_string(), version.clone()))
            .map(|&i| &self.modules[i])
    }

    /// All bound modules, in registration order.
    pub fn modules(&self) -> &[BoundModule] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Alias derivation
// ---------------------------------------------------------------------------

/// Characters unsafe in an alias identifier.
fn alias_unsafe(c: char) -> bool {
    matches!(c, '.' | '-' | '~')
}

fn sanitize(part: &str) -> String {
    part.replace(alias_unsafe, "_")
}

/// Version suffix for an alias: components with trailing zeros stripped and
/// digits concatenated; a bare major 1 gets no suffix. "1.0.0" → "",
/// "2.0.0" → "2", "2.1.0" → "21".
fn alias_suffix(version: &Version) -> String {
    let mut parts = vec![version.major, version.minor, version.patch];
    while parts.len() > 1 && parts.last() == Some(&0) {
        parts.pop();
    }

    let mut out = String::new();
    if parts != [1] {
        for p in &parts {
            out.push_str(&p.to_string());
        }
    }
    if let Some(pre) = &version.pre {
        out.push('_');
        out.push_str(&sanitize(pre));
    }
    out
}

/// Unambiguous fallback used when short aliases collide.
fn alias_long(module: &str, version: &Version) -> String {
    let mut out = format!(
        "{}_{}_{}_{}",
        sanitize(module),
        version.major,
        version.minor,
        version.patch
    );
    if let Some(pre) = &version.pre {
        out.push('_');
        out.push_str(&sanitize(pre));
    }
    out
}

/// Assign aliases to the distinct concrete imports of one module.
fn assign_aliases(concrete: &[(String, Version)]) -> HashMap<(String, Version), String> {
    let mut aliases: HashMap<(String, Version), String> = concrete
        .iter()
        .map(|(name, version)| {
            let alias = format!("{}{}", sanitize(name), alias_suffix(version));
            ((name.clone(), version.clone()), alias)
        })
        .collect();

    // Digit concatenation can collide (2.1.0 vs 21.0.0, or across module
    // names); colliding entries fall back to the full underscore form.
    let mut seen: HashMap<String, usize> = HashMap::new();
    for alias in aliases.values() {
        *seen.entry(alias.clone()).or_insert(0) += 1;
    }
    for ((name, version), alias) in aliases.iter_mut() {
        if seen[alias.as_str()] > 1 {
            *alias = alias_long(name, version);
        }
    }
    aliases
}

// ---------------------------------------------------------------------------
// ReferenceBinder
// ---------------------------------------------------------------------------

/// Walks a module's type definitions and replaces every reference with a
/// resolved binding.
pub struct ReferenceBinder<'a> {
    registry: &'a ModuleRegistry,
    resolver: VersionResolver<'a>,
}

impl<'a> ReferenceBinder<'a> {
    /// Create a binder over a frozen registry snapshot.
    pub fn new(registry: &'a ModuleRegistry) -> Self {
        Self {
            registry,
            resolver: VersionResolver::new(registry),
        }
    }

    /// Bind a single module.
    pub fn bind(&self, module: &SchemaModule) -> Result<BoundModule, BindError> {
        let locals: HashSet<&str> = module.types.iter().map(|t| t.name()).collect();

        // First pass: resolve every distinct (module, constraint) pair and
        // collect the distinct concrete versions in first-use order.
        let mut resolved: HashMap<(String, crate::schema::VersionReq), Version> = HashMap::new();
        let mut concrete: Vec<(String, Version)> = Vec::new();

        for ty in &module.types {
            let body = match ty {
                TypeDef::Struct(s) => s,
                TypeDef::Enum(_) => continue,
            };
            for field in &body.fields {
                if let TypeRef::Import {
                    module: target,
                    req,
                    ..
                } = &field.ty
                {
                    let key = (target.clone(), req.clone());
                    if resolved.contains_key(&key) {
                        continue;
                    }
                    let version =
                        self.resolver
                            .resolve(target, req)
                            .map_err(|e| BindError::UnresolvedReference {
                                module: module.name.clone(),
                                version: module.version.clone(),
                                path: format!("{}.{}", ty.name(), field.name),
                                reason: UnresolvedReason::Resolve(e),
                            })?;
                    if !concrete
                        .iter()
                        .any(|(n, v)| n == target && v == &version)
                    {
                        concrete.push((target.clone(), version.clone()));
                    }
                    resolved.insert(key, version);
                }
            }
        }

        let aliases = assign_aliases(&concrete);
        let mut imports: Vec<Arc<ImportBinding>> = Vec::with_capacity(concrete.len());
        let mut binding_of: HashMap<(String, Version), Arc<ImportBinding>> = HashMap::new();
        for (name, version) in &concrete {
            let key = (name.clone(), version.clone());
            let binding = Arc::new(ImportBinding {
                alias: aliases[&key].clone(),
                module: name.clone(),
                version: version.clone(),
            });
            imports.push(binding.clone());
            binding_of.insert(key, binding);
        }

        // Second pass: rewrite every type definition against the bindings.
        let mut types = Vec::with_capacity(module.types.len());
        for ty in &module.types {
            match ty {
                TypeDef::Enum(e) => types.push(TypeDef::Enum(e.clone())),
                TypeDef::Struct(s) => {
                    let mut fields = Vec::with_capacity(s.fields.len());
                    for field in &s.fields {
                        let bound = match &field.ty {
                            TypeRef::Primitive(kind) => BoundRef::Primitive(*kind),
                            TypeRef::Local(name) => {
                                if !locals.contains(name.as_str()) {
                                    return Err(BindError::UnresolvedReference {
                                        module: module.name.clone(),
                                        version: module.version.clone(),
                                        path: format!("{}.{}", ty.name(), field.name),
                                        reason: UnresolvedReason::UnknownLocalType {
                                            name: name.clone(),
                                        },
                                    });
                                }
                                BoundRef::Local(name.clone())
                            }
                            TypeRef::Import {
                                module: target,
                                req,
                                name,
                            } => {
                                let version = resolved
                                    .get(&(target.clone(), req.clone()))
                                    .expect("constraint resolved in first pass");
                                let binding = binding_of
                                    .get(&(target.clone(), version.clone()))
                                    .expect("binding created for resolved version");
                                BoundRef::Imported {
                                    binding: binding.clone(),
                                    name: name.clone(),
                                }
                            }
                        };
                        fields.push(Field {
                            name: field.name.clone(),
                            ty: bound,
                            optional: field.optional,
                        });
                    }
                    types.push(TypeDef::Struct(StructDef::new(s.name.clone(), fields)));
                }
            }
        }

        log::debug!("[Binder] bound {} ({} imports)", module, imports.len());

        Ok(BoundModule {
            name: module.name.clone(),
            version: module.version.clone(),
            types,
            imports,
        })
    }

    /// Bind every registered module.
    ///
    /// Independent modules are bound on parallel workers over the frozen
    /// registry; each worker owns its output privately and results merge in
    /// registration order. The first error in that order aborts the run.
    pub fn bind_all(&self) -> Result<BoundSet, BindError> {
        let modules: Vec<&SchemaModule> = self.registry.modules().collect();
        if modules.is_empty() {
            return Ok(BoundSet::default());
        }

        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(modules.len());

        let mut slots: Vec<Option<Result<BoundModule, BindError>>> = Vec::new();
        slots.resize_with(modules.len(), || None);

        if workers <= 1 {
            for (idx, module) in modules.iter().enumerate() {
                slots[idx] = Some(self.bind(module));
            }
        } else {
            let module_slice = &modules;
            thread::scope(|scope| {
                let handles: Vec<_> = (0..workers)
                    .map(|w| {
                        scope.spawn(move || {
                            let mut out = Vec::new();
                            let mut idx = w;
                            while idx < module_slice.len() {
                                out.push((idx, self.bind(module_slice[idx])));
                                idx += workers;
                            }
                            out
                        })
                    })
                    .collect();
                for handle in handles {
                    for (idx, result) in handle.join().expect("binder worker panicked") {
                        slots[idx] = Some(result);
                    }
                }
            });
        }

        let mut bound = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot.expect("every module bound exactly once") {
                Ok(module) => bound.push(module),
                Err(e) => return Err(e),
            }
        }

        log::debug!("[Binder] bound {} modules", bound.len());
        Ok(BoundSet::from_modules(bound))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
