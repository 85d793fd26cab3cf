// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Semantic versions and the constraints that pin them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// VersionParseError
// ---------------------------------------------------------------------------

/// Error returned when parsing a version or constraint from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParseError {
    input: String,
    reason: &'static str,
}

impl VersionParseError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version {:?}: {}", self.input, self.reason)
    }
}

impl std::error::Error for VersionParseError {}

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// A published semantic version of a schema module.
///
/// Ordering is numeric on major/minor/patch ("2.10.0" > "2.9.0"); a
/// pre-release sorts before the plain release of the same triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Pre-release tag, e.g. the "alpha1" in "1.2.3-alpha1".
    pub pre: Option<String>,
}

impl Version {
    /// Create a release version.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: None,
        }
    }

    /// Attach a pre-release tag.
    #[must_use]
    pub fn with_pre(mut self, tag: impl Into<String>) -> Self {
        self.pre = Some(tag.into());
        self
    }

    /// Check whether this version carries a pre-release tag.
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                // A pre-release precedes its release.
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (triple, pre) = match s.split_once('-') {
            Some((t, p)) if !p.is_empty() => (t, Some(p.to_string())),
            Some(_) => return Err(VersionParseError::new(s, "empty pre-release tag")),
            None => (s, None),
        };

        let mut parts = triple.split('.');
        let major = parse_component(s, parts.next())?;
        let minor = parse_component(s, parts.next())?;
        let patch = parse_component(s, parts.next())?;
        if parts.next().is_some() {
            return Err(VersionParseError::new(s, "more than three components"));
        }

        Ok(Version {
            major,
            minor,
            patch,
            pre,
        })
    }
}

fn parse_component(input: &str, part: Option<&str>) -> Result<u64, VersionParseError> {
    let part = part.ok_or_else(|| VersionParseError::new(input, "expected major.minor.patch"))?;
    part.parse()
        .map_err(|_| VersionParseError::new(input, "non-numeric component"))
}

// ---------------------------------------------------------------------------
// VersionReq
// ---------------------------------------------------------------------------

/// A version constraint: "compatible with" under semantic versioning.
///
/// A candidate `V` satisfies the constraint iff `V.major` equals the pinned
/// major, `(V.minor, V.patch)` is at or above the written minimum, and `V`
/// carries no pre-release tag unless the constraint's minimum itself was
/// written with one (`^1.2.0-alpha`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionReq {
    pub major: u64,
    pub min_minor: u64,
    pub min_patch: u64,
    /// Pre-release tag of the written minimum; its presence opts the
    /// constraint into pre-release candidates.
    pub pre: Option<String>,
}

impl VersionReq {
    /// Constraint pinning `major` with the given minimum minor/patch.
    pub fn compatible(major: u64, min_minor: u64, min_patch: u64) -> Self {
        Self {
            major,
            min_minor,
            min_patch,
            pre: None,
        }
    }

    /// Opt into pre-release candidates.
    #[must_use]
    pub fn with_pre(mut self, tag: impl Into<String>) -> Self {
        self.pre = Some(tag.into());
        self
    }

    /// Check whether pre-release candidates are eligible.
    pub fn allows_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    /// Check whether `version` satisfies this constraint.
    pub fn matches(&self, version: &Version) -> bool {
        if version.major != self.major {
            return false;
        }
        if version.is_prerelease() && !self.allows_prerelease() {
            return false;
        }
        (version.minor, version.patch) >= (self.min_minor, self.min_patch)
    }
}

impl fmt::Display for VersionReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "^{}.{}.{}", self.major, self.min_minor, self.min_patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

impl FromStr for VersionReq {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix('^').unwrap_or(s);
        let (triple, pre) = match body.split_once('-') {
            Some((t, p)) if !p.is_empty() => (t, Some(p.to_string())),
            Some(_) => return Err(VersionParseError::new(s, "empty pre-release tag")),
            None => (body, None),
        };

        let mut parts = triple.split('.');
        let major = parse_component(s, parts.next())?;
        let min_minor = match parts.next() {
            Some(p) => p
                .parse()
                .map_err(|_| VersionParseError::new(s, "non-numeric component"))?,
            None => 0,
        };
        let min_patch = match parts.next() {
            Some(p) => p
                .parse()
                .map_err(|_| VersionParseError::new(s, "non-numeric component"))?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(VersionParseError::new(s, "more than three components"));
        }

        Ok(VersionReq {
            major,
            min_minor,
            min_patch,
            pre,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
