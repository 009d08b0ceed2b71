//! In-memory advisory index (C3) and the vulnerability predicate (§4.3).
//!
//! Ground truth: `models/packages/package.py`'s `PackageAdvisory` /
//! `PackageAdvisories` dataclasses and `comparison_map`. The Python source
//! attaches `is_vulnerable` as a closure captured per advisory; here it is
//! a pure function of `{symbol, fixed, installed}` so `PackageAdvisory`'s
//! `Eq`/`Hash` can stay plain derives over `{package, oid, symbol}`.

use std::collections::{HashMap, HashSet};
use std::fmt;

use notus_core::PackageComparison;
use notus_packages::Package;

/// Comparison operator attached to a fixed-package constraint (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Gt,
    Ge,
    Eq,
    Lt,
    Le,
}

impl Symbol {
    /// Parse a specifier string. Unknown or empty specifiers default to
    /// `>=`, matching `PackageAdvisories.add_advisory_for_package`'s
    /// `if verifier not in self.comparison_map: verifier = ">="` guard.
    #[must_use]
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some(">") => Self::Gt,
            Some(">=") => Self::Ge,
            Some("=") => Self::Eq,
            Some("<") => Self::Lt,
            Some("<=") => Self::Le,
            _ => Self::Ge,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Le => "<=",
        };
        f.write_str(s)
    }
}

/// A single fixed-package constraint for an advisory (spec §3).
///
/// Equality and hashing are over `{package, oid, symbol}` only -- the
/// vulnerability predicate is a pure function of those fields plus the
/// installed package, so it carries no identity of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageAdvisory {
    pub package: Package,
    pub oid: String,
    pub symbol: Symbol,
}

impl PackageAdvisory {
    /// Decide whether `installed` is vulnerable under this constraint.
    /// `None` means the fixed package and `installed` are not comparable
    /// (different ecosystem variant already ruled out by construction;
    /// this is the same-variant `NOT_COMPARABLE` outcome of §4.3 step 1).
    #[must_use]
    pub fn is_vulnerable(&self, installed: &Package) -> Option<bool> {
        let comparison = self.package.compare(installed).ok()?;
        if comparison == PackageComparison::NotComparable {
            return None;
        }
        let fixed_gt = comparison == PackageComparison::ANewer;
        let fixed_eq = comparison == PackageComparison::Equal;
        let fixed_lt = comparison == PackageComparison::BNewer;
        Some(match self.symbol {
            Symbol::Ge => fixed_gt,
            Symbol::Gt => fixed_gt || fixed_eq,
            Symbol::Eq => !fixed_eq,
            Symbol::Le => fixed_lt,
            Symbol::Lt => fixed_lt || fixed_eq,
        })
    }
}

/// Per-OS, per-package-type advisory index: `name -> oid -> constraints`
/// (spec §3/§4.4). Built once by the loader, read-only thereafter.
#[derive(Debug, Clone)]
pub struct PackageAdvisories {
    package_type: notus_core::PackageType,
    advisories: HashMap<String, HashMap<String, HashSet<PackageAdvisory>>>,
}

impl PackageAdvisories {
    #[must_use]
    pub fn new(package_type: notus_core::PackageType) -> Self {
        Self {
            package_type,
            advisories: HashMap::new(),
        }
    }

    #[must_use]
    pub fn package_type(&self) -> notus_core::PackageType {
        self.package_type
    }

    /// Insert a fixed-package constraint under `package.name()` / `oid`.
    /// Idempotent: re-adding an identical `(package, oid, symbol)` is a
    /// no-op because the inner container is a set.
    pub fn add(&mut self, package: Package, oid: impl Into<String>, symbol: Symbol) {
        let name = package.name().to_string();
        let oid = oid.into();
        let by_oid = self.advisories.entry(name).or_default();
        let constraints = by_oid.entry(oid.clone()).or_default();
        constraints.insert(PackageAdvisory {
            package,
            oid,
            symbol,
        });
    }

    /// All OID-indexed constraint groups for `package`'s name. Empty map
    /// when the name is unknown. The returned map is a copy: callers
    /// cannot mutate the store through it (spec §4.4).
    #[must_use]
    pub fn get(&self, package: &Package) -> HashMap<String, HashSet<PackageAdvisory>> {
        self.advisories.get(package.name()).cloned().unwrap_or_default()
    }

    /// Number of distinct package names indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.advisories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.advisories.is_empty()
    }
}
