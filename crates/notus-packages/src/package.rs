//! Tagged-sum dispatch across the five package variants (spec §9 design
//! notes: a single enum rather than a subclass hierarchy, so a cross-variant
//! `compare` is a compile-time-reachable but always-rejected code path).

use std::hash::{Hash, Hasher};

use notus_core::{Error, PackageComparison, PackageType};

use crate::{DebPackage, EbuildPackage, RpmPackage, SlackPackage, WindowsPackage};

/// A parsed package, tagged by ecosystem.
#[derive(Debug, Clone, PartialEq)]
pub enum Package {
    Rpm(RpmPackage),
    Deb(DebPackage),
    Slack(SlackPackage),
    Ebuild(EbuildPackage),
    Windows(WindowsPackage),
}

impl Package {
    #[must_use]
    pub fn package_type(&self) -> PackageType {
        match self {
            Self::Rpm(_) => PackageType::Rpm,
            Self::Deb(_) => PackageType::Deb,
            Self::Slack(_) => PackageType::Slack,
            Self::Ebuild(_) => PackageType::Ebuild,
            Self::Windows(_) => PackageType::Msp,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Rpm(p) => &p.name,
            Self::Deb(p) => &p.name,
            Self::Slack(p) => &p.name,
            Self::Ebuild(p) => &p.name,
            Self::Windows(p) => &p.name,
        }
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        match self {
            Self::Rpm(p) => &p.full_name,
            Self::Deb(p) => &p.full_name,
            Self::Slack(p) => &p.full_name,
            Self::Ebuild(p) => &p.full_name,
            Self::Windows(p) => &p.full_name,
        }
    }

    /// Parse a package string for the given ecosystem. Returns `None` when
    /// the string does not match that ecosystem's grammar.
    #[must_use]
    pub fn from_full_name(package_type: PackageType, s: &str) -> Option<Self> {
        match package_type {
            PackageType::Rpm => RpmPackage::from_full_name(s).map(Self::Rpm),
            PackageType::Deb => DebPackage::from_full_name(s).map(Self::Deb),
            PackageType::Slack => SlackPackage::from_full_name(s).map(Self::Slack),
            PackageType::Ebuild => EbuildPackage::from_full_name(s).map(Self::Ebuild),
            PackageType::Msp => WindowsPackage::from_full_name(s).map(Self::Windows),
        }
    }

    #[must_use]
    pub fn from_name_and_full_version(
        package_type: PackageType,
        name: &str,
        full_version: &str,
    ) -> Option<Self> {
        match package_type {
            PackageType::Rpm => {
                RpmPackage::from_name_and_full_version(name, full_version).map(Self::Rpm)
            }
            PackageType::Deb => {
                DebPackage::from_name_and_full_version(name, full_version).map(Self::Deb)
            }
            PackageType::Slack => {
                SlackPackage::from_name_and_full_version(name, full_version).map(Self::Slack)
            }
            PackageType::Ebuild => {
                EbuildPackage::from_name_and_full_version(name, full_version).map(Self::Ebuild)
            }
            PackageType::Msp => {
                WindowsPackage::from_name_and_full_version(name, full_version).map(Self::Windows)
            }
        }
    }

    /// Compare two packages. `Err(Error::Incomparable)` when the two
    /// packages belong to different ecosystems -- a programming error, not
    /// a runtime outcome (contrast with `PackageComparison::NotComparable`,
    /// which this returns for same-ecosystem mismatches like differing
    /// name or architecture).
    pub fn compare(&self, other: &Self) -> Result<PackageComparison, Error> {
        match (self, other) {
            (Self::Rpm(a), Self::Rpm(b)) => Ok(a.compare(b)),
            (Self::Deb(a), Self::Deb(b)) => Ok(a.compare(b)),
            (Self::Slack(a), Self::Slack(b)) => Ok(a.compare(b)),
            (Self::Ebuild(a), Self::Ebuild(b)) => Ok(a.compare(b)),
            (Self::Windows(a), Self::Windows(b)) => Ok(a.compare(b)),
            _ => Err(Error::Incomparable {
                a: self.full_name().to_string(),
                b: other.full_name().to_string(),
            }),
        }
    }
}

impl Eq for Package {}

impl Hash for Package {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_ecosystem_dispatches_to_variant_compare() {
        let a = Package::from_full_name(PackageType::Rpm, "foo-bar-1.2.3-4.x86_64").unwrap();
        let b = Package::from_full_name(PackageType::Rpm, "foo-bar-1.2.4-4.x86_64").unwrap();
        assert_eq!(b.compare(&a), Ok(PackageComparison::ANewer));
    }

    #[test]
    fn cross_ecosystem_comparison_is_a_programming_error() {
        let rpm = Package::from_full_name(PackageType::Rpm, "foo-bar-1.2.3-4.x86_64").unwrap();
        let deb = Package::from_full_name(PackageType::Deb, "foo-bar-1.2.3-4").unwrap();
        assert!(rpm.compare(&deb).is_err());
    }

    #[test]
    fn hash_is_stable_for_equal_full_names() {
        use std::collections::HashSet;
        let a = Package::from_full_name(PackageType::Rpm, "foo-bar-1.2.3-4.x86_64").unwrap();
        let b = Package::from_full_name(PackageType::Rpm, "foo-bar-1.2.3-4.x86_64").unwrap();
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }
}
