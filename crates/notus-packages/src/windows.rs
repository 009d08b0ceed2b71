//! Windows package variant: the labeled dialect `"<Display Name>;<PREFIX>.<BUILD>"`.
//!
//! The older, unlabeled `PREFIX.BUILD` dialect is not accepted: the
//! scanner's source history carries both, and the labeled form was the
//! later, stricter one. Per the redesign notes, implementers should
//! reject the older dialect rather than guess at its boundaries.

use notus_core::{version_compare, PackageComparison};

/// A parsed Windows update reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowsPackage {
    pub name: String,
    pub full_version: String,
    pub full_name: String,
    pub prefix: String,
    pub build: String,
}

fn split_prefix_and_build(full_version: &str) -> Option<(&str, &str)> {
    full_version.rsplit_once('.')
}

impl WindowsPackage {
    #[must_use]
    pub fn from_full_name(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let (name, full_version) = trimmed.split_once(';')?;
        if name.is_empty() || full_version.is_empty() {
            return None;
        }
        let (prefix, build) = split_prefix_and_build(full_version)?;

        Some(Self {
            name: name.to_string(),
            full_version: full_version.to_string(),
            full_name: trimmed.to_string(),
            prefix: prefix.to_string(),
            build: build.to_string(),
        })
    }

    #[must_use]
    pub fn from_name_and_full_version(name: &str, full_version: &str) -> Option<Self> {
        if name.is_empty() || full_version.is_empty() {
            return None;
        }
        let full_name = format!("{name};{full_version}");
        Self::from_full_name(&full_name)
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> PackageComparison {
        if self.name != other.name {
            return PackageComparison::NotComparable;
        }
        if self.prefix != other.prefix {
            return PackageComparison::NotComparable;
        }
        version_compare(&self.build, &other.build)
    }
}
