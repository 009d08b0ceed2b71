//! Shared types for the Notus advisory matching engine.
//!
//! This crate provides the pieces every other `notus-*` crate builds on:
//! the version comparator (C1), the package-ecosystem enum, and the
//! comparison outcome used throughout the matching engine.

mod error;
mod version;

pub use error::Error;
pub use version::{version_compare, PackageComparison};

/// Package ecosystem a [`PackageComparison`] / advisory applies to.
///
/// Named per the JSON `package_type` field in advisory files (spec §4.6 /
/// §6): `rpm`, `deb`, `ebuild`, `slack`, `msp` (Windows update).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Rpm,
    Deb,
    Ebuild,
    Slack,
    Msp,
}

impl std::fmt::Display for PackageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Rpm => "rpm",
            Self::Deb => "deb",
            Self::Ebuild => "ebuild",
            Self::Slack => "slack",
            Self::Msp => "msp",
        };
        f.write_str(s)
    }
}
