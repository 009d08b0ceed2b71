//! Advisory store, loader, and vulnerability predicate (C3, C5, §4.3).
//!
//! This crate is the bridge between the on-disk `.notus` advisory files
//! and the package model in `notus-packages`: [`loader::load_package_advisories`]
//! parses a verified file into a [`store::PackageAdvisories`] index, which
//! the scan driver then consults per installed package.

mod error;
mod loader;
mod store;

pub use error::Error;
pub use loader::{load_package_advisories, normalize_os_release};
pub use store::{PackageAdvisories, PackageAdvisory, Symbol};
