//! Error taxonomy shared by the package model.
//!
//! Mirrors the base exception hierarchy of the original scanner
//! (`notus.scanner.errors`): each kind is its own variant rather than a
//! single opaque error, so callers can match on what actually went wrong.

/// Errors raised while constructing or comparing packages.
///
/// `Incomparable` is requesting a comparison between two different
/// package ecosystems (e.g. an RPM package and a DEB package) -- a
/// programming error, distinct from [`PackageComparison::NotComparable`]
/// which is a legitimate runtime outcome for same-ecosystem packages
/// that merely differ in name or architecture.
///
/// [`PackageComparison::NotComparable`]: crate::PackageComparison::NotComparable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("can't compare {a} to {b}: different package ecosystems")]
    Incomparable { a: String, b: String },
}
