//! Error taxonomy for the advisory store and loader (C3/C5).

/// Errors surfaced while loading an OS's advisory file (spec §7).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Corrupt advisory file, JSON parse error, or an OS-name/filename
    /// mismatch. Callers log and abort the current scan cleanly; this is
    /// never raised for a merely *unsupported* OS (that returns `Ok(None)`).
    #[error("could not load advisories from {path}: {reason}")]
    AdvisoriesLoading { path: String, reason: String },

    /// The signed `sha256sums` manifest failed OpenPGP verification.
    /// Fatal for the loader call that triggered the reload.
    #[error("could not verify sha256sums manifest: {0}")]
    Sha256SumLoading(#[from] notus_verify::Error),
}
