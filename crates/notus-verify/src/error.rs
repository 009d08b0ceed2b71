//! Error taxonomy for the signature/hash verifier.

/// Raised when the OpenPGP signature over `sha256sums` is missing or
/// invalid. Fatal for the reload that triggered it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("signature verification failed for {path}: {reason}")]
    InvalidSignature { path: String, reason: String },

    #[error("could not read hash manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
