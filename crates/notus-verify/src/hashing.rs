//! SHA-256/SHA-1 hashing helpers backing the signature manifest verifier (C4).
//!
//! SHA-256 is the security-relevant digest (checked against the signed
//! manifest); SHA-1 is used only as a cheap fingerprint to decide whether
//! the manifest changed since the last reload (spec §4.5/§9) and carries
//! no security weight of its own.

use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of data
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute the SHA-1 fingerprint used for cheap manifest-change detection.
/// Not a security primitive -- see module docs.
pub fn sha1_hex(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
