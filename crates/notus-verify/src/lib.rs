//! Signature/hash verifier gating advisory file loads (C4).
//!
//! Every advisory file load is checked against a GPG-signed `sha256sums`
//! manifest before it is trusted. The manifest itself is cheap to
//! fingerprint (SHA-1) so repeated scans don't re-verify the OpenPGP
//! signature on every load -- only the signature and the SHA-256 digests
//! it lists are a security boundary; the fingerprint is a change-detection
//! optimization only (see [`Verifier::reload`]).

mod error;
mod gpg;
mod hashing;
mod result;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub use error::Error;
pub use gpg::Keyring;
pub use result::VerificationResult;

/// Maps a SHA-256 hex digest to the basename it is expected to name.
pub type Sha256Sums = HashMap<String, String>;

struct Cache {
    fingerprint: Option<String>,
    sums: Sha256Sums,
}

/// Verifies advisory files against a signed `sha256sums` manifest.
///
/// Holds the only long-lived mutable state in the matching engine: a
/// single-entry cache of `{fingerprint, sums}` behind a read-write lock.
/// Reloads are rare (one signed manifest per feed sync), so serializing
/// them behind one lock is sufficient (spec §5).
pub struct Verifier {
    hash_file: PathBuf,
    keyring: Keyring,
    disabled: bool,
    cache: RwLock<Cache>,
}

impl Verifier {
    /// Build a verifier over `hash_file` (expected to have a detached
    /// signature at `<hash_file>.asc`) using public keys from `gpg_home`.
    pub fn new(hash_file: impl Into<PathBuf>, gpg_home: &Path) -> Result<Self, Error> {
        let keyring = Keyring::load(gpg_home)?;
        Ok(Self {
            hash_file: hash_file.into(),
            keyring,
            disabled: false,
            cache: RwLock::new(Cache {
                fingerprint: None,
                sums: HashMap::new(),
            }),
        })
    }

    /// A verifier with hashsum verification permanently disabled: every
    /// call short-circuits to `Success`, matching the
    /// `disable-hashsum-verification` config switch (spec §6).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            hash_file: PathBuf::new(),
            keyring: Keyring::empty(),
            disabled: true,
            cache: RwLock::new(Cache {
                fingerprint: None,
                sums: HashMap::new(),
            }),
        }
    }

    /// Recompute the manifest's SHA-1 fingerprint; if unchanged from the
    /// cached value, return the cached sums map without touching the
    /// OpenPGP signature. Otherwise re-verify the detached signature,
    /// reparse `sha256sums`, and update the cache.
    ///
    /// On a verification failure, `on_failure` is invoked with the
    /// previously cached map and its return value (or error) is
    /// propagated -- callers typically raise a fatal loading error from
    /// this hook (spec §4.5).
    pub fn reload(
        &self,
        on_failure: impl FnOnce(&Sha256Sums) -> Result<Sha256Sums, Error>,
    ) -> Result<Sha256Sums, Error> {
        if self.disabled {
            return Ok(HashMap::new());
        }

        let data = std::fs::read(&self.hash_file).map_err(|source| Error::Io {
            path: self.hash_file.display().to_string(),
            source,
        })?;
        let fingerprint = hashing::sha1_hex(&data);

        {
            let cache = self.cache.read().expect("verifier cache poisoned");
            if cache.fingerprint.as_deref() == Some(fingerprint.as_str()) {
                return Ok(cache.sums.clone());
            }
        }

        match self.verify_and_parse(&data) {
            Ok(sums) => {
                let mut cache = self.cache.write().expect("verifier cache poisoned");
                cache.fingerprint = Some(fingerprint);
                cache.sums = sums.clone();
                Ok(sums)
            }
            Err(_) => {
                let cache = self.cache.read().expect("verifier cache poisoned");
                on_failure(&cache.sums)
            }
        }
    }

    fn verify_and_parse(&self, hash_file_bytes: &[u8]) -> Result<Sha256Sums, Error> {
        let asc_path = {
            let mut name = self.hash_file.as_os_str().to_owned();
            name.push(".asc");
            PathBuf::from(name)
        };
        let signature = std::fs::read(&asc_path).map_err(|source| Error::Io {
            path: asc_path.display().to_string(),
            source,
        })?;
        self.keyring.verify_detached(hash_file_bytes, &signature)?;
        Ok(parse_sha256sums(hash_file_bytes))
    }

    /// Verify a single advisory file against the currently cached sums
    /// (load them first via [`Verifier::reload`]).
    #[must_use]
    pub fn verify(&self, file_path: &Path, sums: &Sha256Sums) -> VerificationResult {
        if self.disabled {
            return VerificationResult::Success;
        }
        if !file_path.is_file() {
            return VerificationResult::InvalidFile;
        }
        let Ok(data) = std::fs::read(file_path) else {
            return VerificationResult::InvalidFile;
        };
        let digest = hashing::hash_data(&data);
        let Some(expected_name) = sums.get(&digest) else {
            return VerificationResult::InvalidHash;
        };
        let actual_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if *expected_name != actual_name {
            return VerificationResult::InvalidName;
        }
        VerificationResult::Success
    }
}

/// Parse `sha256sums` lines of the form `<sha256_hex>  <path>` (two-space
/// separator per spec §6), retaining only the basename of each path.
fn parse_sha256sums(data: &[u8]) -> Sha256Sums {
    let text = String::from_utf8_lossy(data);
    let mut sums = HashMap::new();
    for line in text.lines() {
        let Some((digest, path)) = line.split_once("  ") else {
            continue;
        };
        let basename = path.trim().rsplit('/').next().unwrap_or(path.trim());
        sums.insert(digest.trim().to_string(), basename.to_string());
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_space_separated_lines_and_keeps_basename() {
        let data = b"abc123  products/foo.notus\ndef456  bar.notus\n";
        let sums = parse_sha256sums(data);
        assert_eq!(sums.get("abc123").map(String::as_str), Some("foo.notus"));
        assert_eq!(sums.get("def456").map(String::as_str), Some("bar.notus"));
    }

    #[test]
    fn disabled_verifier_always_succeeds() {
        let verifier = Verifier::disabled();
        let sums = verifier.reload(|_| unreachable!()).unwrap();
        assert!(sums.is_empty());
        let result = verifier.verify(Path::new("/nonexistent"), &sums);
        assert_eq!(result, VerificationResult::Success);
    }

    #[test]
    fn missing_file_is_invalid_file_even_with_entries_in_sums() {
        let verifier = Verifier::disabled();
        // disabled() bypasses the file check; exercise the real branch via
        // a bare Verifier struct value built without going through new().
        let enabled = Verifier {
            hash_file: PathBuf::new(),
            keyring: Keyring::empty(),
            disabled: false,
            cache: RwLock::new(Cache {
                fingerprint: None,
                sums: HashMap::new(),
            }),
        };
        let sums: Sha256Sums = HashMap::new();
        assert_eq!(
            VerificationResult::InvalidFile,
            enabled.verify(Path::new("/definitely/missing/path"), &sums)
        );
    }

    #[test]
    fn unknown_digest_is_invalid_hash() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("example.notus");
        std::fs::write(&file_path, b"{}").unwrap();

        let enabled = Verifier {
            hash_file: PathBuf::new(),
            keyring: Keyring::empty(),
            disabled: false,
            cache: RwLock::new(Cache {
                fingerprint: None,
                sums: HashMap::new(),
            }),
        };
        let sums: Sha256Sums = HashMap::new();
        assert_eq!(
            VerificationResult::InvalidHash,
            enabled.verify(&file_path, &sums)
        );
    }

    #[test]
    fn mismatched_basename_is_invalid_name() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("actual_name.notus");
        std::fs::write(&file_path, b"{}").unwrap();
        let digest = hashing::hash_data(b"{}");

        let mut sums: Sha256Sums = HashMap::new();
        sums.insert(digest, "expected_name.notus".to_string());

        let enabled = Verifier {
            hash_file: PathBuf::new(),
            keyring: Keyring::empty(),
            disabled: false,
            cache: RwLock::new(Cache {
                fingerprint: None,
                sums: HashMap::new(),
            }),
        };
        assert_eq!(
            VerificationResult::InvalidName,
            enabled.verify(&file_path, &sums)
        );
    }

    #[test]
    fn matching_digest_and_basename_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("example.notus");
        std::fs::write(&file_path, b"{}").unwrap();
        let digest = hashing::hash_data(b"{}");

        let mut sums: Sha256Sums = HashMap::new();
        sums.insert(digest, "example.notus".to_string());

        let enabled = Verifier {
            hash_file: PathBuf::new(),
            keyring: Keyring::empty(),
            disabled: false,
            cache: RwLock::new(Cache {
                fingerprint: None,
                sums: HashMap::new(),
            }),
        };
        assert_eq!(
            VerificationResult::Success,
            enabled.verify(&file_path, &sums)
        );
    }
}
