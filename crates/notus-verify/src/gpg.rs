//! GPG/OpenPGP detached-signature verification over the `sha256sums` manifest.
//!
//! Grounded in the trusted-keyring pattern used elsewhere in the corpus for
//! certificate-based verification, adapted to Sequoia's streaming detached
//! verifier (the correct way to check a signature against arbitrary bytes,
//! as opposed to a direct-key self-signature check).

use std::path::Path;

use sequoia_openpgp::cert::Cert;
use sequoia_openpgp::parse::stream::{
    DetachedVerifierBuilder, MessageLayer, MessageStructure, VerificationHelper,
    VerificationResult as SigVerificationResult,
};
use sequoia_openpgp::parse::Parse;
use sequoia_openpgp::policy::StandardPolicy;
use sequoia_openpgp::KeyHandle;

use crate::error::Error;

/// The set of public keys trusted to sign advisory manifests, loaded from
/// the `gpg-home` configuration option.
pub struct Keyring {
    certs: Vec<Cert>,
}

impl Keyring {
    /// An empty keyring that trusts nothing; used by [`crate::Verifier::disabled`]
    /// where signature checks are bypassed entirely.
    #[must_use]
    pub fn empty() -> Self {
        Self { certs: Vec::new() }
    }

    /// Load every OpenPGP certificate (armored or binary) directly under
    /// `gpg_home`. Unparsable files are skipped rather than failing the
    /// whole load -- a stray non-key file in the directory is common.
    pub fn load(gpg_home: &Path) -> Result<Self, Error> {
        let entries = std::fs::read_dir(gpg_home).map_err(|source| Error::Io {
            path: gpg_home.display().to_string(),
            source,
        })?;

        let mut certs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::Io {
                path: gpg_home.display().to_string(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() {
                if let Ok(cert) = Cert::from_file(&path) {
                    certs.push(cert);
                }
            }
        }
        Ok(Self { certs })
    }

    /// Verify a detached ASCII-armored `signature` over `data` against any
    /// certificate in this keyring.
    pub fn verify_detached(&self, data: &[u8], signature: &[u8]) -> Result<(), Error> {
        let policy = StandardPolicy::new();
        let helper = Helper {
            certs: &self.certs,
        };

        let mut verifier = DetachedVerifierBuilder::from_bytes(signature)
            .and_then(|builder| builder.with_policy(&policy, None, helper))
            .map_err(|e| Error::InvalidSignature {
                path: "sha256sums.asc".to_string(),
                reason: e.to_string(),
            })?;

        verifier
            .verify_bytes(data)
            .map_err(|e| Error::InvalidSignature {
                path: "sha256sums".to_string(),
                reason: e.to_string(),
            })
    }
}

struct Helper<'a> {
    certs: &'a [Cert],
}

impl VerificationHelper for Helper<'_> {
    fn get_certs(&mut self, _ids: &[KeyHandle]) -> sequoia_openpgp::Result<Vec<Cert>> {
        Ok(self.certs.to_vec())
    }

    fn check(&mut self, structure: MessageStructure) -> sequoia_openpgp::Result<()> {
        for layer in structure.into_iter() {
            let MessageLayer::SignatureGroup { results } = layer else {
                continue;
            };
            if results
                .into_iter()
                .any(|r| matches!(r, SigVerificationResult::GoodChecksum { .. }))
            {
                return Ok(());
            }
        }
        Err(anyhow::anyhow!("no certificate in the keyring produced a valid signature"))
    }
}
