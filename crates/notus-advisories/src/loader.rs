//! Per-OS advisory loader (C5).
//!
//! Ground truth: `loader/json.py::JSONAdvisoriesLoader`. Locates
//! `<normalized-os-release>.notus` under the products directory,
//! integrity-checks it through the caller-supplied verifier closure, and
//! parses it into a [`PackageAdvisories`] store.

use std::path::Path;

use notus_core::PackageType;
use notus_packages::Package;
use notus_verify::VerificationResult;
use serde::Deserialize;

use crate::error::Error;
use crate::store::{PackageAdvisories, Symbol};

/// Normalize an OS release string to the `.notus` filename stem: trim,
/// lower-case, collapse runs of whitespace to `_` (spec §4.6 step 1).
#[must_use]
pub fn normalize_os_release(os_release: &str) -> String {
    os_release
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

#[derive(Debug, Deserialize)]
struct RawFile {
    package_type: String,
    #[serde(default)]
    advisories: Vec<RawAdvisory>,
}

#[derive(Debug, Deserialize)]
struct RawAdvisory {
    oid: Option<String>,
    fixed_packages: Option<Vec<RawFixedPackage>>,
}

#[derive(Debug, Deserialize)]
struct RawFixedPackage {
    full_name: Option<String>,
    name: Option<String>,
    full_version: Option<String>,
    specifier: Option<String>,
}

fn package_type_from_str(s: &str) -> Option<PackageType> {
    match s {
        "rpm" => Some(PackageType::Rpm),
        "deb" => Some(PackageType::Deb),
        "ebuild" => Some(PackageType::Ebuild),
        "slack" => Some(PackageType::Slack),
        "msp" => Some(PackageType::Msp),
        _ => None,
    }
}

/// Load and parse the advisory file for `os_release` from `products_directory`.
///
/// `verify` is typically `|path| verifier.verify(path, &sums)` where `sums`
/// was produced by a prior [`notus_verify::Verifier::reload`] call -- kept
/// as a plain closure parameter here so this crate does not have to own
/// the verifier's reload cache.
///
/// Returns `Ok(None)` for the common, non-error case of an unsupported OS
/// (missing file, empty file, unknown package type) per spec §4.6.
pub fn load_package_advisories(
    products_directory: &Path,
    verify: impl Fn(&Path) -> VerificationResult,
    os_release: &str,
) -> Result<Option<PackageAdvisories>, Error> {
    let stem = normalize_os_release(os_release);
    let file_path = products_directory.join(format!("{stem}.notus"));

    if !file_path.exists() {
        tracing::warn!(path = %file_path.display(), "could not load advisories: file does not exist");
        return Ok(None);
    }

    match verify(&file_path) {
        VerificationResult::Success => {
            tracing::debug!(path = %file_path.display(), "advisory file verification successful");
        }
        VerificationResult::InvalidName => {
            return Err(Error::AdvisoriesLoading {
                path: file_path.display().to_string(),
                reason: "OS name does not match filename".to_string(),
            });
        }
        _ => {
            return Err(Error::AdvisoriesLoading {
                path: file_path.display().to_string(),
                reason: "file verification failed".to_string(),
            });
        }
    }

    let metadata = std::fs::metadata(&file_path).map_err(|e| Error::AdvisoriesLoading {
        path: file_path.display().to_string(),
        reason: e.to_string(),
    })?;
    if metadata.len() < 2 {
        return Ok(None);
    }

    let text = std::fs::read_to_string(&file_path).map_err(|e| Error::AdvisoriesLoading {
        path: file_path.display().to_string(),
        reason: e.to_string(),
    })?;
    let data: RawFile = serde_json::from_str(&text).map_err(|e| Error::AdvisoriesLoading {
        path: file_path.display().to_string(),
        reason: format!("error in line {} while decoding JSON data", e.line()),
    })?;

    let Some(package_type) = package_type_from_str(&data.package_type) else {
        tracing::warn!(package_type = %data.package_type, "invalid package type");
        return Ok(None);
    };

    let mut store = PackageAdvisories::new(package_type);

    for advisory in data.advisories {
        let Some(oid) = advisory.oid else {
            tracing::error!("no OID found for JSON advisory");
            continue;
        };
        let Some(fixed_packages) = advisory.fixed_packages else {
            tracing::warn!(oid = %oid, "no fixed_packages found for advisory");
            continue;
        };

        for entry in fixed_packages {
            let package = match entry.full_name.as_deref() {
                Some(full_name) => Package::from_full_name(package_type, full_name),
                None => match (entry.name.as_deref(), entry.full_version.as_deref()) {
                    (Some(name), Some(full_version)) => {
                        Package::from_name_and_full_version(package_type, name, full_version)
                    }
                    _ => None,
                },
            };
            let Some(package) = package else {
                tracing::warn!(oid = %oid, "could not parse fixed package information");
                continue;
            };
            let symbol = Symbol::parse(entry.specifier.as_deref());
            store.add(package, oid.clone(), symbol);
        }
    }

    Ok(Some(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whitespace_and_case() {
        assert_eq!(normalize_os_release("EulerOS V2.0SP1"), "euleros_v2.0sp1");
        assert_eq!(normalize_os_release("  Debian   11  "), "debian_11");
    }

    #[test]
    fn missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            load_package_advisories(dir.path(), |_| VerificationResult::Success, "FakeOS")
                .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn invalid_name_is_a_loading_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fakeos.notus"), "{}").unwrap();
        let err = load_package_advisories(dir.path(), |_| VerificationResult::InvalidName, "FakeOS")
            .unwrap_err();
        assert!(matches!(err, Error::AdvisoriesLoading { .. }));
    }

    #[test]
    fn invalid_hash_is_a_generic_loading_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fakeos.notus"), "{}").unwrap();
        let err = load_package_advisories(dir.path(), |_| VerificationResult::InvalidHash, "FakeOS")
            .unwrap_err();
        assert!(matches!(err, Error::AdvisoriesLoading { .. }));
    }

    #[test]
    fn empty_manifest_sentinel_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fakeos.notus"), "{}").unwrap();
        // "{}" is 2 bytes, exactly at the boundary -- not below it, so it
        // proceeds to parse; use a 1-byte file for the sentinel case.
        std::fs::write(dir.path().join("tiny.notus"), "{").unwrap();
        let result =
            load_package_advisories(dir.path(), |_| VerificationResult::Success, "tiny").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn unknown_package_type_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("fakeos.notus"),
            r#"{"package_type": "nonsense", "advisories": []}"#,
        )
        .unwrap();
        let result =
            load_package_advisories(dir.path(), |_| VerificationResult::Success, "FakeOS")
                .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn malformed_json_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fakeos.notus"), "{ not json at all").unwrap();
        let err = load_package_advisories(dir.path(), |_| VerificationResult::Success, "FakeOS")
            .unwrap_err();
        match err {
            Error::AdvisoriesLoading { reason, .. } => assert!(reason.contains("line")),
            other => panic!("expected AdvisoriesLoading, got {other:?}"),
        }
    }

    #[test]
    fn s6_end_to_end_euleros_fixture_parses_two_packages() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = r#"{
            "package_type": "rpm",
            "advisories": [
                {
                    "oid": "1.3.6.1.4.1.25623.1.1.2.2016.1008",
                    "fixed_packages": [
                        {"full_name": "openssh-6.6.1p1-25.4.h4.x86_64"},
                        {"full_name": "openssh-clients-6.6.1p1-25.4.h4.x86_64"}
                    ]
                }
            ]
        }"#;
        std::fs::write(dir.path().join("euleros_v2.0sp1.notus"), fixture).unwrap();

        let store = load_package_advisories(
            dir.path(),
            |_| VerificationResult::Success,
            "EulerOS V2.0SP1",
        )
        .unwrap()
        .unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn advisory_without_oid_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = r#"{
            "package_type": "rpm",
            "advisories": [
                {"fixed_packages": [{"full_name": "openssh-6.6.1p1-25.4.h4.x86_64"}]}
            ]
        }"#;
        std::fs::write(dir.path().join("fakeos.notus"), fixture).unwrap();
        let store =
            load_package_advisories(dir.path(), |_| VerificationResult::Success, "FakeOS")
                .unwrap()
                .unwrap();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn unparseable_fixed_package_is_skipped_but_advisory_survives() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = r#"{
            "package_type": "rpm",
            "advisories": [
                {
                    "oid": "1.2.3",
                    "fixed_packages": [
                        {"full_name": "not a valid rpm string"},
                        {"full_name": "openssh-6.6.1p1-25.4.h4.x86_64"}
                    ]
                }
            ]
        }"#;
        std::fs::write(dir.path().join("fakeos.notus"), fixture).unwrap();
        let store =
            load_package_advisories(dir.path(), |_| VerificationResult::Success, "FakeOS")
                .unwrap()
                .unwrap();
        assert_eq!(store.len(), 1);
    }
}
