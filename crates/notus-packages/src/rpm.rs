//! RPM package variant: `NAME-[EPOCH:]VERSION-RELEASE.ARCH`.

use notus_core::{version_compare, PackageComparison};

/// A parsed RPM package reference (EVRA tuple plus printable forms).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RpmPackage {
    pub name: String,
    pub epoch: u64,
    pub version: String,
    pub release: String,
    pub arch: String,
    pub full_name: String,
    pub full_version: String,
}

/// Split `NAME-EVR.ARCH` style identifiers by walking from the right:
/// arch after the last `.`, release after the next-to-last `-`, version
/// after the last remaining `-`, name is whatever is left.
fn split_evra(s: &str) -> Option<(&str, &str, &str, &str)> {
    let (rest, arch) = s.rsplit_once('.')?;
    let (rest, release) = rest.rsplit_once('-')?;
    let (name, version) = rest.rsplit_once('-')?;
    Some((name, version, release, arch))
}

fn split_epoch(version_part: &str) -> (u64, &str) {
    match version_part.split_once(':') {
        Some((epoch, version)) => (epoch.parse().unwrap_or(0), version),
        None => (0, version_part),
    }
}

fn has_fips_or_ksplice_mismatch(a: &str, b: &str) -> bool {
    (a.contains("_fips") != b.contains("_fips")) || (a.contains("ksplice") != b.contains("ksplice"))
}

impl RpmPackage {
    #[must_use]
    pub fn from_full_name(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let (name, version_part, release, arch) = split_evra(trimmed)?;
        let (epoch, version) = split_epoch(version_part);

        let full_version = if epoch == 0 {
            format!("{version}-{release}.{arch}")
        } else {
            format!("{epoch}:{version}-{release}.{arch}")
        };
        let full_name = format!("{name}-{full_version}");

        Some(Self {
            name: name.to_string(),
            epoch,
            version: version.to_string(),
            release: release.to_string(),
            arch: arch.to_string(),
            full_name,
            full_version,
        })
    }

    #[must_use]
    pub fn from_name_and_full_version(name: &str, full_version: &str) -> Option<Self> {
        let full_name = format!("{name}-{full_version}");
        Self::from_full_name(&full_name)
    }

    /// Compare two RPM packages. `Err` when names or architectures differ;
    /// `Ok(NotComparable)` for the `_fips`/`ksplice` exception.
    #[must_use]
    pub fn compare(&self, other: &Self) -> PackageComparison {
        if self.name != other.name || self.arch != other.arch {
            return PackageComparison::NotComparable;
        }
        if has_fips_or_ksplice_mismatch(&self.full_name, &other.full_name) {
            return PackageComparison::NotComparable;
        }
        if self.epoch != other.epoch {
            return if self.epoch > other.epoch {
                PackageComparison::ANewer
            } else {
                PackageComparison::BNewer
            };
        }
        match version_compare(&self.version, &other.version) {
            PackageComparison::Equal => version_compare(&self.release, &other.release),
            outcome => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_form() {
        let p = RpmPackage::from_full_name("keyutils-1.5.8-3.amd64").unwrap();
        assert_eq!(p.name, "keyutils");
        assert_eq!(p.version, "1.5.8");
        assert_eq!(p.release, "3");
        assert_eq!(p.arch, "amd64");
        assert_eq!(p.full_name, "keyutils-1.5.8-3.amd64");
    }

    #[test]
    fn parses_dotted_release() {
        let p = RpmPackage::from_full_name("mesa-libgbm-11.2.2-2.20160614.x86_64").unwrap();
        assert_eq!(p.name, "mesa-libgbm");
        assert_eq!(p.version, "11.2.2");
        assert_eq!(p.release, "2.20160614");
        assert_eq!(p.arch, "x86_64");
    }

    #[test]
    fn parses_epoch_and_round_trips_full_name() {
        let p = RpmPackage::from_full_name(
            "docker-engine-1:18.09.0-200.h62.33.19.eulerosv2r10.x86_64",
        )
        .unwrap();
        assert_eq!(p.epoch, 1);
        assert_eq!(p.version, "18.09.0");
        assert_eq!(p.release, "200.h62.33.19.eulerosv2r10");
        assert_eq!(
            p.full_name,
            "docker-engine-1:18.09.0-200.h62.33.19.eulerosv2r10.x86_64"
        );
        assert_eq!(
            p.full_version,
            "1:18.09.0-200.h62.33.19.eulerosv2r10.x86_64"
        );
    }

    #[test]
    fn trims_whitespace_and_crlf() {
        let p = RpmPackage::from_full_name(" libtool-ltdl-2.4.2-21.x86_64\r\n").unwrap();
        assert_eq!(p.arch, "x86_64");
        assert_eq!(p.name, "libtool-ltdl");
    }

    #[test]
    fn from_name_and_full_version_matches_from_full_name() {
        let p = RpmPackage::from_name_and_full_version("cups-libs", "1.6.3-26.h1.x86_64").unwrap();
        assert_eq!(p.full_name, "cups-libs-1.6.3-26.h1.x86_64");
    }

    #[test]
    fn s1_release_ordering() {
        let a = RpmPackage::from_full_name("openssh-6.6.1p1-25.4.h3.x86_64").unwrap();
        let b = RpmPackage::from_full_name("openssh-6.6.1p1-25.4.h4.x86_64").unwrap();
        assert_eq!(b.compare(&a), PackageComparison::ANewer);
        assert_eq!(a.compare(&b), PackageComparison::BNewer);
    }

    #[test]
    fn s2_fips_exception_not_comparable() {
        let a = RpmPackage::from_full_name("gnutls-3.6.16-4.el8.x86_64").unwrap();
        let b = RpmPackage::from_full_name("gnutls-3.6.16-4.0.1.el8_fips.x86_64").unwrap();
        assert_eq!(a.compare(&b), PackageComparison::NotComparable);
        assert_eq!(b.compare(&a), PackageComparison::NotComparable);
    }

    #[test]
    fn fips_exception_lifts_once_both_sides_have_the_marker() {
        let a = RpmPackage::from_full_name("gnutls-3.6.16-4.el8_fips.x86_64").unwrap();
        let b = RpmPackage::from_full_name("gnutls-3.6.16-4.0.1.el8_fips.x86_64").unwrap();
        assert_eq!(b.compare(&a), PackageComparison::ANewer);
    }

    #[test]
    fn ksplice_exception() {
        let a = RpmPackage::from_full_name("openssl-libs-1.0.2k-24.0.3.el7_8.x86_64").unwrap();
        let b =
            RpmPackage::from_full_name("openssl-libs-1.0.2k-24.0.3.ksplice1.el7_9.x86_64").unwrap();
        assert_eq!(a.compare(&b), PackageComparison::NotComparable);

        let c =
            RpmPackage::from_full_name("openssl-libs-1.0.2k-24.0.3.ksplice1.el7_8.x86_64").unwrap();
        assert_eq!(b.compare(&c), PackageComparison::ANewer);
    }

    #[test]
    fn different_architecture_is_not_comparable() {
        let a = RpmPackage::from_full_name("foo-bar-1.2.3-4.x86_64").unwrap();
        let b = RpmPackage::from_full_name("foo-bar-1.2.3-4.aarch64").unwrap();
        assert_eq!(a.compare(&b), PackageComparison::NotComparable);
    }

    #[test]
    fn malformed_input_returns_none() {
        assert!(RpmPackage::from_full_name("not-a-package").is_none());
    }
}
