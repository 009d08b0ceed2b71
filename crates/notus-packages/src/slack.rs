//! Slackware package variant: `NAME-VERSION-ARCH-BUILD[_slackTARGET]`.

use notus_core::{version_compare, PackageComparison};

/// A parsed Slackware package reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlackPackage {
    pub name: String,
    pub version: String,
    pub arch: String,
    pub build: String,
    pub target: String,
    pub full_name: String,
    pub full_version: String,
}

impl SlackPackage {
    #[must_use]
    pub fn from_full_name(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let (rest, build_part) = trimmed.rsplit_once('-')?;
        let (rest, arch) = rest.rsplit_once('-')?;
        let (name, version) = rest.rsplit_once('-')?;

        let (build, target) = match build_part.split_once("_slack") {
            Some((build, target)) => (build, target),
            None => (build_part, ""),
        };

        let full_version = format!("{version}-{arch}-{build_part}");
        let full_name = format!("{name}-{full_version}");

        Some(Self {
            name: name.to_string(),
            version: version.to_string(),
            arch: arch.to_string(),
            build: build.to_string(),
            target: target.to_string(),
            full_name,
            full_version,
        })
    }

    #[must_use]
    pub fn from_name_and_full_version(name: &str, full_version: &str) -> Option<Self> {
        let full_name = format!("{name}-{full_version}");
        Self::from_full_name(&full_name)
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> PackageComparison {
        if self.name != other.name || self.arch != other.arch {
            return PackageComparison::NotComparable;
        }
        match version_compare(&self.version, &other.version) {
            PackageComparison::Equal => match version_compare(&self.target, &other.target) {
                PackageComparison::Equal => version_compare(&self.build, &other.build),
                outcome => outcome,
            },
            outcome => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_target_suffix() {
        let p = SlackPackage::from_full_name("flac-1.3.4-x86_64-1_slack15.0").unwrap();
        assert_eq!(p.name, "flac");
        assert_eq!(p.version, "1.3.4");
        assert_eq!(p.arch, "x86_64");
        assert_eq!(p.build, "1");
        assert_eq!(p.target, "15.0");
        assert_eq!(p.full_name, "flac-1.3.4-x86_64-1_slack15.0");
    }

    #[test]
    fn target_defaults_to_empty_string() {
        let p = SlackPackage::from_full_name("kernel-source-5.15.27-noarch-1").unwrap();
        assert_eq!(p.name, "kernel-source");
        assert_eq!(p.target, "");
        assert_eq!(p.full_version, "5.15.27-noarch-1");
    }

    #[test]
    fn non_numeric_version_component() {
        let p = SlackPackage::from_full_name("libjpeg-v8a-x86_64-2").unwrap();
        assert_eq!(p.version, "v8a");
        assert_eq!(p.build, "2");
    }

    #[test]
    fn trims_whitespace_and_crlf() {
        let p = SlackPackage::from_full_name(" libjpeg-v8a-x86_64-2\r\n").unwrap();
        assert_eq!(p.arch, "x86_64");
    }

    #[test]
    fn missing_build_segment_is_malformed() {
        assert!(SlackPackage::from_full_name("libjpeg-v8a-x86_64").is_none());
    }

    #[test]
    fn different_architecture_is_not_comparable() {
        let a = SlackPackage::from_full_name("foo-bar-1.2.3-x86_64-4_slack15.0").unwrap();
        let b = SlackPackage::from_full_name("foo-bar-1.2.3-aarch64-4_slack15.0").unwrap();
        assert_eq!(a.compare(&b), PackageComparison::NotComparable);
    }

    #[test]
    fn target_difference_affects_ordering() {
        let a = SlackPackage::from_full_name("foo-bar-1.2.3-x86_64-4_slack15.0").unwrap();
        let b = SlackPackage::from_full_name("foo-bar-1.2.3-x86_64-4_slack15.1").unwrap();
        assert_eq!(b.compare(&a), PackageComparison::ANewer);
    }
}
