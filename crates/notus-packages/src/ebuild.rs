//! Ebuild (Gentoo) package variant: `CATEGORY/NAME-VERSION[-rREVISION]`.
//!
//! The later, strict dialect is implemented: `CATEGORY/NAME` is required
//! and kept together as the comparability key, per the scanner's redesign
//! notes (Ebuild's category/name enforcement was inconsistent across
//! historical revisions; this is the corrected behavior).

use notus_core::{version_compare, PackageComparison};

/// A parsed Ebuild package reference. `name` holds the full `category/name`
/// string; two packages only compare when that whole string matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EbuildPackage {
    pub name: String,
    pub version: String,
    pub revision: String,
    pub full_name: String,
    pub full_version: String,
}

fn split_name_and_version(rest: &str) -> Option<(&str, &str)> {
    let bytes = rest.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
            return Some((&rest[..i], &rest[i + 1..]));
        }
    }
    None
}

/// Split off a trailing `-r<digits>` revision marker, if present.
fn split_revision(version_and_rev: &str) -> (&str, &str) {
    if let Some(idx) = version_and_rev.rfind("-r") {
        let (version, rev_marker) = version_and_rev.split_at(idx);
        let digits = &rev_marker[2..];
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return (version, digits);
        }
    }
    (version_and_rev, "")
}

impl EbuildPackage {
    #[must_use]
    pub fn from_full_name(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let (category, rest) = trimmed.split_once('/')?;
        if category.is_empty() || rest.is_empty() {
            return None;
        }
        let (name_part, version_and_rev) = split_name_and_version(rest)?;
        if name_part.is_empty() {
            return None;
        }
        let (version, revision) = split_revision(version_and_rev);

        let name = format!("{category}/{name_part}");
        let full_version = if revision.is_empty() {
            version.to_string()
        } else {
            format!("{version}-r{revision}")
        };
        let full_name = format!("{name}-{full_version}");

        Some(Self {
            name,
            version: version.to_string(),
            revision: revision.to_string(),
            full_name,
            full_version,
        })
    }

    #[must_use]
    pub fn from_name_and_full_version(name: &str, full_version: &str) -> Option<Self> {
        if name.is_empty() || full_version.is_empty() {
            return None;
        }
        let (version, revision) = split_revision(full_version);
        let full_name = format!("{name}-{full_version}");
        Some(Self {
            name: name.to_string(),
            version: version.to_string(),
            revision: revision.to_string(),
            full_name,
            full_version: full_version.to_string(),
        })
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> PackageComparison {
        if self.name != other.name {
            return PackageComparison::NotComparable;
        }
        match version_compare(&self.version, &other.version) {
            PackageComparison::Equal => {
                let a_rev = if self.revision.is_empty() {
                    "0"
                } else {
                    &self.revision
                };
                let b_rev = if other.revision.is_empty() {
                    "0"
                } else {
                    &other.revision
                };
                version_compare(a_rev, b_rev)
            }
            outcome => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_strings_without_category() {
        assert!(EbuildPackage::from_full_name("").is_none());
        assert!(EbuildPackage::from_full_name("www-servers/").is_none());
        assert!(EbuildPackage::from_full_name("www-servers/name").is_none());
    }

    #[test]
    fn rejects_empty_name_or_version() {
        assert!(EbuildPackage::from_name_and_full_version("", "1.2.3").is_none());
        assert!(EbuildPackage::from_name_and_full_version("name", "").is_none());
    }

    #[test]
    fn parses_revision_marker() {
        let p = EbuildPackage::from_full_name("www-servers/apache-2.4.51-r2").unwrap();
        assert_eq!(p.name, "www-servers/apache");
        assert_eq!(p.version, "2.4.51");
        assert_eq!(p.revision, "2");
        assert_eq!(p.full_name, "www-servers/apache-2.4.51-r2");
    }

    #[test]
    fn revision_bump_is_newer() {
        let apache1 = EbuildPackage::from_full_name("www-servers/apache-2.4.51-r2").unwrap();
        let apache2 =
            EbuildPackage::from_name_and_full_version("www-servers/apache", "2.4.51-r3").unwrap();
        assert_eq!(apache2.compare(&apache1), PackageComparison::ANewer);
        assert_eq!(apache1.compare(&apache2), PackageComparison::BNewer);
    }

    #[test]
    fn category_is_part_of_the_comparability_key() {
        let with_category =
            EbuildPackage::from_name_and_full_version("www-servers/apache", "2.4.51-r3").unwrap();
        let without_category =
            EbuildPackage::from_name_and_full_version("apache", "2.4.51-r3").unwrap();
        assert_eq!(
            with_category.compare(&without_category),
            PackageComparison::NotComparable
        );
    }

    #[test]
    fn version_without_revision_defaults_to_zero() {
        let a = EbuildPackage::from_full_name("dev-lang/python-3.11.4").unwrap();
        let b = EbuildPackage::from_full_name("dev-lang/python-3.11.4-r1").unwrap();
        assert_eq!(b.compare(&a), PackageComparison::ANewer);
    }
}
