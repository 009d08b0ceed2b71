//! DEB package variant: `NAME-[EPOCH:]UPSTREAM[-DEBIAN_REVISION]`.

use notus_core::{version_compare, PackageComparison};

/// A parsed Debian package reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DebPackage {
    pub name: String,
    pub epoch: String,
    pub upstream_version: String,
    pub debian_revision: String,
    pub full_name: String,
    pub full_version: String,
}

/// Debian package names may themselves contain hyphens (`foo-bar`), so the
/// name/version boundary is the first hyphen immediately followed by a
/// digit -- the earliest point a version component could start.
fn split_name_and_rest(s: &str) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
            return Some((&s[..i], &s[i + 1..]));
        }
    }
    None
}

fn split_epoch_upstream_revision(rest: &str) -> (&str, &str, &str) {
    let (epoch, remainder) = rest.split_once(':').unwrap_or(("0", rest));
    match remainder.rsplit_once('-') {
        Some((upstream, revision)) => (epoch, upstream, revision),
        None => (epoch, remainder, ""),
    }
}

fn format_full_version(epoch: &str, upstream: &str, revision: &str) -> String {
    let version_and_revision = if revision.is_empty() {
        upstream.to_string()
    } else {
        format!("{upstream}-{revision}")
    };
    if epoch == "0" {
        version_and_revision
    } else {
        format!("{epoch}:{version_and_revision}")
    }
}

impl DebPackage {
    #[must_use]
    pub fn from_full_name(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let (name, rest) = split_name_and_rest(trimmed)?;
        let (epoch, upstream_version, debian_revision) = split_epoch_upstream_revision(rest);
        let full_version = format_full_version(epoch, upstream_version, debian_revision);
        let full_name = format!("{name}-{full_version}");

        Some(Self {
            name: name.to_string(),
            epoch: epoch.to_string(),
            upstream_version: upstream_version.to_string(),
            debian_revision: debian_revision.to_string(),
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
        if self.name != other.name {
            return PackageComparison::NotComparable;
        }
        let epoch_cmp = match (self.epoch.parse::<u64>(), other.epoch.parse::<u64>()) {
            (Ok(a), Ok(b)) => {
                if a > b {
                    PackageComparison::ANewer
                } else if a < b {
                    PackageComparison::BNewer
                } else {
                    PackageComparison::Equal
                }
            }
            _ => version_compare(&self.epoch, &other.epoch),
        };
        if epoch_cmp != PackageComparison::Equal {
            return epoch_cmp;
        }
        match version_compare(&self.upstream_version, &other.upstream_version) {
            PackageComparison::Equal => {
                version_compare(&self.debian_revision, &other.debian_revision)
            }
            outcome => outcome,
        }
    }
}
