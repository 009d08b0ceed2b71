//! Generic, ecosystem-agnostic version string comparator (spec §4.1).
//!
//! Ground truth: `notus.scanner.models.packages.package.Package.version_compare`
//! in the original Python scanner. Strings are tokenized into maximal runs
//! of digits, or single non-digit characters (letters, separators, `~`),
//! then walked pairwise.

/// Outcome of comparing two packages or two version strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageComparison {
    Equal,
    ANewer,
    BNewer,
    /// Not a valid outcome of [`version_compare`] (which only ever returns
    /// `Equal`/`ANewer`/`BNewer`) -- used by package-level `compare`
    /// implementations for cross-name/cross-arch/cross-epoch mismatches.
    NotComparable,
}

fn tokenize(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            tokens.push(&s[start..i]);
        } else {
            // single character token; advance by one UTF-8 scalar
            let start = i;
            let ch_len = s[i..].chars().next().map_or(1, char::len_utf8);
            i += ch_len;
            tokens.push(&s[start..i]);
        }
    }
    tokens
}

fn is_numeric(tok: &str) -> bool {
    !tok.is_empty() && tok.bytes().all(|b| b.is_ascii_digit())
}

fn is_alpha(tok: &str) -> bool {
    tok.chars().count() == 1 && tok.chars().next().is_some_and(|c| c.is_alphabetic())
}

/// Compares two numeric tokens leading-zero-insensitively.
///
/// Returns `None` when the tokens denote the same integer value (e.g. `"01"`
/// vs `"1"`), signalling the caller to keep walking rather than decide the
/// whole comparison on this token pair.
fn numeric_cmp(a: &str, b: &str) -> Option<PackageComparison> {
    let a_val: u128 = a.parse().unwrap_or(u128::MAX);
    let b_val: u128 = b.parse().unwrap_or(u128::MAX);
    match a_val.cmp(&b_val) {
        std::cmp::Ordering::Greater => Some(PackageComparison::ANewer),
        std::cmp::Ordering::Less => Some(PackageComparison::BNewer),
        std::cmp::Ordering::Equal => None,
    }
}

/// Compare two ecosystem-agnostic version strings.
///
/// Only ever returns [`PackageComparison::Equal`], [`PackageComparison::ANewer`],
/// or [`PackageComparison::BNewer`].
#[must_use]
pub fn version_compare(a: &str, b: &str) -> PackageComparison {
    if a == b {
        return PackageComparison::Equal;
    }

    let a_tokens = tokenize(a);
    let b_tokens = tokenize(b);
    let len = a_tokens.len().max(b_tokens.len());

    for i in 0..len {
        let a_part = a_tokens.get(i).copied();
        let b_part = b_tokens.get(i).copied();

        let (a_part, b_part) = match (a_part, b_part) {
            (Some(a), Some(b)) => (a, b),
            (Some(_), None) => {
                let remaining = a_tokens[i];
                return if remaining != "~" {
                    PackageComparison::ANewer
                } else {
                    PackageComparison::BNewer
                };
            }
            (None, Some(_)) => {
                let remaining = b_tokens[i];
                return if remaining != "~" {
                    PackageComparison::BNewer
                } else {
                    PackageComparison::ANewer
                };
            }
            (None, None) => unreachable!("loop bound is max of both lengths"),
        };

        if a_part == b_part {
            continue;
        }

        if is_numeric(a_part) && is_numeric(b_part) {
            match numeric_cmp(a_part, b_part) {
                Some(result) => return result,
                None => continue,
            }
        }
        if is_numeric(a_part) || is_numeric(b_part) {
            return if is_numeric(a_part) {
                PackageComparison::ANewer
            } else {
                PackageComparison::BNewer
            };
        }
        if is_alpha(a_part) && is_alpha(b_part) {
            return if a_part.to_lowercase() > b_part.to_lowercase() {
                PackageComparison::ANewer
            } else {
                PackageComparison::BNewer
            };
        }
        if is_alpha(a_part) {
            return if b_part == "~" {
                PackageComparison::ANewer
            } else {
                PackageComparison::BNewer
            };
        }
        if is_alpha(b_part) {
            return if a_part == "~" {
                PackageComparison::BNewer
            } else {
                PackageComparison::ANewer
            };
        }

        return if (a_part != "~" && a_part > b_part) || b_part == "~" {
            PackageComparison::ANewer
        } else {
            PackageComparison::BNewer
        };
    }

    PackageComparison::Equal
}
