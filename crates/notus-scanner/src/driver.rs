//! Scan driver (C6): matches every installed package against the advisory
//! store for a host's OS release, aggregates findings by OID, and publishes
//! status/result messages (spec §4.7). Grounded in `scanner.py`'s
//! `NotusScanner` -- `_start_scan`/`_check_package` for matching,
//! `_publish_results` for the report format.

use std::collections::BTreeMap;

use notus_advisories::{PackageAdvisories, PackageAdvisory};
use notus_messaging::{
    OutboundMessage, Publisher, ResultMessage, ScanStartMessage, ScanStatus, ScanStatusMessage,
};
use notus_packages::Package;

/// Per-OID findings: installed package plus the constraints it violated,
/// in the order they were matched. Ordered by OID so result publication
/// is deterministic within a run.
type Findings = BTreeMap<String, Vec<(Package, Vec<PackageAdvisory>)>>;

/// Drives one scan-start message to completion against a loader and a
/// publisher. Generic over both so tests can supply fakes without standing
/// up a filesystem or a bus connection (spec §5: no shared mutable state
/// beyond the loader's own cache).
pub struct ScanDriver<L, P>
where
    L: Fn(&str) -> Result<Option<PackageAdvisories>, notus_advisories::Error>,
    P: Publisher,
{
    loader: L,
    publisher: P,
}

impl<L, P> ScanDriver<L, P>
where
    L: Fn(&str) -> Result<Option<PackageAdvisories>, notus_advisories::Error>,
    P: Publisher,
{
    pub fn new(loader: L, publisher: P) -> Self {
        Self { loader, publisher }
    }

    /// Handle one scan-start message end to end (spec §4.7).
    pub fn run_scan(&self, message: &ScanStartMessage) {
        if message.os_release.is_empty() {
            tracing::error!(
                host_ip = %message.host_ip,
                "unable to start scan: the field os_release is empty"
            );
            return;
        }
        if message.package_list.is_empty() {
            tracing::error!(
                host_ip = %message.host_ip,
                "unable to start scan: the field package_list is empty"
            );
            return;
        }

        let package_advisories = match (self.loader)(&message.os_release) {
            Ok(Some(advisories)) => advisories,
            Ok(None) => {
                tracing::error!(
                    host_ip = %message.host_ip,
                    os_release = %message.os_release,
                    "unable to start scan: no advisories for OS-release found"
                );
                return;
            }
            Err(error) => {
                tracing::error!(%error, "unable to load package advisories");
                return;
            }
        };

        tracing::debug!(
            package_count = package_advisories.len(),
            "loaded advisories"
        );

        let package_type = package_advisories.package_type();
        let installed: Vec<Package> = message
            .package_list
            .iter()
            .filter_map(|entry| {
                let parsed = Package::from_full_name(package_type, entry);
                if parsed.is_none() {
                    tracing::warn!(entry = %entry, "could not parse installed package entry, dropping");
                }
                parsed
            })
            .collect();

        self.publish(OutboundMessage::Status(ScanStatusMessage::new(
            message.scan_id.clone(),
            message.host_ip.clone(),
            ScanStatus::Running,
        )));

        tracing::info!(
            host_ip = %message.host_ip,
            host_name = %message.host_name,
            "start to identify vulnerable packages"
        );

        let findings = Self::match_installed(&installed, &package_advisories);

        let mut vulnerable_count = 0usize;
        for (oid, entries) in &findings {
            vulnerable_count += entries.len();
            let report = format_report(entries);
            self.publish(OutboundMessage::Result(ResultMessage::new(
                message.scan_id.clone(),
                message.host_ip.clone(),
                message.host_name.clone(),
                oid.clone(),
                report,
            )));
        }

        tracing::info!(
            count = vulnerable_count,
            "total number of vulnerable packages"
        );

        self.publish(OutboundMessage::Status(ScanStatusMessage::new(
            message.scan_id.clone(),
            message.host_ip.clone(),
            ScanStatus::Finished,
        )));
    }

    /// Per-OID AND-of-comparables matching (spec §4.7 step 5): a constraint
    /// that is `NotComparable` for this package contributes nothing; an
    /// OID is only recorded for this package when every comparable
    /// constraint is true and at least one constraint was comparable.
    fn match_installed(installed: &[Package], package_advisories: &PackageAdvisories) -> Findings {
        let mut findings: Findings = BTreeMap::new();

        for package in installed {
            let by_oid = package_advisories.get(package);
            for (oid, constraints) in by_oid {
                let mut matched = Vec::new();
                let mut any_comparable = false;
                let mut rejected = false;

                for constraint in &constraints {
                    match constraint.is_vulnerable(package) {
                        None => continue,
                        Some(true) => {
                            any_comparable = true;
                            matched.push(constraint.clone());
                        }
                        Some(false) => {
                            any_comparable = true;
                            rejected = true;
                            break;
                        }
                    }
                }

                if any_comparable && !rejected && !matched.is_empty() {
                    findings
                        .entry(oid)
                        .or_default()
                        .push((package.clone(), matched));
                }
            }
        }

        findings
    }

    fn publish(&self, message: OutboundMessage) {
        if let Err(error) = self.publisher.publish(&message) {
            tracing::error!(
                %error,
                topic = message.topic(),
                "an error occurred while publishing a message"
            );
        }
    }
}

/// Multi-line report for one OID across every package that triggered it
/// (spec §4.7 step 6), ground-truthed against `scanner.py::_publish_results`'s
/// exact column widths.
fn format_report(entries: &[(Package, Vec<PackageAdvisory>)]) -> String {
    let mut report = String::new();
    for (package, fixed) in entries {
        report.push('\n');
        report.push_str(&format!("{:<22}{}\n", "Vulnerable package:", package.name()));
        report.push_str(&format!(
            "{:<22}{}\n",
            "Installed version:",
            package.full_name()
        ));

        let mut iter = fixed.iter();
        if let Some(first) = iter.next() {
            report.push_str(&format!(
                "{:<20}{:>2}{}\n",
                "Fixed version:",
                first.symbol,
                first.package.full_name()
            ));
        }
        for rest in iter {
            report.push_str(&format!("{:<20}{:>2}{}\n", "", rest.symbol, rest.package.full_name()));
        }
    }
    report
}
