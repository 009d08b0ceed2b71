//! Concrete bus message classes (spec §3/§6): scan start, scan status, and
//! result messages. Each wraps [`EnvelopeMeta`] and knows its own topic and
//! [`MessageType`], mirroring `messages/start.py` / `status.py` / `result.py`.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::envelope::{parse_checked, EnvelopeMeta, MessageType};
use crate::error::Error;

fn now_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

fn new_meta(message_type: MessageType, group_id: Option<String>) -> EnvelopeMeta {
    EnvelopeMeta {
        message_id: Uuid::new_v4(),
        message_type,
        group_id: group_id.unwrap_or_default(),
        created: now_seconds(),
    }
}

/// `scan.start` on topic `scanner/package/cmd/notus` (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStartMessage {
    #[serde(flatten)]
    pub meta: EnvelopeMeta,
    pub scan_id: String,
    pub host_ip: String,
    pub host_name: String,
    pub os_release: String,
    pub package_list: Vec<String>,
}

impl ScanStartMessage {
    pub const TOPIC: &'static str = "scanner/package/cmd/notus";

    #[must_use]
    pub fn new(
        scan_id: impl Into<String>,
        host_ip: impl Into<String>,
        host_name: impl Into<String>,
        os_release: impl Into<String>,
        package_list: Vec<String>,
    ) -> Self {
        Self {
            meta: new_meta(MessageType::ScanStart, None),
            scan_id: scan_id.into(),
            host_ip: host_ip.into(),
            host_name: host_name.into(),
            os_release: os_release.into(),
            package_list,
        }
    }

    /// Parse and reject payloads whose `message_type` isn't `scan.start`.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        parse_checked(bytes, MessageType::ScanStart)
    }
}

/// Scan status enumeration (spec §4.9/§6). The core only ever emits
/// `Running` and `Finished`; the rest exist for forward compatibility and
/// must still serialize correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Requested,
    Queued,
    Init,
    Running,
    Stopping,
    Stopped,
    Finished,
    Interrupted,
}

/// `scan.status` on topic `scanner/status` (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStatusMessage {
    #[serde(flatten)]
    pub meta: EnvelopeMeta,
    pub scan_id: String,
    pub host_ip: String,
    pub status: ScanStatus,
}

impl ScanStatusMessage {
    pub const TOPIC: &'static str = "scanner/status";

    #[must_use]
    pub fn new(scan_id: impl Into<String>, host_ip: impl Into<String>, status: ScanStatus) -> Self {
        Self {
            meta: new_meta(MessageType::ScanStatus, None),
            scan_id: scan_id.into(),
            host_ip: host_ip.into(),
            status,
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        parse_checked(bytes, MessageType::ScanStatus)
    }
}

/// Always `ALARM` on the wire (spec §3/§6); kept as an enum rather than a
/// bare constant so the wire value stays explicit in the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultType {
    #[serde(rename = "ALARM")]
    Alarm,
}

/// `result.scan` on topic `scanner/scan/info` (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMessage {
    #[serde(flatten)]
    pub meta: EnvelopeMeta,
    pub scan_id: String,
    pub host_ip: String,
    pub host_name: String,
    pub oid: String,
    pub value: String,
    pub port: String,
    pub uri: String,
    pub result_type: ResultType,
}

impl ResultMessage {
    pub const TOPIC: &'static str = "scanner/scan/info";

    #[must_use]
    pub fn new(
        scan_id: impl Into<String>,
        host_ip: impl Into<String>,
        host_name: impl Into<String>,
        oid: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            meta: new_meta(MessageType::Result, None),
            scan_id: scan_id.into(),
            host_ip: host_ip.into(),
            host_name: host_name.into(),
            oid: oid.into(),
            value: value.into(),
            port: "package".to_string(),
            uri: String::new(),
            result_type: ResultType::Alarm,
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        parse_checked(bytes, MessageType::Result)
    }
}

/// Sum of every outbound message the scan driver publishes; lets a single
/// [`crate::Publisher`] implementation handle all three without generics.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    Status(ScanStatusMessage),
    Result(ResultMessage),
}

impl OutboundMessage {
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Status(_) => ScanStatusMessage::TOPIC,
            Self::Result(_) => ResultMessage::TOPIC,
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        let value = match self {
            Self::Status(m) => serde_json::to_string(m),
            Self::Result(m) => serde_json::to_string(m),
        };
        value.map_err(|e| Error::MalformedPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_start_round_trips_through_json() {
        let msg = ScanStartMessage::new(
            "scan-1",
            "10.0.0.1",
            "host",
            "EulerOS V2.0SP1",
            vec!["openssh-6.6.1p1-25.4.h3.x86_64".to_string()],
        );
        let json = serde_json::to_string(&msg).unwrap();
        let parsed = ScanStartMessage::parse(json.as_bytes()).unwrap();
        assert_eq!(parsed.scan_id, "scan-1");
        assert_eq!(parsed.package_list.len(), 1);
    }

    #[test]
    fn mismatched_message_type_is_rejected() {
        let msg = ScanStatusMessage::new("scan-1", "10.0.0.1", ScanStatus::Running);
        let json = serde_json::to_string(&msg).unwrap();
        let err = ScanStartMessage::parse(json.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn status_serializes_to_lowercase_wire_values() {
        let msg = ScanStatusMessage::new("scan-1", "10.0.0.1", ScanStatus::Running);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["status"], "running");
    }

    #[test]
    fn result_message_has_fixed_port_and_result_type() {
        let msg = ResultMessage::new("scan-1", "10.0.0.1", "host", "1.2.3", "report text");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["port"], "package");
        assert_eq!(json["uri"], "");
        assert_eq!(json["result_type"], "ALARM");
    }

    #[test]
    fn outbound_message_topics_match_spec() {
        let status = OutboundMessage::Status(ScanStatusMessage::new(
            "scan-1",
            "10.0.0.1",
            ScanStatus::Finished,
        ));
        assert_eq!(status.topic(), "scanner/status");

        let result = OutboundMessage::Result(ResultMessage::new(
            "scan-1", "10.0.0.1", "host", "1.2.3", "report",
        ));
        assert_eq!(result.topic(), "scanner/scan/info");
    }
}
