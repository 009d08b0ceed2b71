//! Common bus envelope fields and the message-type-checked parse helper.
//!
//! Ground truth: the (retrieval-filtered) original source keeps the three
//! concrete message classes but not their shared `Message` base; spec §6
//! fully specifies the envelope fields so the base is reconstructed from
//! there: `message_id`, `message_type`, `group_id`, `created`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Discriminates the three bus message classes. Serializes to the exact
/// dotted strings used on the wire (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "scan.start")]
    ScanStart,
    #[serde(rename = "scan.status")]
    ScanStatus,
    #[serde(rename = "result.scan")]
    Result,
}

impl MessageType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScanStart => "scan.start",
            Self::ScanStatus => "scan.status",
            Self::Result => "result.scan",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields common to the envelope of every bus message (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub message_id: Uuid,
    pub message_type: MessageType,
    pub group_id: String,
    pub created: f64,
}

/// Deserialize `bytes` as `T`, rejecting the payload if its `message_type`
/// field disagrees with `expected` -- the class being constructed (spec §6:
/// "Message deserialization MUST reject envelopes whose `message_type`
/// disagrees with the class being constructed").
pub fn parse_checked<T: DeserializeOwned>(bytes: &[u8], expected: MessageType) -> Result<T, Error> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedPayload(e.to_string()))?;

    let actual = value
        .get("message_type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("")
        .to_string();
    if actual != expected.as_str() {
        return Err(Error::TypeMismatch {
            expected: expected.as_str().to_string(),
            actual,
        });
    }

    serde_json::from_value(value).map_err(|e| Error::MalformedPayload(e.to_string()))
}
