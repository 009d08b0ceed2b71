//! Error taxonomy for bus message (de)serialization.

/// Raised at the subscriber boundary for a malformed envelope or an
/// invalid enum value on the bus (spec §7). Logged and dropped by
/// subscribers; never propagated into the scan driver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed message payload: {0}")]
    MalformedPayload(String),

    #[error("message_type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
}
