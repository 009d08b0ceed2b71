//! Error taxonomy for the config loader (C9).

/// Errors surfaced while resolving a [`crate::Config`] (spec §7).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The TOML file named on the command line could not be read.
    #[error("could not read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// The file was read but is not valid TOML, or its `[notus-scanner]`
    /// table does not match the expected shape.
    #[error("could not parse config file {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// A numeric field (currently only `mqtt-broker-port`) held a value
    /// that overflows its target type, from either the TOML file or an
    /// environment variable override.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}
