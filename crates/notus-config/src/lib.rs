//! TOML + environment variable config loader (C9) for the Notus advisory
//! matching engine, grounded in `original_source/notus/scanner/config.py`.

mod config;
mod error;

pub use config::{CliOverrides, Config};
pub use error::Error;
