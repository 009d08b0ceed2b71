//! Config loader (C9): environment variable overrides TOML file overrides
//! built-in default, field by field. Grounded in
//! `original_source/notus/scanner/config.py`'s `_CONFIG` tuple and its
//! `values()` precedence walk.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

const DEFAULT_PRODUCTS_DIRECTORY: &str = "/var/lib/notus/products";
const DEFAULT_LOG_LEVEL: &str = "INFO";
const DEFAULT_MQTT_BROKER_ADDRESS: &str = "localhost";
const DEFAULT_MQTT_BROKER_PORT: u16 = 1883;
const DEFAULT_PID_FILE: &str = "/run/notus-scanner/notus-scanner.pid";
const DEFAULT_GPG_HOME_SUFFIX: &str = ".gnupg";

/// The `[notus-scanner]` table as it appears on disk. Every field is
/// optional: a key absent from the file simply falls through to the next
/// precedence level.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawConfig {
    #[serde(rename = "products-directory")]
    products_directory: Option<String>,
    #[serde(rename = "log-file")]
    log_file: Option<String>,
    #[serde(rename = "log-level")]
    log_level: Option<String>,
    #[serde(rename = "mqtt-broker-address")]
    mqtt_broker_address: Option<String>,
    #[serde(rename = "mqtt-broker-port")]
    mqtt_broker_port: Option<i64>,
    #[serde(rename = "mqtt-broker-username")]
    mqtt_broker_username: Option<String>,
    #[serde(rename = "mqtt-broker-password")]
    mqtt_broker_password: Option<String>,
    #[serde(rename = "pid-file")]
    pid_file: Option<String>,
    #[serde(rename = "disable-hashsum-verification")]
    disable_hashsum_verification: Option<bool>,
    #[serde(rename = "gpg-home")]
    gpg_home: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawDocument {
    #[serde(rename = "notus-scanner", default)]
    notus_scanner: RawConfig,
}

/// Overrides supplied on the command line (C10), taken as highest
/// precedence above even the environment (spec §4.11: CLI flags override
/// everything they name).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub products_directory: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub mqtt_broker_address: Option<String>,
    pub mqtt_broker_port: Option<u16>,
    pub mqtt_broker_username: Option<String>,
    pub mqtt_broker_password: Option<String>,
    pub pid_file: Option<PathBuf>,
    pub disable_hashsum_verification: Option<bool>,
    pub gpg_home: Option<PathBuf>,
}

/// Fully resolved configuration (spec §4.10).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub products_directory: PathBuf,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    pub mqtt_broker_address: String,
    pub mqtt_broker_port: u16,
    pub mqtt_broker_username: Option<String>,
    pub mqtt_broker_password: Option<String>,
    pub pid_file: PathBuf,
    pub disable_hashsum_verification: bool,
    pub gpg_home: PathBuf,
}

fn default_gpg_home() -> PathBuf {
    env::var("HOME")
        .map(|home| Path::new(&home).join(DEFAULT_GPG_HOME_SUFFIX))
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_GPG_HOME_SUFFIX))
}

fn parse_port(key: &str, raw: &str) -> Result<u16, Error> {
    raw.parse::<u16>().map_err(|e| Error::InvalidValue {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, Error> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::InvalidValue {
            key: key.to_string(),
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}

/// Resolve one `Option<String>`-valued field across CLI override, env var,
/// TOML value, and default, in that precedence order.
fn resolve_string(
    cli: Option<String>,
    env_key: &str,
    file: Option<String>,
    default: &str,
) -> String {
    cli.or_else(|| env::var(env_key).ok())
        .or(file)
        .unwrap_or_else(|| default.to_string())
}

fn resolve_optional_string(
    cli: Option<String>,
    env_key: &str,
    file: Option<String>,
) -> Option<String> {
    cli.or_else(|| env::var(env_key).ok()).or(file)
}

impl Config {
    /// Resolve the full configuration. `config_path` is the `--config`
    /// CLI flag (C10); `overrides` are every other CLI flag, which take
    /// precedence over both the environment and the file.
    pub fn load(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Self, Error> {
        let raw = match config_path {
            Some(path) => Self::read_raw(path)?,
            None => RawConfig::default(),
        };

        let products_directory = overrides
            .products_directory
            .clone()
            .map(|p| p.to_string_lossy().into_owned())
            .or_else(|| env::var("NOTUS_SCANNER_PRODUCTS_DIRECTORY").ok())
            .or(raw.products_directory)
            .unwrap_or_else(|| DEFAULT_PRODUCTS_DIRECTORY.to_string());

        let log_file = overrides
            .log_file
            .clone()
            .map(|p| p.to_string_lossy().into_owned())
            .or_else(|| env::var("NOTUS_SCANNER_LOG_FILE").ok())
            .or(raw.log_file);

        let log_level = overrides
            .log_level
            .clone()
            .unwrap_or_else(|| {
                resolve_string(None, "NOTUS_SCANNER_LOG_LEVEL", raw.log_level, DEFAULT_LOG_LEVEL)
            })
            .to_uppercase();

        let mqtt_broker_address = overrides.mqtt_broker_address.clone().unwrap_or_else(|| {
            resolve_string(
                None,
                "NOTUS_SCANNER_MQTT_BROKER_ADDRESS",
                raw.mqtt_broker_address,
                DEFAULT_MQTT_BROKER_ADDRESS,
            )
        });

        let mqtt_broker_port = if let Some(port) = overrides.mqtt_broker_port {
            port
        } else if let Ok(raw_env) = env::var("NOTUS_SCANNER_MQTT_BROKER_PORT") {
            parse_port("mqtt-broker-port", &raw_env)?
        } else if let Some(raw_file) = raw.mqtt_broker_port {
            u16::try_from(raw_file).map_err(|_| Error::InvalidValue {
                key: "mqtt-broker-port".to_string(),
                reason: format!("{raw_file} does not fit in a u16"),
            })?
        } else {
            DEFAULT_MQTT_BROKER_PORT
        };

        let mqtt_broker_username = resolve_optional_string(
            overrides.mqtt_broker_username.clone(),
            "NOTUS_SCANNER_MQTT_BROKER_USERNAME",
            raw.mqtt_broker_username,
        );
        let mqtt_broker_password = resolve_optional_string(
            overrides.mqtt_broker_password.clone(),
            "NOTUS_SCANNER_MQTT_BROKER_PASSWORD",
            raw.mqtt_broker_password,
        );

        let pid_file = overrides
            .pid_file
            .clone()
            .map(|p| p.to_string_lossy().into_owned())
            .or_else(|| env::var("NOTUS_SCANNER_PID_FILE").ok())
            .or(raw.pid_file)
            .unwrap_or_else(|| DEFAULT_PID_FILE.to_string());

        let disable_hashsum_verification = if let Some(flag) = overrides.disable_hashsum_verification {
            flag
        } else if let Ok(raw_env) = env::var("NOTUS_DISABLE_HASHSUM_VERIFICATION") {
            parse_bool("disable-hashsum-verification", &raw_env)?
        } else {
            raw.disable_hashsum_verification.unwrap_or(false)
        };

        let gpg_home = overrides
            .gpg_home
            .clone()
            .or_else(|| env::var("GPG_HOME").ok().map(PathBuf::from))
            .or_else(|| raw.gpg_home.map(PathBuf::from))
            .unwrap_or_else(default_gpg_home);

        Ok(Self {
            products_directory: PathBuf::from(products_directory),
            log_file: log_file.map(PathBuf::from),
            log_level,
            mqtt_broker_address,
            mqtt_broker_port,
            mqtt_broker_username,
            mqtt_broker_password,
            pid_file: PathBuf::from(pid_file),
            disable_hashsum_verification,
            gpg_home,
        })
    }

    fn read_raw(path: &Path) -> Result<RawConfig, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let document: RawDocument = toml::from_str(&content).map_err(|e| Error::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(document.notus_scanner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::load(None, &CliOverrides::default()).unwrap();
        assert_eq!(config.products_directory, PathBuf::from(DEFAULT_PRODUCTS_DIRECTORY));
        assert_eq!(config.log_level, "INFO");
        assert_eq!(config.mqtt_broker_address, "localhost");
        assert_eq!(config.mqtt_broker_port, 1883);
        assert_eq!(config.pid_file, PathBuf::from(DEFAULT_PID_FILE));
        assert!(!config.disable_hashsum_verification);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notus-scanner.toml");
        std::fs::write(
            &path,
            r#"
            [notus-scanner]
            products-directory = "/opt/notus/products"
            log-level = "debug"
            mqtt-broker-port = 8883
            "#,
        )
        .unwrap();

        let config = Config::load(Some(&path), &CliOverrides::default()).unwrap();
        assert_eq!(config.products_directory, PathBuf::from("/opt/notus/products"));
        assert_eq!(config.log_level, "DEBUG");
        assert_eq!(config.mqtt_broker_port, 8883);
        assert_eq!(config.mqtt_broker_address, "localhost", "unset keys keep their default");
    }

    #[test]
    fn env_var_overrides_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notus-scanner.toml");
        std::fs::write(
            &path,
            r#"
            [notus-scanner]
            log-level = "debug"
            "#,
        )
        .unwrap();

        // SAFETY (test-only): no other test in this process reads this key
        // concurrently; `cargo test` runs each crate's tests in one process
        // but environment mutation here is confined to this single check.
        unsafe {
            env::set_var("NOTUS_SCANNER_LOG_LEVEL", "trace");
        }
        let config = Config::load(Some(&path), &CliOverrides::default()).unwrap();
        unsafe {
            env::remove_var("NOTUS_SCANNER_LOG_LEVEL");
        }
        assert_eq!(config.log_level, "TRACE");
    }

    #[test]
    fn cli_override_beats_everything() {
        let overrides = CliOverrides {
            log_level: Some("warn".to_string()),
            ..CliOverrides::default()
        };
        // SAFETY: see note above.
        unsafe {
            env::set_var("NOTUS_SCANNER_LOG_LEVEL", "trace");
        }
        let config = Config::load(None, &overrides).unwrap();
        unsafe {
            env::remove_var("NOTUS_SCANNER_LOG_LEVEL");
        }
        assert_eq!(config.log_level, "WARN");
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let err = Config::load(Some(Path::new("/no/such/file.toml")), &CliOverrides::default())
            .unwrap_err();
        assert!(matches!(err, Error::Unreadable { .. }));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        let err = Config::load(Some(&path), &CliOverrides::default()).unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }

    #[test]
    fn out_of_range_port_env_var_is_an_invalid_value_error() {
        // SAFETY: see note above.
        unsafe {
            env::set_var("NOTUS_SCANNER_MQTT_BROKER_PORT", "999999");
        }
        let err = Config::load(None, &CliOverrides::default()).unwrap_err();
        unsafe {
            env::remove_var("NOTUS_SCANNER_MQTT_BROKER_PORT");
        }
        assert!(matches!(err, Error::InvalidValue { .. }));
    }
}
