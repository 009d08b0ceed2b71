//! Command-line surface (C10), mirrored from
//! `tests/cli/test_cli_parser.py`'s option set.

use std::path::PathBuf;

use clap::Parser;
use notus_config::CliOverrides;

/// `notus-scanner`: matches installed packages against vendor advisories
/// and publishes findings over MQTT.
#[derive(Parser, Debug)]
#[command(name = "notus-scanner", version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file with a `[notus-scanner]` table.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run in the foreground instead of forking into the background.
    #[arg(long, short = 'f')]
    pub foreground: bool,

    /// Directory containing per-OS `.notus` advisory files.
    #[arg(long, value_name = "DIR")]
    pub products_directory: Option<PathBuf>,

    /// MQTT broker hostname or address.
    #[arg(long, short = 'b', value_name = "ADDRESS")]
    pub mqtt_broker_address: Option<String>,

    /// MQTT broker port.
    #[arg(long, short = 'p', value_name = "PORT")]
    pub mqtt_broker_port: Option<u16>,

    /// MQTT broker username, if authentication is required.
    #[arg(long, value_name = "USERNAME")]
    pub mqtt_broker_username: Option<String>,

    /// MQTT broker password, if authentication is required.
    #[arg(long, value_name = "PASSWORD")]
    pub mqtt_broker_password: Option<String>,

    /// Path to write the daemon's PID file.
    #[arg(long, value_name = "PATH")]
    pub pid_file: Option<PathBuf>,

    /// Write logs to this file instead of stderr.
    #[arg(long, short = 'l', value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log level (case-insensitive; normalized to upper case).
    #[arg(long, short = 'L', value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Skip OpenPGP verification of the advisory signature manifest.
    #[arg(long, value_name = "BOOL")]
    pub disable_hashsum_verification: Option<bool>,

    /// Directory holding the OpenPGP keyring used for verification.
    #[arg(long, value_name = "PATH")]
    pub gpg_home: Option<PathBuf>,
}

impl Cli {
    /// Translate the parsed flags into the config loader's override set
    /// (spec §4.11: CLI flags take precedence over env var and file).
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            products_directory: self.products_directory.clone(),
            log_file: self.log_file.clone(),
            log_level: self.log_level.clone(),
            mqtt_broker_address: self.mqtt_broker_address.clone(),
            mqtt_broker_port: self.mqtt_broker_port,
            mqtt_broker_username: self.mqtt_broker_username.clone(),
            mqtt_broker_password: self.mqtt_broker_password.clone(),
            pid_file: self.pid_file.clone(),
            disable_hashsum_verification: self.disable_hashsum_verification,
            gpg_home: self.gpg_home.clone(),
        }
    }
}
