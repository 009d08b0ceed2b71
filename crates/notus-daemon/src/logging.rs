//! Logging initialization (C11), mirroring `init_logging`'s three-way
//! branch: foreground goes to stderr, `log_file` goes to a file, and
//! neither falls back to stderr (the syslog fallback has no equivalent
//! idiomatic `tracing` sink in this dependency stack).

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the global `tracing` subscriber from a resolved log level
/// and the foreground/log-file choice (spec §4.12).
pub fn init_logging(log_level: &str, log_file: Option<&Path>, foreground: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(log_level.to_lowercase())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if foreground {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return Ok(());
    }

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
