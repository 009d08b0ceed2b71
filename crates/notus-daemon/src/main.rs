//! The `notus-scanner` daemon binary: wires configuration, the advisory
//! loader, the signature verifier, the scan driver, and an MQTT transport
//! together and runs forever. Grounded in `daemon.py`'s `run_daemon`/`main`.

mod cli;
mod logging;
mod mqtt;
mod pidfile;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use notus_advisories::{load_package_advisories, PackageAdvisories};
use notus_config::Config;
use notus_messaging::Subscriber;
use notus_scanner::{HostNameCache, HostNameDecision, ScanDriver};
use notus_verify::Verifier;

use cli::Cli;
use mqtt::{MqttPublisher, MqttTransport};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config =
        Config::load(cli.config.as_deref(), &cli.overrides()).context("failed to load configuration")?;

    logging::init_logging(&config.log_level, config.log_file.as_deref(), cli.foreground)?;

    #[cfg(unix)]
    if !cli.foreground {
        daemonize()?;
    }

    if !pidfile::create_pid(&config.pid_file)? {
        std::process::exit(1);
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting notus-scanner");

    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    runtime.block_on(run_daemon(config))
}

/// Fork into the background, exiting the parent, mirroring `go_to_background`'s
/// `os.fork()`. Must run before the tokio runtime (and therefore any
/// additional threads) is built; forking a multi-threaded process only
/// carries the calling thread into the child and is unsound otherwise.
#[cfg(unix)]
fn daemonize() -> anyhow::Result<()> {
    use nix::unistd::{fork, ForkResult};

    // SAFETY: called from a single-threaded process before the tokio
    // runtime is constructed.
    match unsafe { fork() }.context("fork failed")? {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => Ok(()),
    }
}

async fn run_daemon(config: Config) -> anyhow::Result<()> {
    if !config.products_directory.is_dir() {
        anyhow::bail!(
            "can't load advisories, {} is not a directory",
            config.products_directory.display()
        );
    }

    pidfile::spawn_signal_handler(config.pid_file.clone());

    let verifier = Arc::new(if config.disable_hashsum_verification {
        tracing::info!("hashsum verification is disabled");
        Verifier::disabled()
    } else {
        Verifier::new(config.products_directory.join("sha256sums"), &config.gpg_home)
            .context("failed to load the OpenPGP keyring")?
    });

    let products_directory = config.products_directory.clone();
    let loader_verifier = Arc::clone(&verifier);
    let loader = move |os_release: &str| -> Result<Option<PackageAdvisories>, notus_advisories::Error> {
        let sha_sum_file_path = products_directory.join("sha256sums");
        let sums = loader_verifier.reload(|_| {
            Err(notus_verify::Error::InvalidSignature {
                path: sha_sum_file_path.display().to_string(),
                reason: "signature verification failed".to_string(),
            })
        })?;
        load_package_advisories(&products_directory, |path| loader_verifier.verify(path, &sums), os_release)
    };

    let mut transport = MqttTransport::connect(
        &config.mqtt_broker_address,
        config.mqtt_broker_port,
        config.mqtt_broker_username.as_deref(),
        config.mqtt_broker_password.as_deref(),
    )
    .context("failed to construct the MQTT client")?;

    let publisher = MqttPublisher(transport.client.clone());
    let driver = Arc::new(ScanDriver::new(loader, publisher));
    let hostnames = Arc::new(HostNameCache::new(Duration::from_secs(60 * 60)));

    transport
        .subscribe_scan_start(Box::new(move |message| {
            if hostnames.verify(&message) == HostNameDecision::Stop {
                tracing::debug!(
                    scan_id = %message.scan_id,
                    host_name = %message.host_name,
                    "hostname already scanned within the current window, skipping"
                );
                return;
            }
            driver.run_scan(&message);
        }))
        .context("failed to subscribe to the scan.start topic")?;

    // The subscriber loop runs on its own thread; this task just keeps the
    // runtime alive until a signal handler (spawned above) exits the process.
    std::future::pending::<()>().await;
    Ok(())
}
