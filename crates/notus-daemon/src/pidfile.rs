//! PID file lifecycle (C11): stale-PID detection plus SIGTERM/SIGINT
//! cleanup. Grounded in `utils.py`'s `create_pid`/`exit_cleanup`/
//! `init_signal_handler`, with `psutil.Process.name()` comparison
//! re-expressed via `sysinfo`.

use std::fs;
use std::path::{Path, PathBuf};

use sysinfo::{Pid, System};

/// Attempt to claim `pid_file` for the current process.
///
/// Returns `true` (and writes the file) unless an existing pid file names
/// a still-running process with the same executable name, in which case
/// the daemon must not start a second copy of itself.
pub fn create_pid(pid_file: &Path) -> std::io::Result<bool> {
    let current_pid = std::process::id();
    let mut system = System::new_all();
    system.refresh_all();
    let current_name = process_name(&system, current_pid);

    if let Ok(existing) = fs::read_to_string(pid_file) {
        if let Ok(recorded_pid) = existing.trim().parse::<u32>() {
            if let Some(recorded_name) = process_name(&system, recorded_pid) {
                if Some(recorded_name.as_str()) == current_name.as_deref() {
                    tracing::error!(
                        path = %pid_file.display(),
                        "there is an already running process"
                    );
                    return Ok(false);
                }
            }
            tracing::debug!(
                pid = recorded_pid,
                "stale pid file found, the recorded process is gone; overwriting"
            );
        }
    }

    fs::write(pid_file, current_pid.to_string())?;
    Ok(true)
}

fn process_name(system: &System, pid: u32) -> Option<String> {
    system
        .process(Pid::from_u32(pid))
        .map(|process| process.name().to_string_lossy().into_owned())
}

/// Remove `pid_file` if (and only if) it still names this process, mirroring
/// `exit_cleanup`'s guard against a second daemon's signal handler deleting
/// the wrong file.
pub fn remove_pid(pid_file: &Path) {
    let Ok(existing) = fs::read_to_string(pid_file) else {
        return;
    };
    let Ok(recorded_pid) = existing.trim().parse::<u32>() else {
        return;
    };
    if recorded_pid == std::process::id() {
        if let Err(error) = fs::remove_file(pid_file) {
            tracing::warn!(%error, path = %pid_file.display(), "failed to remove pid file");
        }
    }
}

/// Register SIGTERM/SIGINT handlers that remove `pid_file` and exit,
/// mirroring `init_signal_handler`. Spawns a background task on the
/// current tokio runtime; the caller's `main` should hold its own handle
/// for a graceful await point, but this removes the pid file even if
/// nothing else is listening for the signal.
pub fn spawn_signal_handler(pid_file: PathBuf) {
    tokio::spawn(async move {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(s) => s,
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                return;
            }
        };
        tokio::select! {
            _ = sigterm.recv() => {
                tracing::debug!("received SIGTERM, finishing daemon process");
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("received SIGINT, finishing daemon process");
            }
        }
        remove_pid(&pid_file);
        std::process::exit(0);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_pid_writes_the_current_pid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notus-scanner.pid");
        assert!(create_pid(&path).unwrap());
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim(), std::process::id().to_string());
    }

    #[test]
    fn stale_pid_referring_to_a_dead_process_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notus-scanner.pid");
        // A pid essentially guaranteed not to be a running process with our
        // executable's name.
        fs::write(&path, "1").unwrap();
        assert!(create_pid(&path).unwrap());
    }

    #[test]
    fn remove_pid_only_deletes_a_file_naming_this_process() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notus-scanner.pid");
        fs::write(&path, "999999").unwrap();
        remove_pid(&path);
        assert!(path.is_file(), "pid file naming another process must survive");

        fs::write(&path, std::process::id().to_string()).unwrap();
        remove_pid(&path);
        assert!(!path.is_file());
    }
}
