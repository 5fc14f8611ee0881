//! Pid-file plumbing for the proxy master process.

use crate::proxy::ProxyError;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use std::fs;
use std::path::Path;

/// Read a pid written by the proxy.
pub fn read_pid(path: &Path) -> Result<Pid, ProxyError> {
    let contents = fs::read_to_string(path).map_err(|source| ProxyError::ReadPid {
        path: path.to_path_buf(),
        source,
    })?;

    match contents.trim().parse::<i32>() {
        Ok(raw) if raw > 0 => Ok(Pid::from_raw(raw)),
        _ => Err(ProxyError::InvalidPid {
            path: path.to_path_buf(),
            contents: contents.trim().to_string(),
        }),
    }
}

/// Whether a process with this pid exists and can be signalled.
pub fn is_alive(pid: Pid) -> bool {
    kill(pid, None).is_ok()
}

pub fn send_signal(pid: Pid, signal: Signal) -> Result<(), ProxyError> {
    kill(pid, signal).map_err(|source| ProxyError::Signal {
        signal,
        pid: pid.as_raw(),
        source,
    })
}

/// Send `signal` to the process named by a pid file.
///
/// A pid file whose process is gone is reported as stale rather than
/// signalled.
pub fn signal_pid_file(path: &Path, signal: Signal) -> Result<Pid, ProxyError> {
    let pid = read_pid(path)?;
    if !is_alive(pid) {
        return Err(ProxyError::StalePid {
            path: path.to_path_buf(),
            pid: pid.as_raw(),
        });
    }
    send_signal(pid, signal)?;

    tracing::debug!(pid = pid.as_raw(), %signal, pid_file = %path.display(), "signal sent");
    Ok(pid)
}
