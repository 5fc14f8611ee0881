use crate::conf::load_spec_config;
use crate::proxy::pid::signal_pid_file;
use anyhow::{Context, Result};
use nix::sys::signal::Signal;
use std::path::Path;

/// Send SIGHUP to a running `switchyard run` supervisor via its pid file.
pub fn reload<P: AsRef<Path>>(config: P) -> Result<()> {
    let spec = load_spec_config(config.as_ref())?;

    let pid_file = spec
        .server
        .pid_file
        .context("server.pid_file is not set; cannot find the supervisor")?;

    let pid = signal_pid_file(&pid_file, Signal::SIGHUP)
        .with_context(|| format!("failed to reload supervisor via {}", pid_file.display()))?;

    println!("Sent SIGHUP to switchyard (pid {pid})");

    Ok(())
}
