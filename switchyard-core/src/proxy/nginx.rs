use crate::conf::types::ProxyConfig;
use crate::proxy::pid::{is_alive, read_pid, signal_pid_file};
use crate::proxy::{ProxyControl, ProxyError, ProxyProcess};
use nix::sys::signal::Signal;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Controls a locally installed nginx binary.
#[derive(Debug, Clone)]
pub struct NginxProxy {
    binary: PathBuf,
    pid_file: PathBuf,
    prefix: Option<PathBuf>,
}

impl NginxProxy {
    pub fn new(binary: impl Into<PathBuf>, pid_file: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            pid_file: pid_file.into(),
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: Option<PathBuf>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn from_config(proxy: &ProxyConfig) -> Self {
        Self::new(&proxy.binary, &proxy.pid_file).with_prefix(proxy.prefix.clone())
    }

    fn command(&self, config: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        if let Some(prefix) = &self.prefix {
            cmd.arg("-p").arg(prefix);
        }
        cmd.arg("-c").arg(config);
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> ProxyError {
        ProxyError::Spawn {
            binary: self.binary.clone(),
            source,
        }
    }
}

impl ProxyControl for NginxProxy {
    fn check(&self, config: &Path) -> Result<(), ProxyError> {
        let output = self
            .command(config)
            .arg("-t")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if output.status.success() {
            return Ok(());
        }

        // nginx reports check results on stderr
        let mut text = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if text.is_empty() {
            text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        }

        Err(ProxyError::CheckRejected {
            binary: self.binary.clone(),
            status: output.status.to_string(),
            output: text,
        })
    }

    fn reload(&self) -> Result<u32, ProxyError> {
        let pid = signal_pid_file(&self.pid_file, Signal::SIGHUP)?;
        Ok(pid.as_raw() as u32)
    }

    fn launch(&self, config: &Path) -> Result<ProxyProcess, ProxyError> {
        let child = self
            .command(config)
            .arg("-g")
            .arg("daemon off;")
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        tracing::info!(pid = child.id(), binary = %self.binary.display(), "nginx started");
        Ok(ProxyProcess::spawned(child))
    }

    fn running_pid(&self) -> Option<u32> {
        let pid = read_pid(&self.pid_file).ok()?;
        is_alive(pid).then(|| pid.as_raw() as u32)
    }
}
