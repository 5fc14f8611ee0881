use nix::sys::signal::Signal;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to read pid file {path}")]
    ReadPid {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pid file contents in {path}: '{contents}'")]
    InvalidPid { path: PathBuf, contents: String },

    #[error("stale pid file {path}: no process with pid {pid} is running")]
    StalePid { path: PathBuf, pid: i32 },

    #[error("failed to send {signal} to pid {pid}")]
    Signal {
        signal: Signal,
        pid: i32,
        #[source]
        source: nix::Error,
    },

    #[error("failed to run {binary}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{binary} rejected the configuration ({status}): {output}")]
    CheckRejected {
        binary: PathBuf,
        status: String,
        output: String,
    },
}
