//! Declared configuration, exactly as written in `switchyard.hcl`.

use crate::failover::FailureSignal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Represents the top-level configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SwitchyardSpec {
    pub server: ServerConfig,

    /// Pool that should be primary after the next activation.
    pub active_pool: String,

    pub pools: PoolsConfig,
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub failover: FailoverConfig,

    #[serde(default)]
    pub headers: HeadersConfig,

    #[serde(default = "default_health_path")]
    pub health_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub version: u32,

    /// Optional pid file for the `run` supervisor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid_file: Option<PathBuf>,
}

/// The two pools. Any other key is rejected at parse time.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PoolsConfig {
    pub blue: PoolConfig,
    pub green: PoolConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolConfig {
    pub host: String,
    pub port: u16,
    pub release_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    /// Live artifact read by nginx.
    pub config_path: PathBuf,

    /// Pid file nginx writes; reload signals are sent to this pid.
    pub pid_file: PathBuf,

    /// Passed to nginx as `-p` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<PathBuf>,

    /// Directory for nginx temp paths, for unprivileged runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_dir: Option<PathBuf>,

    #[serde(default = "default_listen")]
    pub listen: u16,

    #[serde(default = "default_upstream_name")]
    pub upstream_name: String,

    #[serde(default = "default_worker_processes")]
    pub worker_processes: String,

    #[serde(default = "default_worker_connections")]
    pub worker_connections: u32,

    #[serde(default = "default_error_log")]
    pub error_log: String,

    /// `off` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_log: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FailoverConfig {
    pub connect_timeout_secs: u64,
    pub send_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub max_fails: u32,
    pub fail_timeout_secs: u64,
    pub tries: u32,
    pub retry_on: Vec<FailureSignal>,
    pub retry_non_idempotent: bool,
    pub keepalive: u32,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 2,
            send_timeout_secs: 3,
            read_timeout_secs: 3,
            max_fails: 1,
            fail_timeout_secs: 5,
            tries: 2,
            retry_on: FailureSignal::DEFAULT.to_vec(),
            retry_non_idempotent: false,
            keepalive: 32,
        }
    }
}

/// Response headers used to tell which pool served a request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeadersConfig {
    pub pool: String,
    pub release: String,
    pub proxy_marker: String,
    pub proxy_marker_value: String,
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            pool: "X-App-Pool".to_string(),
            release: "X-Release-Id".to_string(),
            proxy_marker: "X-Proxy".to_string(),
            proxy_marker_value: "switchyard".to_string(),
        }
    }
}

fn default_health_path() -> String {
    "/healthz".to_string()
}

fn default_binary() -> PathBuf {
    PathBuf::from("nginx")
}

fn default_listen() -> u16 {
    80
}

fn default_upstream_name() -> String {
    "app_pool".to_string()
}

fn default_worker_processes() -> String {
    "auto".to_string()
}

fn default_worker_connections() -> u32 {
    1024
}

fn default_error_log() -> String {
    "stderr warn".to_string()
}
