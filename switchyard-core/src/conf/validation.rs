//! Semantic validation of declared configuration.
//!
//! Serde handles syntax; these checks aggregate every semantic problem so an
//! operator sees the full list at once. Pool addresses (host and port) are
//! left to the activation lint, so a malformed entry fails its activation
//! instead of the whole config load.

use crate::conf::error::ConfigError;
use crate::conf::types::{FailoverConfig, HeadersConfig, PoolsConfig, ProxyConfig, SwitchyardSpec};
use crate::pool::PoolLabel;
use crate::render::{is_bare_word, is_directive_args};
use http::{HeaderName, HeaderValue};
use std::fmt;
use std::ops::RangeInclusive;

const TIMEOUT_SECS: RangeInclusive<u64> = 1..=9;
const TRIES: RangeInclusive<u32> = 2..=5;

#[derive(Default)]
pub struct ValidationCtx {
    errors: Vec<ConfigError>,
}

impl ValidationCtx {
    pub fn push(&mut self, err: ConfigError) {
        self.errors.push(err);
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

#[derive(Debug)]
pub struct ValidationErrors(pub Vec<ConfigError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configuration validation failed ({} errors)", self.0.len())?;
        for err in &self.0 {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate everything that exists in a parsed config.
pub fn validate_spec(spec: &SwitchyardSpec) -> Result<(), ValidationErrors> {
    let mut ctx = ValidationCtx::default();

    if let Err(e) = validate_version(spec.server.version) {
        ctx.push(e);
    }

    if spec.active_pool.parse::<PoolLabel>().is_err() {
        ctx.push(ConfigError::InvalidActivePool {
            value: spec.active_pool.clone(),
        });
    }

    if !spec.health_path.starts_with('/') || !is_bare_word(&spec.health_path) {
        ctx.push(ConfigError::InvalidHealthPath {
            path: spec.health_path.clone(),
        });
    }

    validate_pools(&spec.pools, &mut ctx);
    validate_proxy(&spec.proxy, &mut ctx);
    validate_failover(&spec.failover, &mut ctx);
    validate_headers(&spec.headers, &mut ctx);

    ctx.into_result()
}

/// Validate top-level config version.
///
/// Fail-fast: invalid versions invalidate the entire config model.
pub fn validate_version(version: u32) -> Result<(), ConfigError> {
    if version == 1 {
        Ok(())
    } else {
        Err(ConfigError::InvalidVersion { version })
    }
}

pub fn validate_pools(pools: &PoolsConfig, ctx: &mut ValidationCtx) {
    for (label, pool) in [(PoolLabel::Blue, &pools.blue), (PoolLabel::Green, &pools.green)] {
        if pool.release_id.trim().is_empty() {
            ctx.push(ConfigError::EmptyReleaseId {
                pool: label.to_string(),
            });
        }
    }

    if pools.blue.host == pools.green.host && pools.blue.port == pools.green.port {
        ctx.push(ConfigError::DuplicatePoolAddress {
            address: format!("{}:{}", pools.blue.host, pools.blue.port),
        });
    }
}

pub fn validate_proxy(proxy: &ProxyConfig, ctx: &mut ValidationCtx) {
    if proxy.listen == 0 {
        ctx.push(ConfigError::InvalidListenPort);
    }

    if !is_bare_word(&proxy.upstream_name) {
        ctx.push(ConfigError::InvalidUpstreamName {
            name: proxy.upstream_name.clone(),
            reason: "must be a single word without separators".into(),
        });
    }

    if !is_bare_word(&proxy.worker_processes) {
        ctx.push(ConfigError::InvalidProxySetting {
            setting: "worker_processes".into(),
            reason: format!("'{}' is not a single word", proxy.worker_processes),
        });
    }

    if proxy.worker_connections == 0 {
        ctx.push(ConfigError::InvalidProxySetting {
            setting: "worker_connections".into(),
            reason: "must be non-zero".into(),
        });
    }

    if !is_directive_args(&proxy.error_log) {
        ctx.push(ConfigError::InvalidProxySetting {
            setting: "error_log".into(),
            reason: format!("'{}' contains characters nginx would misparse", proxy.error_log),
        });
    }

    if let Some(access_log) = &proxy.access_log {
        if !is_directive_args(access_log) {
            ctx.push(ConfigError::InvalidProxySetting {
                setting: "access_log".into(),
                reason: format!("'{access_log}' contains characters nginx would misparse"),
            });
        }
    }

    for (setting, path) in [
        ("pid_file", Some(&proxy.pid_file)),
        ("runtime_dir", proxy.runtime_dir.as_ref()),
    ] {
        if let Some(path) = path {
            if !is_bare_word(&path.to_string_lossy()) {
                ctx.push(ConfigError::InvalidProxySetting {
                    setting: setting.into(),
                    reason: format!(
                        "'{}' must not contain whitespace or separators",
                        path.display()
                    ),
                });
            }
        }
    }

    if proxy.config_path.file_name().is_none() {
        ctx.push(ConfigError::InvalidProxySetting {
            setting: "config_path".into(),
            reason: format!("'{}' does not name a file", proxy.config_path.display()),
        });
    }
}

pub fn validate_failover(failover: &FailoverConfig, ctx: &mut ValidationCtx) {
    for (name, secs) in [
        ("connect_timeout_secs", failover.connect_timeout_secs),
        ("send_timeout_secs", failover.send_timeout_secs),
        ("read_timeout_secs", failover.read_timeout_secs),
    ] {
        if !TIMEOUT_SECS.contains(&secs) {
            ctx.push(ConfigError::InvalidTimeout {
                name: name.into(),
                secs,
            });
        }
    }

    if !TRIES.contains(&failover.tries) {
        ctx.push(ConfigError::InvalidTries {
            tries: failover.tries,
        });
    }

    if failover.max_fails == 0 {
        ctx.push(ConfigError::InvalidMaxFails);
    }

    if failover.fail_timeout_secs == 0 {
        ctx.push(ConfigError::InvalidFailTimeout);
    }
}

pub fn validate_headers(headers: &HeadersConfig, ctx: &mut ValidationCtx) {
    for name in [&headers.pool, &headers.release, &headers.proxy_marker] {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            ctx.push(ConfigError::InvalidHeaderName { name: name.clone() });
        }
    }

    let value = &headers.proxy_marker_value;
    if HeaderValue::from_str(value).is_err() || !is_bare_word(value) {
        ctx.push(ConfigError::InvalidHeaderValue {
            name: headers.proxy_marker.clone(),
            value: value.clone(),
        });
    }
}
