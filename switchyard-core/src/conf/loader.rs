use crate::conf::env::EnvOverrides;
use crate::conf::error::ConfigError;
use crate::conf::types::{PoolConfig, RuntimeConfig, SwitchyardSpec};
use crate::conf::validation::validate_spec;
use crate::failover::FailoverPolicy;
use crate::pool::{Pool, PoolLabel, PoolRegistry};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENTRYPOINT: &str = "switchyard.hcl";

/// Load, override and validate the configuration under `root`.
///
/// `root` is either the config directory or the entrypoint file itself.
pub fn load_config(root: &Path, env: &EnvOverrides) -> Result<RuntimeConfig, ConfigError> {
    let mut spec = load_spec_config(root)?;

    env.apply(&mut spec)?;
    if !env.is_empty() {
        tracing::debug!(
            keys = ?env.keys().collect::<Vec<_>>(),
            "environment overrides applied"
        );
    }

    //--------------------------------------------------------------------------
    // Semantic validation (aggregate all semantic errors)
    //--------------------------------------------------------------------------
    validate_spec(&spec).map_err(|errs| ConfigError::Validation {
        validation_errors: errs,
    })?;

    lower(spec)
}

/// Parse the entrypoint file without overrides or validation.
pub fn load_spec_config(root: &Path) -> Result<SwitchyardSpec, ConfigError> {
    let path = entrypoint_path(root);

    let contents = fs::read_to_string(&path).map_err(|e| ConfigError::read_file(&path, e))?;

    hcl::from_str(&contents).map_err(|e| ConfigError::parse(&path, e))
}

pub fn entrypoint_path(root: &Path) -> PathBuf {
    if root.is_file() {
        root.to_path_buf()
    } else {
        root.join(ENTRYPOINT)
    }
}

/// Lower a validated spec into the runtime shape.
pub fn lower(spec: SwitchyardSpec) -> Result<RuntimeConfig, ConfigError> {
    let active_pool =
        spec.active_pool
            .parse::<PoolLabel>()
            .map_err(|_| ConfigError::InvalidActivePool {
                value: spec.active_pool.clone(),
            })?;

    let pool = |label, cfg: &PoolConfig| {
        Pool::new(label, cfg.host.trim(), cfg.port, cfg.release_id.trim())
    };
    let registry = PoolRegistry::new(
        pool(PoolLabel::Blue, &spec.pools.blue),
        pool(PoolLabel::Green, &spec.pools.green),
    );

    let f = &spec.failover;
    let failover = FailoverPolicy {
        connect_timeout: Duration::from_secs(f.connect_timeout_secs),
        send_timeout: Duration::from_secs(f.send_timeout_secs),
        read_timeout: Duration::from_secs(f.read_timeout_secs),
        max_fails: f.max_fails,
        fail_timeout: Duration::from_secs(f.fail_timeout_secs),
        tries: f.tries,
        retry_on: f.retry_on.clone(),
        retry_non_idempotent: f.retry_non_idempotent,
        keepalive: f.keepalive,
    };

    Ok(RuntimeConfig {
        server: spec.server,
        active_pool,
        registry,
        proxy: spec.proxy,
        failover,
        headers: spec.headers,
        health_path: spec.health_path,
    })
}
