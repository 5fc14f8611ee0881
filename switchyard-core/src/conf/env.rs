//! Environment overrides for the declared inputs.
//!
//! Deployment tooling usually hands the controller its pool identities and
//! the desired active pool through the environment. Overrides are applied
//! on top of the parsed file and before validation.

use crate::conf::error::ConfigError;
use crate::conf::types::{PoolConfig, SwitchyardSpec};
use std::collections::BTreeMap;

pub const ACTIVE_POOL: &str = "ACTIVE_POOL";
pub const PORT: &str = "PORT";
pub const BLUE_HOST: &str = "BLUE_HOST";
pub const BLUE_PORT: &str = "BLUE_PORT";
pub const RELEASE_ID_BLUE: &str = "RELEASE_ID_BLUE";
pub const GREEN_HOST: &str = "GREEN_HOST";
pub const GREEN_PORT: &str = "GREEN_PORT";
pub const RELEASE_ID_GREEN: &str = "RELEASE_ID_GREEN";

const KEYS: [&str; 8] = [
    ACTIVE_POOL,
    PORT,
    BLUE_HOST,
    BLUE_PORT,
    RELEASE_ID_BLUE,
    GREEN_HOST,
    GREEN_PORT,
    RELEASE_ID_GREEN,
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    vars: BTreeMap<String, String>,
}

impl EnvOverrides {
    /// No overrides at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Snapshot the recognized keys from the process environment.
    pub fn from_process() -> Self {
        Self::from_pairs(
            KEYS.iter()
                .filter_map(|k| std::env::var(k).ok().map(|v| (k.to_string(), v))),
        )
    }

    /// Build from explicit pairs. Unrecognized keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| KEYS.contains(&k.as_str()))
            .collect();
        Self { vars }
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Apply overrides to a parsed spec.
    ///
    /// `PORT` applies to both pools; `BLUE_PORT` / `GREEN_PORT` win over it.
    pub fn apply(&self, spec: &mut SwitchyardSpec) -> Result<(), ConfigError> {
        if let Some(v) = self.get(ACTIVE_POOL) {
            spec.active_pool = v.trim().to_string();
        }

        if let Some(port) = self.port(PORT)? {
            spec.pools.blue.port = port;
            spec.pools.green.port = port;
        }

        self.apply_pool(&mut spec.pools.blue, BLUE_HOST, BLUE_PORT, RELEASE_ID_BLUE)?;
        self.apply_pool(&mut spec.pools.green, GREEN_HOST, GREEN_PORT, RELEASE_ID_GREEN)?;

        Ok(())
    }

    fn apply_pool(
        &self,
        pool: &mut PoolConfig,
        host_key: &str,
        port_key: &str,
        release_key: &str,
    ) -> Result<(), ConfigError> {
        if let Some(host) = self.get(host_key) {
            pool.host = host.to_string();
        }
        if let Some(port) = self.port(port_key)? {
            pool.port = port;
        }
        if let Some(release) = self.get(release_key) {
            pool.release_id = release.to_string();
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    fn port(&self, key: &str) -> Result<Option<u16>, ConfigError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };

        raw.trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvOverride {
                key: key.to_string(),
                value: raw.to_string(),
                reason: e.to_string(),
            })
    }
}
