//! Static identity of the two pools.
//!
//! The registry is built once from the declared configuration and never
//! mutated afterwards. Switching only changes which label is preferred.

use crate::pool::{PoolError, PoolLabel};
use serde::Serialize;

/// Identity of one deployable environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pool {
    pub label: PoolLabel,
    pub host: String,
    pub port: u16,
    /// Opaque version identifier echoed back by the pool in its response headers.
    pub release_id: String,
}

impl Pool {
    pub fn new(
        label: PoolLabel,
        host: impl Into<String>,
        port: u16,
        release_id: impl Into<String>,
    ) -> Self {
        Self {
            label,
            host: host.into(),
            port,
            release_id: release_id.into(),
        }
    }

    /// `host:port` as written into an upstream member.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolRegistry {
    blue: Pool,
    green: Pool,
}

impl PoolRegistry {
    /// Build a registry from the two pool entries.
    ///
    /// Entries are re-labelled by position so a registry can never hold two
    /// pools under the same label.
    pub fn new(mut blue: Pool, mut green: Pool) -> Self {
        blue.label = PoolLabel::Blue;
        green.label = PoolLabel::Green;
        Self { blue, green }
    }

    pub fn get(&self, label: PoolLabel) -> &Pool {
        match label {
            PoolLabel::Blue => &self.blue,
            PoolLabel::Green => &self.green,
        }
    }

    /// Look a pool up by its textual name.
    pub fn resolve(&self, name: &str) -> Result<&Pool, PoolError> {
        match name {
            "blue" => Ok(&self.blue),
            "green" => Ok(&self.green),
            _ => Err(PoolError::UnknownPool {
                name: name.to_string(),
            }),
        }
    }

    pub fn pools(&self) -> [&Pool; 2] {
        [&self.blue, &self.green]
    }
}
