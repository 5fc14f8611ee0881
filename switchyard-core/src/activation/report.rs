use crate::pool::{Pool, PoolLabel};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMode {
    ColdStart,
    WarmSwitch,
}

impl fmt::Display for ActivationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationMode::ColdStart => f.write_str("cold_start"),
            ActivationMode::WarmSwitch => f.write_str("warm_switch"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolSummary {
    pub label: PoolLabel,
    pub address: String,
    pub release_id: String,
}

impl From<&Pool> for PoolSummary {
    fn from(pool: &Pool) -> Self {
        Self {
            label: pool.label,
            address: pool.address(),
            release_id: pool.release_id.clone(),
        }
    }
}

/// Outcome of a successful activation.
#[derive(Debug, Clone, Serialize)]
pub struct Applied {
    pub activation_id: Uuid,
    pub pool: PoolLabel,
    pub primary: PoolSummary,
    pub backup: PoolSummary,
    pub artifact: PathBuf,
    pub mode: ActivationMode,

    /// False when the committed artifact was byte-identical to the previous one.
    pub changed: bool,

    pub proxy_pid: u32,
    pub applied_at: DateTime<Utc>,
}
