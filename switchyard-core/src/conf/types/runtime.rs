use crate::conf::types::{HeadersConfig, ProxyConfig, ServerConfig};
use crate::failover::FailoverPolicy;
use crate::pool::{PoolLabel, PoolRegistry};
use serde::Serialize;

/// Validated configuration the controller runs with.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeConfig {
    pub server: ServerConfig,
    pub active_pool: PoolLabel,
    pub registry: PoolRegistry,
    pub proxy: ProxyConfig,
    pub failover: FailoverPolicy,
    pub headers: HeadersConfig,
    pub health_path: String,
}
