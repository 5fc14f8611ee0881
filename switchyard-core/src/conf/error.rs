use crate::conf::validation::ValidationErrors;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    //-------------------------------------------------------------------------
    // IO / Parsing
    //-------------------------------------------------------------------------
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file: {path}\n\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    #[error("invalid value '{value}' for environment override {key}: {reason}")]
    InvalidEnvOverride {
        key: String,
        value: String,
        reason: String,
    },

    //-------------------------------------------------------------------------
    // Top-level
    //-------------------------------------------------------------------------
    #[error("invalid version '{version}'")]
    InvalidVersion { version: u32 },

    #[error("{validation_errors}")]
    Validation { validation_errors: ValidationErrors },

    #[error("invalid active pool '{value}': expected 'blue' or 'green'")]
    InvalidActivePool { value: String },

    #[error("health path '{path}' must start with '/'")]
    InvalidHealthPath { path: String },

    //-------------------------------------------------------------------------
    // Pools
    //-------------------------------------------------------------------------
    #[error("pool '{pool}' has an empty release id")]
    EmptyReleaseId { pool: String },

    #[error("blue and green both point at {address}; failover would retry the same upstream")]
    DuplicatePoolAddress { address: String },

    //-------------------------------------------------------------------------
    // Proxy
    //-------------------------------------------------------------------------
    #[error("proxy listen port must be non-zero")]
    InvalidListenPort,

    #[error("invalid upstream name '{name}': {reason}")]
    InvalidUpstreamName { name: String, reason: String },

    #[error("invalid proxy setting '{setting}': {reason}")]
    InvalidProxySetting { setting: String, reason: String },

    //-------------------------------------------------------------------------
    // Failover
    //-------------------------------------------------------------------------
    #[error("{name} must be between 1 and 9 seconds, got {secs}")]
    InvalidTimeout { name: String, secs: u64 },

    #[error("tries must be between 2 and 5, got {tries}")]
    InvalidTries { tries: u32 },

    #[error("max_fails must be at least 1")]
    InvalidMaxFails,

    #[error("fail_timeout_secs must be at least 1")]
    InvalidFailTimeout,

    //-------------------------------------------------------------------------
    // Headers
    //-------------------------------------------------------------------------
    #[error("invalid header name '{name}'")]
    InvalidHeaderName { name: String },

    #[error("invalid value '{value}' for header '{name}'")]
    InvalidHeaderValue { name: String, value: String },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: hcl::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
