use crate::pool::{PoolError, PoolLabel};
use crate::proxy::ProxyError;
use crate::validate::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Why an activation was rejected.
///
/// None of these affect a running proxy except `ReloadFailed`, which means the
/// artifact on disk was replaced but nginx was never told.
#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("invalid pool selection '{input}': expected 'blue' or 'green'")]
    InvalidPoolSelection { input: String },

    #[error("unknown pool '{name}'")]
    UnknownPool { name: String },

    #[error("configuration for pool '{pool}' failed validation")]
    ValidationFailed {
        pool: PoolLabel,
        #[source]
        source: ValidationError,
    },

    #[error(
        "configuration for pool '{pool}' was written to {path} but the proxy was not reloaded; \
         configuration on disk and in effect have diverged"
    )]
    ReloadFailed {
        pool: PoolLabel,
        path: PathBuf,
        #[source]
        source: ProxyError,
    },

    #[error("failed to launch the proxy for pool '{pool}'")]
    LaunchFailed {
        pool: PoolLabel,
        #[source]
        source: ProxyError,
    },

    #[error("failed to write configuration artifact {path}")]
    ArtifactFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ActivationError {
    /// Stable name of the error category, used in logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            ActivationError::InvalidPoolSelection { .. } => "invalid_pool_selection",
            ActivationError::UnknownPool { .. } => "unknown_pool",
            ActivationError::ValidationFailed { .. } => "validation_failed",
            ActivationError::ReloadFailed { .. } => "reload_failed",
            ActivationError::LaunchFailed { .. } => "launch_failed",
            ActivationError::ArtifactFailed { .. } => "artifact_failed",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ActivationError::InvalidPoolSelection { .. } => 2,
            ActivationError::UnknownPool { .. } => 3,
            ActivationError::ValidationFailed { .. } => 4,
            ActivationError::ReloadFailed { .. } => 5,
            ActivationError::LaunchFailed { .. } => 6,
            ActivationError::ArtifactFailed { .. } => 7,
        }
    }
}

impl From<PoolError> for ActivationError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::InvalidPoolSelection { input } => {
                ActivationError::InvalidPoolSelection { input }
            }
            PoolError::UnknownPool { name } => ActivationError::UnknownPool { name },
        }
    }
}
