//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! switchyard.hcl
//!     → loader.rs (parse into SwitchyardSpec)
//!     → env.rs (apply ACTIVE_POOL, PORT, ... overrides)
//!     → validation.rs (aggregate semantic checks)
//!     → RuntimeConfig (PoolRegistry + FailoverPolicy, immutable)
//! ```

mod env;
mod error;
mod loader;
mod tests;
pub mod types;
mod validation;

pub use env::EnvOverrides;
pub use error::ConfigError;
pub use loader::{ENTRYPOINT, entrypoint_path, load_config, load_spec_config, lower};
pub use types::RuntimeConfig;
pub use validation::{ValidationErrors, validate_spec};
