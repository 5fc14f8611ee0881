//! Command handlers behind the `switchyard` binary.
//!
//! Handlers print human output on stdout and return `anyhow` errors that keep
//! the typed cause, so the binary can map them to exit codes with
//! [`exit_code`].

pub mod conf;
mod exit;
mod preview;
mod reload;
mod status;
mod switch;

pub use exit::{CONFIG_ERROR, describe, exit_code};
pub use preview::{check, render};
pub use reload::reload;
pub use status::status;
pub use switch::switch;

use crate::conf::EnvOverrides;

pub fn env_overrides(no_env: bool) -> EnvOverrides {
    if no_env {
        EnvOverrides::none()
    } else {
        EnvOverrides::from_process()
    }
}
