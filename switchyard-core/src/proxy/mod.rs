//! Control of the external reverse proxy process.
//!
//! Everything the controller needs from nginx goes through [`ProxyControl`]:
//! syntax checking a staged file, graceful reload, and foreground launch.

mod error;
mod nginx;
pub mod pid;
mod process;

pub use error::ProxyError;
pub use nginx::NginxProxy;
pub use process::ProxyProcess;

use std::path::Path;
use std::sync::Arc;

pub trait ProxyControl: Send + Sync {
    /// Check the configuration at `config` without applying it.
    fn check(&self, config: &Path) -> Result<(), ProxyError>;

    /// Ask the running proxy to reload gracefully. Returns the signalled pid.
    fn reload(&self) -> Result<u32, ProxyError>;

    /// Start the proxy in the foreground with `config`.
    fn launch(&self, config: &Path) -> Result<ProxyProcess, ProxyError>;

    /// Pid of the running proxy, if any.
    fn running_pid(&self) -> Option<u32>;
}

impl<T: ProxyControl + ?Sized> ProxyControl for Arc<T> {
    fn check(&self, config: &Path) -> Result<(), ProxyError> {
        (**self).check(config)
    }

    fn reload(&self) -> Result<u32, ProxyError> {
        (**self).reload()
    }

    fn launch(&self, config: &Path) -> Result<ProxyProcess, ProxyError> {
        (**self).launch(config)
    }

    fn running_pid(&self) -> Option<u32> {
        (**self).running_pid()
    }
}
