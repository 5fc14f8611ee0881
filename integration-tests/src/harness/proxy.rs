use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use switchyard_core::proxy::{ProxyControl, ProxyError, ProxyProcess};

/// Proxy stand-in that accepts everything and records calls.
#[derive(Default)]
pub struct RecordingProxy {
    pub fail_reload: AtomicBool,
    pub reloads: AtomicUsize,
    pub checked: Mutex<Vec<String>>,
}

impl RecordingProxy {
    pub const PID: u32 = 31337;

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl ProxyControl for RecordingProxy {
    fn check(&self, config: &Path) -> Result<(), ProxyError> {
        let text = std::fs::read_to_string(config).unwrap();
        self.checked.lock().unwrap().push(text);
        Ok(())
    }

    fn reload(&self) -> Result<u32, ProxyError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reload.load(Ordering::SeqCst) {
            return Err(ProxyError::InvalidPid {
                path: "/nonexistent/nginx.pid".into(),
                contents: String::new(),
            });
        }
        Ok(Self::PID)
    }

    fn launch(&self, _config: &Path) -> Result<ProxyProcess, ProxyError> {
        Ok(ProxyProcess::detached(Self::PID))
    }

    fn running_pid(&self) -> Option<u32> {
        Some(Self::PID)
    }
}
