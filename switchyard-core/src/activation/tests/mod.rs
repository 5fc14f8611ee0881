#[cfg(test)]
mod controller_tests;

use crate::conf::{EnvOverrides, RuntimeConfig, load_config};
use crate::proxy::{ProxyControl, ProxyError, ProxyProcess};
use nix::errno::Errno;
use nix::sys::signal::Signal;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) const FAKE_PID: u32 = 4242;

/// In-memory stand-in for nginx that records every call.
#[derive(Default)]
pub(crate) struct FakeProxy {
    pub reject_with: Mutex<Option<String>>,
    pub fail_reload: AtomicBool,
    pub fail_launch: AtomicBool,
    pub check_delay: Option<Duration>,

    pub checked: Mutex<Vec<String>>,
    pub reloads: AtomicUsize,
    pub launches: AtomicUsize,

    pub in_check: AtomicBool,
    pub overlapped: AtomicBool,
}

impl FakeProxy {
    pub fn reject(&self, output: &str) {
        *self.reject_with.lock().unwrap() = Some(output.to_string());
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn checks(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }
}

impl ProxyControl for FakeProxy {
    fn check(&self, config: &Path) -> Result<(), ProxyError> {
        if self.in_check.swap(true, Ordering::SeqCst) {
            self.overlapped.store(true, Ordering::SeqCst);
        }

        let text = fs::read_to_string(config).unwrap();
        self.checked.lock().unwrap().push(text);
        if let Some(delay) = self.check_delay {
            std::thread::sleep(delay);
        }

        self.in_check.store(false, Ordering::SeqCst);

        match self.reject_with.lock().unwrap().clone() {
            Some(output) => Err(ProxyError::CheckRejected {
                binary: PathBuf::from("fake-nginx"),
                status: "exit status: 1".to_string(),
                output,
            }),
            None => Ok(()),
        }
    }

    fn reload(&self) -> Result<u32, ProxyError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reload.load(Ordering::SeqCst) {
            return Err(ProxyError::Signal {
                signal: Signal::SIGHUP,
                pid: FAKE_PID as i32,
                source: Errno::ESRCH,
            });
        }
        Ok(FAKE_PID)
    }

    fn launch(&self, _config: &Path) -> Result<ProxyProcess, ProxyError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_launch.load(Ordering::SeqCst) {
            return Err(ProxyError::Spawn {
                binary: PathBuf::from("fake-nginx"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        Ok(ProxyProcess::detached(FAKE_PID))
    }

    fn running_pid(&self) -> Option<u32> {
        Some(FAKE_PID)
    }
}

/// Write a config under `dir` whose artifact lives at `dir/nginx/nginx.conf`.
pub(crate) fn write_config(dir: &Path, green_host: &str) -> PathBuf {
    let nginx = dir.join("nginx");
    let hcl = format!(
        r#"
server = {{ version = 1 }}
active_pool = "blue"
pools = {{
  blue  = {{ host = "app_blue",  port = 3000, release_id = "blue-v1" }}
  green = {{ host = "{green_host}", port = 3000, release_id = "green-v1" }}
}}
proxy = {{
  config_path = "{conf}"
  pid_file    = "{pid}"
  listen      = 8080
}}
"#,
        conf = nginx.join("nginx.conf").display(),
        pid = nginx.join("nginx.pid").display(),
    );
    fs::write(dir.join("switchyard.hcl"), hcl).unwrap();
    nginx.join("nginx.conf")
}

pub(crate) fn runtime_config(dir: &Path) -> RuntimeConfig {
    write_config(dir, "app_green");
    load_config(dir, &EnvOverrides::none()).unwrap()
}

pub(crate) fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
