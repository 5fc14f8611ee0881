use crate::harness::MockPool;
use reqwest::blocking::{Client, Response};
use std::fs;
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};
use switchyard_core::activation::{ActivationController, ActivationError, Applied};
use switchyard_core::conf::{EnvOverrides, load_config};
use switchyard_core::proxy::{NginxProxy, ProxyProcess};
use tempfile::TempDir;

/// Two mock pools behind a real nginx managed by the controller.
pub struct Deployment {
    dir: TempDir,
    pub blue: MockPool,
    pub green: MockPool,
    listen: u16,
    pub controller: ActivationController<NginxProxy>,
    process: Option<ProxyProcess>,
    client: Client,
}

impl Deployment {
    /// Cold-start nginx with `pool` as primary.
    pub fn start(pool: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let blue = MockPool::start("blue", "blue-v1");
        let green = MockPool::start("green", "green-v1");
        let listen = free_port();

        for sub in ["nginx/logs", "nginx/tmp"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        write_config(dir.path(), listen, blue.port(), "127.0.0.1", green.port());

        let cfg = load_config(dir.path(), &EnvOverrides::none()).expect("failed to load config");
        let proxy = NginxProxy::from_config(&cfg.proxy);
        let controller = ActivationController::new(cfg, proxy);

        let (_, process) = controller.cold_start(pool).expect("cold start failed");
        wait_for_port(listen);

        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("failed to build client");

        Self {
            dir,
            blue,
            green,
            listen,
            controller,
            process: Some(process),
            client,
        }
    }

    pub fn config_root(&self) -> &Path {
        self.dir.path()
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.dir.path().join("nginx/nginx.conf")
    }

    pub fn artifact(&self) -> Vec<u8> {
        fs::read(self.artifact_path()).unwrap()
    }

    pub fn switch(&self, pool: &str) -> Result<Applied, ActivationError> {
        self.controller.switch(pool)
    }

    /// Rewrite the declared config with `green_host` and hand it to the controller.
    pub fn redeclare_green_host(&self, green_host: &str) {
        write_config(
            self.dir.path(),
            self.listen,
            self.blue.port(),
            green_host,
            self.green.port(),
        );
        let cfg = load_config(self.dir.path(), &EnvOverrides::none())
            .expect("failed to load config");
        self.controller.replace_config(cfg);
    }

    pub fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("http://127.0.0.1:{}{}", self.listen, path))
            .send()
            .expect("request failed")
    }

    /// Poll until responses come from `pool`. Reloads are asynchronous.
    pub fn wait_for_pool(&self, pool: &str) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if header(&self.get("/"), "x-app-pool").as_deref() == Some(pool) {
                return true;
            }
            thread::sleep(Duration::from_millis(50));
        }
        false
    }
}

impl Drop for Deployment {
    fn drop(&mut self) {
        if let Some(mut process) = self.process.take() {
            let _ = process.kill();
            let deadline = Instant::now() + Duration::from_secs(2);
            while Instant::now() < deadline {
                if let Ok(Some(_)) = process.try_wait() {
                    break;
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

pub fn header(res: &Response, name: &str) -> Option<String> {
    res.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn write_config(dir: &Path, listen: u16, blue_port: u16, green_host: &str, green_port: u16) {
    let nginx = dir.join("nginx");
    let binary = std::env::var("NGINX_BIN").unwrap_or_else(|_| "nginx".to_string());
    let hcl = format!(
        r#"
server = {{ version = 1 }}
active_pool = "blue"
pools = {{
  blue  = {{ host = "127.0.0.1", port = {blue_port}, release_id = "blue-v1" }}
  green = {{ host = "{green_host}", port = {green_port}, release_id = "green-v1" }}
}}
proxy = {{
  binary           = "{binary}"
  config_path      = "{conf}"
  pid_file         = "{pid}"
  prefix           = "{prefix}"
  runtime_dir      = "{tmp}"
  listen           = {listen}
  worker_processes = "1"
  error_log        = "stderr warn"
}}
failover = {{ connect_timeout_secs = 1, send_timeout_secs = 2, read_timeout_secs = 2 }}
"#,
        conf = nginx.join("nginx.conf").display(),
        pid = nginx.join("nginx.pid").display(),
        prefix = nginx.display(),
        tmp = nginx.join("tmp").display(),
    );
    fs::write(dir.join("switchyard.hcl"), hcl).unwrap();
}

pub fn nginx_available() -> bool {
    let binary = std::env::var("NGINX_BIN").unwrap_or_else(|_| "nginx".to_string());
    Command::new(binary)
        .arg("-v")
        .output()
        .is_ok_and(|o| o.status.success())
}

/// Poll until something accepts connections on `port` (or panic).
pub fn wait_for_port(port: u16) {
    let addr = format!("127.0.0.1:{port}");
    let deadline = Instant::now() + Duration::from_secs(5);

    loop {
        match TcpStream::connect(&addr) {
            Ok(_) => return,
            Err(_) => {
                if Instant::now() > deadline {
                    panic!("nothing listening at {addr}");
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

/// Allocate a free port on localhost.
/// This is required to avoid port collisions when running tests in parallel.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
