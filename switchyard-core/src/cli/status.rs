use crate::cli::env_overrides;
use crate::conf::load_config;
use crate::pool::PoolLabel;
use crate::proxy::{NginxProxy, ProxyControl};
use crate::render::{ArtifactMarker, read_marker};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct Status {
    pub artifact: PathBuf,
    pub artifact_present: bool,
    pub declared_pool: PoolLabel,

    /// What the live artifact says, if it carries a marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<ArtifactMarker>,

    pub proxy_pid: Option<u32>,
}

/// Report the live selection and whether nginx is running.
pub fn status(config: PathBuf, json: bool, no_env: bool) -> anyhow::Result<()> {
    let cfg = load_config(&config, &env_overrides(no_env))?;
    let proxy = NginxProxy::from_config(&cfg.proxy);
    let artifact = cfg.proxy.config_path.clone();

    let text = fs::read_to_string(&artifact).ok();
    let status = Status {
        artifact_present: text.is_some(),
        live: text.as_deref().and_then(read_marker),
        artifact,
        declared_pool: cfg.active_pool,
        proxy_pid: proxy.running_pid(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print_status(&status);
    }
    Ok(())
}

fn print_status(status: &Status) {
    match &status.live {
        Some(live) => {
            println!("active pool: {}", live.active_pool.bold());
            println!("  primary {}", live.primary);
            println!("  backup  {}", live.backup);
            if live.active_pool != status.declared_pool {
                println!(
                    "  {} declared active_pool is {}",
                    "note:".yellow(),
                    status.declared_pool
                );
            }
        }
        None if status.artifact_present => println!(
            "{} {} was not written by switchyard",
            "?".yellow(),
            status.artifact.display()
        ),
        None => println!("{} no artifact at {}", "✘".red(), status.artifact.display()),
    }

    match status.proxy_pid {
        Some(pid) => println!("nginx: {} (pid {pid})", "running".green()),
        None => println!("nginx: {}", "not running".red()),
    }
}
