use crate::activation::{ActivationController, ActivationError, Applied};
use crate::cli::{describe, env_overrides};
use crate::conf::load_config;
use crate::pool::PoolLabel;
use crate::proxy::NginxProxy;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::PathBuf;

/// Warm switch the running proxy to `pool`.
pub fn switch(config: PathBuf, pool: String, json: bool, no_env: bool) -> anyhow::Result<()> {
    // Reject bad labels before reading anything.
    pool.parse::<PoolLabel>().map_err(ActivationError::from)?;

    let cfg = load_config(&config, &env_overrides(no_env))?;
    let proxy = NginxProxy::from_config(&cfg.proxy);
    let ctl = ActivationController::new(cfg, proxy);

    match ctl.switch(&pool) {
        Ok(applied) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&applied)?);
            } else {
                print_applied(&applied);
            }
            Ok(())
        }
        Err(err) => {
            if json {
                let body = json!({
                    "error": err.kind(),
                    "message": describe(&err),
                    "pool": pool.trim(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
            Err(err.into())
        }
    }
}

fn print_applied(applied: &Applied) {
    if applied.changed {
        println!("{} switched to {}", "✔".green(), applied.pool.bold());
    } else {
        println!(
            "{} {} already active; configuration re-applied",
            "✔".green(),
            applied.pool.bold()
        );
    }
    println!(
        "  primary {} (release {})",
        applied.primary.address, applied.primary.release_id
    );
    println!(
        "  backup  {} (release {})",
        applied.backup.address, applied.backup.release_id
    );
    println!("  nginx pid {} reloaded", applied.proxy_pid);
}
