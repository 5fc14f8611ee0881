use crate::cli::{CONFIG_ERROR, env_overrides};
use crate::conf::ConfigError;
use crate::conf::load_config;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn check(path: PathBuf, no_env: bool) -> anyhow::Result<()> {
    match load_config(&path, &env_overrides(no_env)) {
        Ok(cfg) => {
            println!("{} Config loaded successfully", "✔".green());
            println!("{} active pool: {}", "✔".green(), cfg.active_pool);
            for pool in cfg.registry.pools() {
                println!(
                    "{} {:<5} {} (release {})",
                    "✔".green(),
                    pool.label,
                    pool.address(),
                    pool.release_id
                );
            }
            println!(
                "{} artifact: {}",
                "✔".green(),
                cfg.proxy.config_path.display()
            );
            Ok(())
        }
        Err(err) => {
            print_config_error(&err);
            std::process::exit(CONFIG_ERROR);
        }
    }
}

fn print_config_error(err: &ConfigError) {
    match err {
        ConfigError::Validation { validation_errors } => {
            eprintln!(
                "{} {} configuration error(s):",
                "✘".red(),
                validation_errors.0.len()
            );
            for e in &validation_errors.0 {
                eprintln!("  - {e}");
                if let Some(hint) = config_error_hint(e) {
                    for line in hint.lines() {
                        eprintln!("      {}", line.dimmed());
                    }
                }
            }
        }
        other => {
            eprintln!("{} {other}", "✘".red());
            if let Some(hint) = config_error_hint(other) {
                eprintln!();
                eprintln!("{hint}");
            }
        }
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        //---------------------------------------------------------------------
        // Pools
        //---------------------------------------------------------------------
        ConfigError::InvalidActivePool { .. } => Some(
            "active_pool must name one of the two pools.\n\
             \n\
             Example:\n\
             \n\
             active_pool = \"blue\"",
        ),

        ConfigError::DuplicatePoolAddress { .. } => Some(
            "Blue and green must be distinct upstreams, otherwise failover\n\
             retries the same instance that just failed.",
        ),

        ConfigError::EmptyReleaseId { .. } => Some(
            "Each pool needs a release id; it is reported in every activation.\n\
             \n\
             Example:\n\
             \n\
             pools = {\n\
             \x20 blue  = { host = \"app_blue\",  port = 3000, release_id = \"blue-v1\" }\n\
             \x20 green = { host = \"app_green\", port = 3000, release_id = \"green-v1\" }\n\
             }",
        ),

        //---------------------------------------------------------------------
        // Failover tuning
        //---------------------------------------------------------------------
        ConfigError::InvalidTimeout { .. } => Some(
            "Upstream timeouts are whole seconds between 1 and 9 so a dead\n\
             primary costs clients at most a few seconds.",
        ),

        ConfigError::InvalidTries { .. } => Some(
            "tries must be between 2 and 5; fewer than 2 disables failover to\n\
             the backup pool.",
        ),

        //---------------------------------------------------------------------
        // Environment
        //---------------------------------------------------------------------
        ConfigError::InvalidEnvOverride { .. } => Some(
            "Environment overrides are applied on top of the config file.\n\
             \n\
             Fix or unset the variable, or pass --no-env to ignore them.",
        ),

        //---------------------------------------------------------------------
        // Everything else: no hint
        //---------------------------------------------------------------------
        _ => None,
    }
}
