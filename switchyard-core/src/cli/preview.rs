use crate::activation::{ActivationController, ActivationError};
use crate::cli::env_overrides;
use crate::conf::{RuntimeConfig, load_config};
use crate::pool::PoolLabel;
use crate::proxy::NginxProxy;
use crate::render::Renderer;
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Print the artifact `pool` would produce. Nothing is written or checked.
pub fn render(config: PathBuf, pool: Option<String>, no_env: bool) -> anyhow::Result<()> {
    let (cfg, label) = load_with_selection(&config, pool.as_deref(), no_env)?;

    let rendered = Renderer::from_config(&cfg).render(label, &cfg.registry);

    let mut out = std::io::stdout().lock();
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Render and validate `pool` without applying it.
pub fn check(config: PathBuf, pool: Option<String>, no_env: bool) -> anyhow::Result<()> {
    let (cfg, label) = load_with_selection(&config, pool.as_deref(), no_env)?;
    let proxy = NginxProxy::from_config(&cfg.proxy);
    let ctl = ActivationController::new(cfg, proxy);

    match ctl.check(label.as_str()) {
        Ok(rendered) => {
            println!(
                "{} configuration for {} passed validation",
                "✔".green(),
                rendered.active.bold()
            );
            println!("  primary {}", rendered.primary.address());
            println!("  backup  {}", rendered.backup.address());
            Ok(())
        }
        Err(err) => {
            if let ActivationError::ValidationFailed { source, .. } = &err {
                eprintln!("{} configuration for {} failed validation", "✘".red(), label.bold());
                for line in source.details() {
                    eprintln!("  {line}");
                }
            }
            Err(err.into())
        }
    }
}

fn load_with_selection(
    config: &Path,
    pool: Option<&str>,
    no_env: bool,
) -> anyhow::Result<(RuntimeConfig, PoolLabel)> {
    // An explicit selection is checked before the config is read.
    let explicit = pool
        .map(|p| p.parse::<PoolLabel>().map_err(ActivationError::from))
        .transpose()?;

    let cfg = load_config(config, &env_overrides(no_env))?;
    let label = explicit.unwrap_or(cfg.active_pool);
    Ok((cfg, label))
}
