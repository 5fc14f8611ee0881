use crate::activation::lock::ArtifactLock;
use crate::activation::staging::StagedArtifact;
use crate::activation::{ActivationError, ActivationMode, Applied, PoolSummary};
use crate::conf::RuntimeConfig;
use crate::pool::PoolLabel;
use crate::proxy::{ProxyControl, ProxyProcess};
use crate::render::{RenderedConfig, Renderer, read_marker};
use crate::validate::ConfigValidator;
use arc_swap::ArcSwap;
use chrono::Utc;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Applies a pool selection: render, stage, validate, commit, then reload
/// (warm) or launch (cold).
///
/// Activations are serialized twice over: an in-process mutex, and an
/// exclusive `flock` on `<config_path>.lock` for separate processes.
pub struct ActivationController<P> {
    config: ArcSwap<RuntimeConfig>,
    proxy: P,
    serial: Mutex<()>,
}

impl<P: ProxyControl> ActivationController<P> {
    pub fn new(config: RuntimeConfig, proxy: P) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            proxy,
            serial: Mutex::new(()),
        }
    }

    pub fn config(&self) -> Arc<RuntimeConfig> {
        self.config.load_full()
    }

    /// Swap in freshly loaded configuration for subsequent activations.
    pub fn replace_config(&self, config: RuntimeConfig) {
        self.config.store(Arc::new(config));
    }

    pub fn proxy(&self) -> &P {
        &self.proxy
    }

    /// Render the artifact for `desired` without touching anything.
    pub fn render(&self, desired: &str) -> Result<RenderedConfig, ActivationError> {
        let label = parse_selection(desired)?;
        let cfg = self.config();
        render_for(&cfg, label)
    }

    /// Render and validate `desired` in a scratch file. Nothing is applied.
    pub fn check(&self, desired: &str) -> Result<RenderedConfig, ActivationError> {
        let label = parse_selection(desired)?;
        let cfg = self.config();
        let rendered = render_for(&cfg, label)?;

        let scratch = StagedArtifact::scratch(rendered.as_bytes()).map_err(|source| {
            ActivationError::ArtifactFailed {
                path: std::env::temp_dir(),
                source,
            }
        })?;
        ConfigValidator::new(&self.proxy)
            .validate(&rendered, scratch.path())
            .map_err(|source| ActivationError::ValidationFailed { pool: label, source })?;

        Ok(rendered)
    }

    /// Warm switch: apply `desired` and signal the running proxy to reload.
    pub fn switch(&self, desired: &str) -> Result<Applied, ActivationError> {
        // Reject bad input before any filesystem or process action.
        let selection = Selection::Pool(parse_selection(desired)?);
        let (applied, ()) =
            self.activate(None, selection, ActivationMode::WarmSwitch, reload_proxy::<P>)?;
        Ok(applied)
    }

    /// Warm switch under freshly loaded `config`, keeping whichever pool is live.
    ///
    /// The live pool is read from the artifact while the activation lock is
    /// held, so a concurrent `switch` is never undone. `config.active_pool`
    /// only applies when there is no artifact yet. `config` replaces the
    /// current one once its artifact is committed.
    pub fn reapply(&self, config: RuntimeConfig) -> Result<Applied, ActivationError> {
        let selection = Selection::Live {
            fallback: config.active_pool,
        };
        let (applied, ()) = self.activate(
            Some(Arc::new(config)),
            selection,
            ActivationMode::WarmSwitch,
            reload_proxy::<P>,
        )?;
        Ok(applied)
    }

    /// Cold start: apply `desired` and launch the proxy in the foreground.
    pub fn cold_start(&self, desired: &str) -> Result<(Applied, ProxyProcess), ActivationError> {
        let selection = Selection::Pool(parse_selection(desired)?);
        self.activate(None, selection, ActivationMode::ColdStart, |proxy, target, pool| {
            let process = proxy
                .launch(target)
                .map_err(|source| ActivationError::LaunchFailed { pool, source })?;
            Ok((process.pid(), process))
        })
    }

    fn activate<T>(
        &self,
        fresh: Option<Arc<RuntimeConfig>>,
        selection: Selection,
        mode: ActivationMode,
        apply: impl FnOnce(&P, &Path, PoolLabel) -> Result<(u32, T), ActivationError>,
    ) -> Result<(Applied, T), ActivationError> {
        let _serial = self.serial.lock().unwrap_or_else(PoisonError::into_inner);
        let cfg = fresh.clone().unwrap_or_else(|| self.config());
        let target = cfg.proxy.config_path.as_path();

        let artifact_error = |source| ActivationError::ArtifactFailed {
            path: target.to_path_buf(),
            source,
        };

        let _lock = ArtifactLock::acquire(target).map_err(artifact_error)?;

        let label = match selection {
            Selection::Pool(label) => label,
            Selection::Live { fallback } => live_pool(target).unwrap_or(fallback),
        };

        let activation_id = Uuid::new_v4();
        let span = tracing::info_span!("activation", %activation_id, pool = %label, %mode);
        let _enter = span.enter();

        let rendered = render_for(&cfg, label)?;
        let staged = StagedArtifact::stage(target, rendered.as_bytes()).map_err(artifact_error)?;

        let validator = ConfigValidator::new(&self.proxy);
        if let Err(source) = validator.validate(&rendered, staged.path()) {
            tracing::warn!(
                error = %source,
                details = ?source.details(),
                "validation failed; artifact left unchanged"
            );
            return Err(ActivationError::ValidationFailed { pool: label, source });
        }

        let changed = fs::read(target).map_or(true, |current| current != rendered.as_bytes());
        staged.commit(target).map_err(artifact_error)?;
        tracing::debug!(artifact = %target.display(), changed, "artifact committed");

        if let Some(fresh) = fresh {
            self.config.store(fresh);
        }

        let (proxy_pid, extra) = apply(&self.proxy, target, label)?;

        let applied = Applied {
            activation_id,
            pool: label,
            primary: PoolSummary::from(&rendered.primary),
            backup: PoolSummary::from(&rendered.backup),
            artifact: target.to_path_buf(),
            mode,
            changed,
            proxy_pid,
            applied_at: Utc::now(),
        };

        tracing::info!(
            primary = %applied.primary.address,
            backup = %applied.backup.address,
            release_id = %applied.primary.release_id,
            changed,
            proxy_pid,
            "activation applied"
        );

        Ok((applied, extra))
    }
}

/// Which pool an activation applies, decided once the lock is held.
enum Selection {
    Pool(PoolLabel),
    Live { fallback: PoolLabel },
}

fn reload_proxy<P: ProxyControl>(
    proxy: &P,
    target: &Path,
    pool: PoolLabel,
) -> Result<(u32, ()), ActivationError> {
    match proxy.reload() {
        Ok(pid) => Ok((pid, ())),
        Err(source) => {
            tracing::error!(
                error = %source,
                artifact = %target.display(),
                "reload failed; configuration on disk and in effect have diverged"
            );
            Err(ActivationError::ReloadFailed {
                pool,
                path: target.to_path_buf(),
                source,
            })
        }
    }
}

fn live_pool(artifact: &Path) -> Option<PoolLabel> {
    let text = fs::read_to_string(artifact).ok()?;
    read_marker(&text).map(|m| m.active_pool)
}

fn parse_selection(desired: &str) -> Result<PoolLabel, ActivationError> {
    Ok(desired.parse::<PoolLabel>()?)
}

fn render_for(cfg: &RuntimeConfig, label: PoolLabel) -> Result<RenderedConfig, ActivationError> {
    // Resolve by name so registry drift surfaces as UnknownPool.
    cfg.registry.resolve(label.as_str())?;
    cfg.registry.resolve(label.other().as_str())?;

    Ok(Renderer::from_config(cfg).render(label, &cfg.registry))
}
