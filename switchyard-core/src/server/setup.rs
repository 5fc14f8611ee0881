use crate::activation::{ActivationController, Applied};
use crate::conf::{EnvOverrides, load_config};
use crate::proxy::{NginxProxy, ProxyControl, ProxyProcess};
use crate::server::pid;
use crate::server::reload::ReloadHandle;
use anyhow::{Context, Result};
use nix::sys::signal::Signal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tokio::time::Instant;

const EXIT_POLL: Duration = Duration::from_millis(250);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_root: PathBuf,
    pub env: EnvOverrides,
    /// Overrides the declared `active_pool` for the cold start.
    pub pool: Option<String>,
}

/// Cold-start nginx and supervise it until it exits or we are told to stop.
///
/// Returns the process exit code the supervisor should exit with.
pub fn run(opts: RunOptions) -> Result<i32> {
    let cfg = load_config(&opts.config_root, &opts.env)?;

    // Attempt to write pid file (best-effort)
    let pid_file = cfg.server.pid_file.clone();
    if let Some(pid_file) = &pid_file {
        match pid::write_pid(pid_file) {
            Ok(()) => tracing::info!(pid_file = %pid_file.display(), "pid file written"),
            Err(e) => tracing::warn!(
                error = %e,
                pid_file = %pid_file.display(),
                "failed to write pid file; continuing"
            ),
        }
    }

    let desired = opts
        .pool
        .clone()
        .unwrap_or_else(|| cfg.active_pool.to_string());
    let proxy = NginxProxy::from_config(&cfg.proxy);
    let ctl = Arc::new(ActivationController::new(cfg, proxy));

    let result = cold_start_and_supervise(ctl, &desired, opts);

    if let Some(pid_file) = &pid_file {
        pid::remove_pid(pid_file);
    }
    result
}

fn cold_start_and_supervise<P: ProxyControl>(
    ctl: Arc<ActivationController<P>>,
    desired: &str,
    opts: RunOptions,
) -> Result<i32> {
    use tokio::runtime::Builder;

    let (applied, process) = ctl.cold_start(desired)?;
    tracing::info!(
        pool = %applied.pool,
        release_id = %applied.primary.release_id,
        pid = applied.proxy_pid,
        "proxy started"
    );

    // Control-plane runtime (signals + reload only)
    let control_rt = Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to build control-plane Tokio runtime")?;

    control_rt.block_on(supervise(ctl, process, opts))
}

async fn supervise<P: ProxyControl>(
    ctl: Arc<ActivationController<P>>,
    mut process: ProxyProcess,
    opts: RunOptions,
) -> Result<i32> {
    let reload = ReloadHandle::new();
    let mut reload_rx = reload.subscribe();

    tokio::spawn({
        let reload = reload.clone();
        async move {
            if let Err(e) = reload.install_signal_handler().await {
                tracing::error!(error = %e, "SIGHUP handler stopped");
            }
        }
    });

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut poll = tokio::time::interval(EXIT_POLL);

    tracing::info!("supervisor loop started");

    loop {
        tokio::select! {
            Ok(()) = reload_rx.changed() => {
                let epoch = reload_rx.borrow_and_update().epoch;
                match reapply(&ctl, &opts.config_root, &opts.env) {
                    Ok(applied) => tracing::info!(
                        epoch,
                        pool = %applied.pool,
                        changed = applied.changed,
                        "reload successful"
                    ),
                    Err(e) => tracing::error!(epoch, error = %format!("{e:#}"), "reload failed"),
                }
            }
            _ = terminate.recv() => return shutdown(process, "SIGTERM").await,
            _ = interrupt.recv() => return shutdown(process, "SIGINT").await,
            _ = poll.tick() => {
                if let Some(status) = process.try_wait()? {
                    tracing::warn!(%status, "nginx exited");
                    return Ok(status.code().unwrap_or(1));
                }
            }
        }
    }
}

/// Reload declared configuration and re-apply whichever pool is live.
///
/// The pool recorded in the live artifact wins over the declared
/// `active_pool`, so a reload never undoes an earlier `switch`.
pub fn reapply<P: ProxyControl>(
    ctl: &ActivationController<P>,
    root: &Path,
    env: &EnvOverrides,
) -> Result<Applied> {
    let cfg = load_config(root, env)
        .context("reloaded configuration is invalid; keeping previous")?;

    Ok(ctl.reapply(cfg)?)
}

async fn shutdown(mut process: ProxyProcess, reason: &str) -> Result<i32> {
    tracing::info!(signal = reason, pid = process.pid(), "shutdown requested; stopping nginx");

    if let Err(e) = process.signal(Signal::SIGQUIT) {
        tracing::warn!(error = %e, "failed to signal nginx");
    }

    let deadline = Instant::now() + SHUTDOWN_GRACE;
    loop {
        if let Some(status) = process.try_wait()? {
            tracing::info!(%status, "nginx stopped");
            return Ok(0);
        }
        if Instant::now() >= deadline {
            tracing::warn!(
                grace_secs = SHUTDOWN_GRACE.as_secs(),
                "nginx did not stop in time; killing"
            );
            process.kill()?;
            return Ok(1);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
