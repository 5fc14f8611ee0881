use super::{FAKE_PID, FakeProxy, entries, runtime_config, write_config};
use crate::activation::{ActivationController, ActivationError, ActivationMode, lock_path};
use crate::conf::{EnvOverrides, load_config};
use crate::pool::{PoolError, PoolLabel};
use crate::render::read_marker;
use crate::validate::ValidationError;
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

fn controller(dir: &std::path::Path) -> (ActivationController<Arc<FakeProxy>>, Arc<FakeProxy>) {
    let proxy = Arc::new(FakeProxy::default());
    (
        ActivationController::new(runtime_config(dir), proxy.clone()),
        proxy,
    )
}

fn live_pool(dir: &std::path::Path) -> PoolLabel {
    let text = fs::read_to_string(dir.join("nginx/nginx.conf")).unwrap();
    read_marker(&text).unwrap().active_pool
}

#[test]
fn warm_switch_commits_and_reloads() {
    // Arrange
    let dir = tempdir().unwrap();
    let (ctl, proxy) = controller(dir.path());

    // Act
    let applied = ctl.switch("green").unwrap();

    // Assert
    assert_eq!(applied.pool, PoolLabel::Green);
    assert_eq!(applied.mode, ActivationMode::WarmSwitch);
    assert_eq!(applied.primary.address, "app_green:3000");
    assert_eq!(applied.primary.release_id, "green-v1");
    assert_eq!(applied.backup.address, "app_blue:3000");
    assert_eq!(applied.proxy_pid, FAKE_PID);
    assert!(applied.changed);

    assert_eq!(live_pool(dir.path()), PoolLabel::Green);
    assert_eq!(proxy.reloads(), 1);
    assert_eq!(proxy.launches(), 0);
}

#[test]
fn checked_bytes_are_the_committed_bytes() {
    let dir = tempdir().unwrap();
    let (ctl, proxy) = controller(dir.path());

    ctl.switch("blue").unwrap();

    let committed = fs::read_to_string(dir.path().join("nginx/nginx.conf")).unwrap();
    assert_eq!(proxy.checks(), vec![committed]);
}

#[test]
fn invalid_selection_has_no_side_effects() {
    // Arrange
    let dir = tempdir().unwrap();
    let (ctl, proxy) = controller(dir.path());
    let artifact = dir.path().join("nginx/nginx.conf");

    for input in ["yellow", "", "BLUE"] {
        // Act
        let err = ctl.switch(input).unwrap_err();

        // Assert
        assert!(
            matches!(err, ActivationError::InvalidPoolSelection { input: ref got } if got == input),
            "{input:?}: {err:?}"
        );
        assert_eq!(err.exit_code(), 2);
    }

    assert!(!artifact.exists());
    assert!(!lock_path(&artifact).exists());
    assert!(proxy.checks().is_empty());
    assert_eq!(proxy.reloads(), 0);
}

#[test]
fn rejected_config_leaves_prior_artifact_in_place() {
    // Arrange
    let dir = tempdir().unwrap();
    let (ctl, proxy) = controller(dir.path());
    ctl.switch("blue").unwrap();
    let before = fs::read(dir.path().join("nginx/nginx.conf")).unwrap();
    proxy.reject("nginx: [emerg] host not found in upstream");

    // Act
    let err = ctl.switch("green").unwrap_err();

    // Assert
    let ActivationError::ValidationFailed { pool, source } = &err else {
        panic!("expected ValidationFailed, got {err:?}");
    };
    assert_eq!(*pool, PoolLabel::Green);
    assert!(matches!(source, ValidationError::Rejected { .. }));
    assert_eq!(
        source.details(),
        vec!["nginx: [emerg] host not found in upstream".to_string()]
    );
    assert_eq!(err.exit_code(), 4);

    assert_eq!(fs::read(dir.path().join("nginx/nginx.conf")).unwrap(), before);
    assert_eq!(proxy.reloads(), 1);
    assert_eq!(entries(&dir.path().join("nginx")), vec!["nginx.conf", "nginx.conf.lock"]);
}

#[test]
fn reload_failure_reports_divergence() {
    // Arrange
    let dir = tempdir().unwrap();
    let (ctl, proxy) = controller(dir.path());
    proxy.fail_reload.store(true, Ordering::SeqCst);

    // Act
    let err = ctl.switch("green").unwrap_err();

    // Assert
    assert!(matches!(err, ActivationError::ReloadFailed { pool: PoolLabel::Green, .. }));
    assert!(err.to_string().contains("diverged"));
    assert_eq!(err.exit_code(), 5);
    // on disk already reflects the new selection
    assert_eq!(live_pool(dir.path()), PoolLabel::Green);
}

#[test]
fn reactivating_current_pool_is_idempotent() {
    let dir = tempdir().unwrap();
    let (ctl, proxy) = controller(dir.path());

    let first = ctl.switch("green").unwrap();
    let second = ctl.switch("green").unwrap();

    assert!(first.changed);
    assert!(!second.changed);
    assert_ne!(first.activation_id, second.activation_id);
    assert_eq!(proxy.reloads(), 2);
    assert_eq!(live_pool(dir.path()), PoolLabel::Green);
}

#[test]
fn cold_start_launches_instead_of_reloading() {
    // Arrange
    let dir = tempdir().unwrap();
    let (ctl, proxy) = controller(dir.path());

    // Act
    let (applied, process) = ctl.cold_start("blue").unwrap();

    // Assert
    assert_eq!(applied.mode, ActivationMode::ColdStart);
    assert_eq!(process.pid(), FAKE_PID);
    assert_eq!(proxy.launches(), 1);
    assert_eq!(proxy.reloads(), 0);
    assert_eq!(live_pool(dir.path()), PoolLabel::Blue);
}

#[test]
fn launch_failure_is_reported() {
    let dir = tempdir().unwrap();
    let (ctl, proxy) = controller(dir.path());
    proxy.fail_launch.store(true, Ordering::SeqCst);

    let err = ctl.cold_start("blue").unwrap_err();

    assert!(matches!(err, ActivationError::LaunchFailed { .. }));
    assert_eq!(err.exit_code(), 6);
}

#[test]
fn check_never_touches_the_artifact() {
    let dir = tempdir().unwrap();
    let (ctl, proxy) = controller(dir.path());

    let rendered = ctl.check("green").unwrap();

    assert_eq!(rendered.active, PoolLabel::Green);
    assert_eq!(proxy.checks().len(), 1);
    assert!(!dir.path().join("nginx/nginx.conf").exists());
    assert_eq!(proxy.reloads(), 0);
}

#[test]
fn malformed_host_fails_lint_before_proxy_check() {
    // Arrange
    let dir = tempdir().unwrap();
    write_config(dir.path(), "app green;");
    let cfg = load_config(dir.path(), &EnvOverrides::none()).unwrap();
    let proxy = Arc::new(FakeProxy::default());
    let ctl = ActivationController::new(cfg, proxy.clone());

    // Act
    let err = ctl.switch("blue").unwrap_err();

    // Assert
    let ActivationError::ValidationFailed { source, .. } = &err else {
        panic!("expected ValidationFailed, got {err:?}");
    };
    assert!(matches!(source, ValidationError::Lint { .. }));
    assert!(proxy.checks().is_empty());
    assert!(!dir.path().join("nginx/nginx.conf").exists());
}

#[test]
fn malformed_green_entry_from_environment_is_a_validation_failure() {
    for (key, value) in [("GREEN_PORT", "0"), ("GREEN_HOST", "")] {
        // Arrange
        let dir = tempdir().unwrap();
        let (ctl, proxy) = controller(dir.path());
        ctl.switch("blue").unwrap();
        let artifact = dir.path().join("nginx/nginx.conf");
        let before = fs::read(&artifact).unwrap();

        let env = EnvOverrides::from_pairs([(key, value)]);
        ctl.replace_config(load_config(dir.path(), &env).unwrap());

        // Act
        let err = ctl.switch("green").unwrap_err();

        // Assert
        let ActivationError::ValidationFailed { pool, source } = &err else {
            panic!("{key}={value:?}: expected ValidationFailed, got {err:?}");
        };
        assert_eq!(*pool, PoolLabel::Green);
        assert!(matches!(source, ValidationError::Lint { .. }), "{key}={value:?}");
        assert_eq!(err.exit_code(), 4);
        assert_eq!(fs::read(&artifact).unwrap(), before);
        assert_eq!(proxy.reloads(), 1);
    }
}

#[test]
fn replaced_config_applies_to_next_activation() {
    // Arrange
    let dir = tempdir().unwrap();
    let (ctl, _proxy) = controller(dir.path());
    ctl.switch("blue").unwrap();

    let mut cfg = (*ctl.config()).clone();
    cfg.registry = crate::pool::PoolRegistry::new(
        crate::pool::Pool::new(PoolLabel::Blue, "app_blue", 3000, "blue-v2"),
        crate::pool::Pool::new(PoolLabel::Green, "app_green", 3000, "green-v1"),
    );

    // Act
    ctl.replace_config(cfg);
    let applied = ctl.switch("blue").unwrap();

    // Assert
    assert_eq!(applied.primary.release_id, "blue-v2");
}

#[test]
fn concurrent_switches_are_serialized() {
    // Arrange
    let dir = tempdir().unwrap();
    let proxy = Arc::new(FakeProxy {
        check_delay: Some(Duration::from_millis(10)),
        ..FakeProxy::default()
    });
    let ctl = Arc::new(ActivationController::new(runtime_config(dir.path()), proxy.clone()));

    // Act
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let ctl = ctl.clone();
            thread::spawn(move || ctl.switch(if i % 2 == 0 { "blue" } else { "green" }))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Assert
    assert!(results.iter().all(Result::is_ok));
    assert!(!proxy.overlapped.load(Ordering::SeqCst));
    assert_eq!(proxy.reloads(), 8);
    assert_eq!(entries(&dir.path().join("nginx")), vec!["nginx.conf", "nginx.conf.lock"]);
}

#[test]
fn separate_controllers_share_the_file_lock() {
    // Arrange
    let dir = tempdir().unwrap();
    let proxy = Arc::new(FakeProxy {
        check_delay: Some(Duration::from_millis(10)),
        ..FakeProxy::default()
    });
    let cfg = runtime_config(dir.path());

    // Act
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let ctl = ActivationController::new(cfg.clone(), proxy.clone());
            thread::spawn(move || ctl.switch(if i % 2 == 0 { "blue" } else { "green" }))
        })
        .collect();

    // Assert
    for h in handles {
        h.join().unwrap().unwrap();
    }
    assert!(!proxy.overlapped.load(Ordering::SeqCst));
}

#[test]
fn pool_errors_map_to_activation_errors() {
    let err: ActivationError = PoolError::UnknownPool { name: "red".into() }.into();
    assert!(matches!(err, ActivationError::UnknownPool { ref name } if name == "red"));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(err.kind(), "unknown_pool");
}
