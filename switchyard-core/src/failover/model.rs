use crate::failover::{AttemptOutcome, FailoverPolicy};
use crate::pool::{Pool, PoolLabel};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;

/// nginx defaults for a `server` line without `max_fails`/`fail_timeout`,
/// which is how the backup member is rendered.
const DEFAULT_MAX_FAILS: u32 = 1;
const DEFAULT_FAIL_TIMEOUT: Duration = Duration::from_secs(10);

/// The response a client ends up receiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub pool: PoolLabel,
    pub release_id: String,
    pub status: u16,
    pub attempts: u32,
}

/// `last` is `None` when every member was marked down and none was tried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no upstream could serve the request after {attempts} attempt(s) (last outcome: {last:?})")]
pub struct UpstreamUnavailable {
    pub attempts: u32,
    pub last: Option<AttemptOutcome>,
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    max_fails: u32,
    fail_timeout: Duration,
}

#[derive(Debug, Clone, Copy, Default)]
struct MemberHealth {
    fails: u32,
    last_failure: Option<Instant>,
}

impl MemberHealth {
    fn in_window(&self, limits: Limits, now: Instant) -> bool {
        self.last_failure
            .is_some_and(|at| now.saturating_duration_since(at) <= limits.fail_timeout)
    }

    fn is_down(&self, limits: Limits, now: Instant) -> bool {
        self.fails >= limits.max_fails && self.in_window(limits, now)
    }

    fn record_failure(&mut self, limits: Limits, now: Instant) {
        if !self.in_window(limits, now) {
            self.fails = 0;
        }
        self.fails += 1;
        self.last_failure = Some(now);
    }
}

/// Failure counts nginx keeps per upstream member between requests.
///
/// A member with `max_fails` failures inside `fail_timeout` is skipped until
/// `fail_timeout` has passed since its last failure. Successes do not clear
/// the count early; the window expiring does.
#[derive(Debug, Clone, Default)]
pub struct PassiveHealth {
    members: HashMap<String, MemberHealth>,
}

impl PassiveHealth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `pool`, as primary of `policy`, is currently skipped.
    pub fn is_marked_down(&self, policy: &FailoverPolicy, pool: &Pool, now: Instant) -> bool {
        self.member(&pool.address()).is_down(primary_limits(policy), now)
    }

    fn member(&self, address: &str) -> MemberHealth {
        self.members.get(address).copied().unwrap_or_default()
    }
}

fn primary_limits(policy: &FailoverPolicy) -> Limits {
    Limits {
        max_fails: policy.max_fails,
        fail_timeout: policy.fail_timeout,
    }
}

const BACKUP_LIMITS: Limits = Limits {
    max_fails: DEFAULT_MAX_FAILS,
    fail_timeout: DEFAULT_FAIL_TIMEOUT,
};

impl FailoverPolicy {
    /// Model one client request at `now` against an active configuration.
    ///
    /// Members currently marked down in `health` are skipped without an
    /// attempt. The rest are tried in order, each at most once, and never
    /// more than `tries` in total. Every failure that moves the request on is
    /// recorded against its member. A transport failure on the last attempt
    /// surfaces as [`UpstreamUnavailable`]; a 5xx on the last attempt is
    /// relayed as-is.
    pub fn serve<F>(
        &self,
        health: &mut PassiveHealth,
        now: Instant,
        primary: &Pool,
        backup: &Pool,
        mut attempt: F,
    ) -> Result<Served, UpstreamUnavailable>
    where
        F: FnMut(&Pool) -> AttemptOutcome,
    {
        let members = [(primary, primary_limits(self)), (backup, BACKUP_LIMITS)];
        let budget = self.tries.max(1);

        let mut attempts = 0;
        let mut last = None;

        for (pool, limits) in members {
            if attempts == budget {
                break;
            }

            let address = pool.address();
            if health.member(&address).is_down(limits, now) {
                tracing::debug!(pool = %pool.label, %address, "member marked down; skipped");
                continue;
            }

            attempts += 1;
            let outcome = attempt(pool);

            let retryable = outcome.signal().is_some_and(|s| self.retries_on(s));
            if !retryable {
                return settle(pool, outcome, attempts);
            }

            health
                .members
                .entry(address)
                .or_default()
                .record_failure(limits, now);

            tracing::debug!(
                pool = %pool.label,
                attempt = attempts,
                outcome = ?outcome,
                "upstream attempt failed"
            );
            last = Some((pool, outcome));
        }

        match last {
            Some((pool, outcome)) => settle(pool, outcome, attempts),
            None => Err(UpstreamUnavailable {
                attempts,
                last: None,
            }),
        }
    }
}

fn settle(
    pool: &Pool,
    outcome: AttemptOutcome,
    attempts: u32,
) -> Result<Served, UpstreamUnavailable> {
    match outcome {
        AttemptOutcome::Responded { status } => Ok(Served {
            pool: pool.label,
            release_id: pool.release_id.clone(),
            status,
            attempts,
        }),
        other => Err(UpstreamUnavailable {
            attempts,
            last: Some(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failover::FailureSignal;

    fn pools() -> (Pool, Pool) {
        (
            Pool::new(PoolLabel::Blue, "app_blue", 3000, "blue-v1"),
            Pool::new(PoolLabel::Green, "app_green", 3000, "green-v1"),
        )
    }

    /// One request against fresh passive health.
    fn serve_once<F>(policy: &FailoverPolicy, attempt: F) -> Result<Served, UpstreamUnavailable>
    where
        F: FnMut(&Pool) -> AttemptOutcome,
    {
        let (blue, green) = pools();
        policy.serve(&mut PassiveHealth::new(), Instant::now(), &blue, &green, attempt)
    }

    fn ok() -> AttemptOutcome {
        AttemptOutcome::Responded { status: 200 }
    }

    fn blue_fails_with(outcome: AttemptOutcome) -> impl Fn(&Pool) -> AttemptOutcome {
        move |p: &Pool| match p.label {
            PoolLabel::Blue => outcome,
            PoolLabel::Green => ok(),
        }
    }

    #[test]
    fn healthy_primary_serves_without_touching_backup() {
        let mut seen = Vec::new();

        let served = serve_once(&FailoverPolicy::default(), |p| {
            seen.push(p.label);
            ok()
        })
        .unwrap();

        assert_eq!(served.pool, PoolLabel::Blue);
        assert_eq!(served.release_id, "blue-v1");
        assert_eq!(served.attempts, 1);
        assert_eq!(seen, vec![PoolLabel::Blue]);
    }

    #[test]
    fn primary_failures_fall_through_to_backup() {
        let policy = FailoverPolicy::default();

        for failure in [
            AttemptOutcome::ConnectError,
            AttemptOutcome::Timeout,
            AttemptOutcome::Responded { status: 500 },
            AttemptOutcome::Responded { status: 503 },
        ] {
            let served = serve_once(&policy, blue_fails_with(failure)).unwrap();

            assert_eq!(served.pool, PoolLabel::Green, "failure {failure:?}");
            assert_eq!(served.release_id, "green-v1");
            assert_eq!(served.attempts, 2);
        }
    }

    #[test]
    fn client_errors_are_relayed_from_primary() {
        let policy = FailoverPolicy::default();

        let failure = AttemptOutcome::Responded { status: 404 };

        let served = serve_once(&policy, blue_fails_with(failure)).unwrap();

        assert_eq!(served.pool, PoolLabel::Blue);
        assert_eq!(served.status, 404);
    }

    #[test]
    fn unlisted_signal_does_not_fail_over() {
        let policy = FailoverPolicy {
            retry_on: vec![FailureSignal::Error, FailureSignal::Timeout],
            ..FailoverPolicy::default()
        };

        let failure = AttemptOutcome::Responded { status: 500 };

        let served = serve_once(&policy, blue_fails_with(failure)).unwrap();

        assert_eq!(served.pool, PoolLabel::Blue);
        assert_eq!(served.status, 500);
    }

    #[test]
    fn single_try_never_reaches_backup() {
        let policy = FailoverPolicy {
            tries: 1,
            ..FailoverPolicy::default()
        };

        let err = serve_once(&policy, |_| AttemptOutcome::ConnectError).unwrap_err();

        assert_eq!(err.attempts, 1);
    }

    #[test]
    fn both_pools_down_is_upstream_unavailable() {
        let policy = FailoverPolicy {
            tries: 5,
            ..FailoverPolicy::default()
        };

        let err = serve_once(&policy, |_| AttemptOutcome::Timeout).unwrap_err();

        assert_eq!(err.attempts, 2, "each member is tried at most once");
        assert_eq!(err.last, Some(AttemptOutcome::Timeout));
    }

    #[test]
    fn backup_5xx_is_relayed_when_budget_is_spent() {
        let policy = FailoverPolicy::default();

        let served = serve_once(&policy, |_| AttemptOutcome::Responded { status: 502 }).unwrap();

        assert_eq!(served.pool, PoolLabel::Green);
        assert_eq!(served.status, 502);
    }

    #[test]
    fn failed_primary_is_skipped_inside_fail_timeout() {
        // Arrange
        let (blue, green) = pools();
        let policy = FailoverPolicy::default();
        let mut health = PassiveHealth::new();
        let t0 = Instant::now();
        let blue_down = blue_fails_with(AttemptOutcome::ConnectError);

        // Act
        let first = policy.serve(&mut health, t0, &blue, &green, blue_down).unwrap();

        let mut seen = Vec::new();
        let soon = t0 + Duration::from_secs(1);
        let second = policy
            .serve(&mut health, soon, &blue, &green, |p| {
                seen.push(p.label);
                ok()
            })
            .unwrap();

        // Assert
        assert_eq!(first.pool, PoolLabel::Green);
        assert_eq!(second.pool, PoolLabel::Green);
        assert_eq!(second.attempts, 1);
        assert_eq!(seen, vec![PoolLabel::Green], "primary tried while marked down");
        assert!(health.is_marked_down(&policy, &blue, t0 + policy.fail_timeout));
    }

    #[test]
    fn primary_is_preferred_again_after_fail_timeout() {
        let (blue, green) = pools();
        let policy = FailoverPolicy::default();
        let mut health = PassiveHealth::new();
        let t0 = Instant::now();

        let blue_down = blue_fails_with(AttemptOutcome::Timeout);
        policy.serve(&mut health, t0, &blue, &green, blue_down).unwrap();

        let later = t0 + policy.fail_timeout + Duration::from_secs(1);
        let served = policy.serve(&mut health, later, &blue, &green, |_| ok()).unwrap();

        assert!(!health.is_marked_down(&policy, &blue, later));
        assert_eq!(served.pool, PoolLabel::Blue);
        assert_eq!(served.attempts, 1);
    }

    #[test]
    fn max_fails_counts_failures_within_the_window() {
        // Arrange
        let (blue, green) = pools();
        let policy = FailoverPolicy {
            max_fails: 2,
            ..FailoverPolicy::default()
        };
        let mut health = PassiveHealth::new();
        let t0 = Instant::now();
        let blue_down = blue_fails_with(AttemptOutcome::Responded { status: 503 });

        // Act + Assert
        policy.serve(&mut health, t0, &blue, &green, &blue_down).unwrap();
        assert!(!health.is_marked_down(&policy, &blue, t0));

        // a failure after the window has lapsed starts a fresh count
        let lapsed = t0 + policy.fail_timeout + Duration::from_secs(1);
        policy.serve(&mut health, lapsed, &blue, &green, &blue_down).unwrap();
        assert!(!health.is_marked_down(&policy, &blue, lapsed));

        let inside = lapsed + Duration::from_secs(1);
        policy.serve(&mut health, inside, &blue, &green, &blue_down).unwrap();
        assert!(health.is_marked_down(&policy, &blue, inside));
    }

    #[test]
    fn every_member_marked_down_means_no_attempt() {
        let (blue, green) = pools();
        let policy = FailoverPolicy::default();
        let mut health = PassiveHealth::new();
        let t0 = Instant::now();

        policy
            .serve(&mut health, t0, &blue, &green, |_| AttemptOutcome::ConnectError)
            .unwrap_err();
        let soon = t0 + Duration::from_secs(1);
        let err = policy.serve(&mut health, soon, &blue, &green, |_| ok()).unwrap_err();

        assert_eq!(err.attempts, 0);
        assert_eq!(err.last, None);
    }
}
