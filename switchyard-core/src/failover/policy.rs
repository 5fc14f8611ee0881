use crate::failover::FailureSignal;
use serde::Serialize;
use std::time::Duration;

/// Tuning for the proxy's passive failure detection.
///
/// Timeouts are kept in the single-digit-seconds range so that a dead primary
/// costs a client at most a few seconds before the backup answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailoverPolicy {
    pub connect_timeout: Duration,
    pub send_timeout: Duration,
    pub read_timeout: Duration,

    /// Failed attempts within `fail_timeout` before the primary is skipped.
    pub max_fails: u32,
    pub fail_timeout: Duration,

    /// Upper bound on upstream attempts per client request.
    pub tries: u32,
    pub retry_on: Vec<FailureSignal>,
    pub retry_non_idempotent: bool,

    /// Idle upstream connections kept open per worker.
    pub keepalive: u32,
}

impl Default for FailoverPolicy {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
            send_timeout: Duration::from_secs(3),
            read_timeout: Duration::from_secs(3),
            max_fails: 1,
            fail_timeout: Duration::from_secs(5),
            tries: 2,
            retry_on: FailureSignal::DEFAULT.to_vec(),
            retry_non_idempotent: false,
            keepalive: 32,
        }
    }
}

impl FailoverPolicy {
    /// Whether an attempt outcome carrying `signal` moves the request on.
    pub fn retries_on(&self, signal: FailureSignal) -> bool {
        self.retry_on.contains(&signal)
    }

    /// Arguments of the `proxy_next_upstream` directive, in canonical order.
    pub fn next_upstream_args(&self) -> Vec<&'static str> {
        let mut args: Vec<&'static str> = FailureSignal::DEFAULT
            .iter()
            .filter(|s| self.retries_on(**s))
            .map(|s| s.directive_arg())
            .collect();

        if args.is_empty() {
            args.push("off");
        } else if self.retry_non_idempotent {
            args.push("non_idempotent");
        }

        args
    }

    /// Parameters appended to the primary upstream member.
    pub fn primary_member_args(&self) -> Vec<String> {
        vec![
            format!("max_fails={}", self.max_fails),
            format!("fail_timeout={}", secs(self.fail_timeout)),
        ]
    }
}

/// nginx time value in whole seconds.
pub(crate) fn secs(d: Duration) -> String {
    format!("{}s", d.as_secs())
}
