//! Passive failover contract.
//!
//! # Data Flow
//! ```text
//! FailoverPolicy (declared tuning)
//!     → render (upstream member flags, proxy_* directives)
//!     → nginx enforces per request:
//!         primary attempt (skipped while marked down)
//!         → failure signal? (error, timeout, configured 5xx)
//!         → failure counted; max_fails within fail_timeout marks it down
//!         → backup attempt (bounded by tries)
//!         → response relayed with the serving pool's headers
//! ```
//!
//! The controller never takes part in individual requests. `serve` is an
//! executable model of what the rendered directives make nginx do, used to
//! reason about and test the contract without a running proxy. Passive
//! health carries over between modelled requests and is evaluated against
//! the instant each request is made.

mod model;
mod policy;
mod signal;

pub use model::{PassiveHealth, Served, UpstreamUnavailable};
pub use policy::FailoverPolicy;
pub(crate) use policy::secs;
pub use signal::{AttemptOutcome, FailureSignal};
