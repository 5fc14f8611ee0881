//! Pool activation.
//!
//! One pipeline, ending in a reload or a launch:
//!
//! ```text
//! parse ─ lock ─ select ─ render ─ stage ─ validate ─ commit ─┬─ reload (warm)
//!                                                             └─ launch (cold)
//! ```
//!
//! `select` is the requested pool, or for `reapply` the pool recorded in the
//! live artifact. A failure before `commit` leaves the live artifact untouched.

mod controller;
mod error;
mod lock;
mod report;
mod staging;

#[cfg(test)]
pub(crate) mod tests;

pub use controller::ActivationController;
pub use error::ActivationError;
pub use lock::lock_path;
pub use report::{ActivationMode, Applied, PoolSummary};
