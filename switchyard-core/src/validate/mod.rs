//! Pre-apply validation of rendered configuration.
//!
//! Two stages run against the staged bytes: a lint of the pool entries,
//! then the proxy's own check mode. Nothing is applied unless both pass.

mod error;
mod lint;
mod validator;

pub use error::ValidationError;
pub use lint::lint;
pub use validator::ConfigValidator;
