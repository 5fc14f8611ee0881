use crate::activation::ActivationError;
use crate::conf::ConfigError;
use crate::pool::PoolError;

pub const CONFIG_ERROR: i32 = 8;

/// Process exit code for a failed command.
///
/// | code | cause |
/// |------|-------|
/// | 2 | invalid pool selection |
/// | 3 | unknown pool |
/// | 4 | validation failed |
/// | 5 | reload failed |
/// | 6 | launch failed |
/// | 7 | artifact write failed |
/// | 8 | configuration could not be loaded |
/// | 1 | anything else |
pub fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ActivationError>() {
            return e.exit_code();
        }
        if let Some(e) = cause.downcast_ref::<PoolError>() {
            return ActivationError::from(e.clone()).exit_code();
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return CONFIG_ERROR;
        }
    }
    1
}

/// An error and all of its sources on one line.
pub fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
