use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("invalid pool selection '{input}': expected 'blue' or 'green'")]
    InvalidPoolSelection { input: String },

    #[error("pool '{name}' is not registered")]
    UnknownPool { name: String },
}
