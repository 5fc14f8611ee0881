use crate::proxy::ProxyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("rendered configuration failed lint: {}", .problems.join("; "))]
    Lint { problems: Vec<String> },

    #[error("proxy rejected the staged configuration: {output}")]
    Rejected { output: String },

    #[error("proxy configuration check could not run")]
    CheckUnavailable {
        #[source]
        source: ProxyError,
    },
}

impl ValidationError {
    /// Human-readable detail lines, as reported to the operator.
    pub fn details(&self) -> Vec<String> {
        match self {
            ValidationError::Lint { problems } => problems.clone(),
            ValidationError::Rejected { output } => output.lines().map(str::to_string).collect(),
            ValidationError::CheckUnavailable { source } => vec![source.to_string()],
        }
    }
}
