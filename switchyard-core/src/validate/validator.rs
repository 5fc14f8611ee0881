use crate::proxy::{ProxyControl, ProxyError};
use crate::render::RenderedConfig;
use crate::validate::ValidationError;
use crate::validate::lint::lint;
use std::path::Path;

/// Validates a rendered configuration in the exact file it was staged to.
pub struct ConfigValidator<'a> {
    proxy: &'a dyn ProxyControl,
}

impl<'a> ConfigValidator<'a> {
    pub fn new(proxy: &'a dyn ProxyControl) -> Self {
        Self { proxy }
    }

    pub fn validate(
        &self,
        rendered: &RenderedConfig,
        staged: &Path,
    ) -> Result<(), ValidationError> {
        let problems = lint(rendered);
        if !problems.is_empty() {
            return Err(ValidationError::Lint { problems });
        }

        match self.proxy.check(staged) {
            Ok(()) => Ok(()),
            Err(ProxyError::CheckRejected { output, .. }) => {
                Err(ValidationError::Rejected { output })
            }
            Err(source) => Err(ValidationError::CheckUnavailable { source }),
        }
    }
}
