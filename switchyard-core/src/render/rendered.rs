use crate::pool::{Pool, PoolLabel};

/// A complete nginx main configuration for one activation.
///
/// `primary` and `backup` always carry different labels; `text` never
/// changes once rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConfig {
    pub active: PoolLabel,
    pub primary: Pool,
    pub backup: Pool,
    text: String,
}

impl RenderedConfig {
    pub(crate) fn new(primary: Pool, backup: Pool, text: String) -> Self {
        Self {
            active: primary.label,
            primary,
            backup,
            text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
