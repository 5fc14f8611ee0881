//! nginx configuration rendering.
//!
//! ```text
//! PoolLabel + PoolRegistry + settings
//!        |
//!    Renderer::render
//!        |
//! RenderedConfig (primary, backup, text)
//! ```
//!
//! The active pool is written as the sole primary upstream member and the
//! other pool as `backup`, so nginx only sends traffic to the backup while
//! the primary is failing.

mod inspect;
mod rendered;
mod renderer;
mod writer;

pub use inspect::{ArtifactMarker, UpstreamMember, read_marker, upstream_members};
pub use rendered::RenderedConfig;
pub use renderer::Renderer;
pub use writer::{is_bare_word, is_directive_args};
