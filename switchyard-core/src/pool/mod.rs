mod error;
mod label;
mod registry;

pub use error::PoolError;
pub use label::PoolLabel;
pub use registry::{Pool, PoolRegistry};
