mod deployment;
mod pool;
mod proxy;
pub mod tracing;

pub use deployment::{Deployment, free_port, header, nginx_available, wait_for_port};
pub use pool::{MockPool, PoolMode};
pub use proxy::RecordingProxy;
pub use tracing::{CapturedEvent, events, init_test_tracing};
