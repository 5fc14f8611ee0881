mod runtime;
mod spec;

pub use runtime::RuntimeConfig;
pub use spec::{
    FailoverConfig, HeadersConfig, PoolConfig, PoolsConfig, ProxyConfig, ServerConfig,
    SwitchyardSpec,
};
