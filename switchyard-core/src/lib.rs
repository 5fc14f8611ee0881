pub mod activation;
pub mod cli;
pub mod conf;
pub mod failover;
pub mod logging;
pub mod pool;
pub mod proxy;
pub mod render;
pub mod server;
pub mod validate;
