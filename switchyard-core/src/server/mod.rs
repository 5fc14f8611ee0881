pub mod pid;
pub mod reload;
mod setup;

pub use reload::ReloadHandle;
pub use setup::{RunOptions, reapply, run};
