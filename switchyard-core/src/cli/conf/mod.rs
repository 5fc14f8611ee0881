mod check;
mod dump;
mod init;

pub use check::*;
use clap::Subcommand;
pub use dump::*;
pub use init::*;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Path to config directory
        #[arg(default_value = "config")]
        path: PathBuf,

        /// Ignore environment overrides
        #[arg(long)]
        no_env: bool,
    },

    /// Print resolved configuration
    Dump {
        #[arg(default_value = "config")]
        path: PathBuf,

        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,

        /// `spec` (as written) or `runtime` (validated, with overrides)
        #[arg(long, default_value = "runtime")]
        repr: RepresentationFormat,

        /// Ignore environment overrides
        #[arg(long)]
        no_env: bool,
    },

    /// Initialize a new config directory
    Init {
        /// Path to config directory
        #[arg(default_value = "config")]
        path: PathBuf,
    },
}

pub fn run(cmd: ConfigCmd) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Check { path, no_env } => check(path, no_env),
        ConfigCmd::Dump {
            path,
            json,
            yaml,
            repr,
            no_env,
        } => dump(path, json, yaml, repr, no_env),
        ConfigCmd::Init { path } => init(path),
    }
}
