use clap::{Parser, Subcommand};
use std::path::PathBuf;
use switchyard_core::cli;
use switchyard_core::cli::conf::ConfigCmd;
use switchyard_core::logging::init_logging;
use switchyard_core::server::{self, RunOptions};

#[derive(Parser, Debug)]
#[command(
    name = "switchyard",
    version,
    about = "Blue/green pool switching for nginx"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Make <POOL> primary on the running proxy (graceful reload)
    Switch {
        /// `blue` or `green`
        pool: String,

        /// Path to the config directory or switchyard.hcl
        #[arg(long, default_value = "config")]
        config: PathBuf,

        /// Print the activation report as JSON
        #[arg(long)]
        json: bool,

        /// Ignore environment overrides
        #[arg(long)]
        no_env: bool,
    },

    /// Cold-start nginx and supervise it
    Run {
        #[arg(long, default_value = "config")]
        config: PathBuf,

        /// Pool to start with, instead of the declared active_pool
        #[arg(long)]
        pool: Option<String>,

        #[arg(long)]
        no_env: bool,
    },

    /// Print the rendered nginx configuration
    Render {
        pool: Option<String>,

        #[arg(long, default_value = "config")]
        config: PathBuf,

        #[arg(long)]
        no_env: bool,
    },

    /// Render and validate without applying
    Check {
        pool: Option<String>,

        #[arg(long, default_value = "config")]
        config: PathBuf,

        #[arg(long)]
        no_env: bool,
    },

    /// Show the live pool and proxy state
    Status {
        #[arg(long, default_value = "config")]
        config: PathBuf,

        #[arg(long)]
        json: bool,

        #[arg(long)]
        no_env: bool,
    },

    /// Ask a running supervisor to reload its configuration
    Reload {
        #[arg(long, default_value = "config")]
        config: PathBuf,
    },

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

fn main() {
    let cli = Cli::parse();

    init_logging();

    let result = match cli.command {
        Command::Switch {
            pool,
            config,
            json,
            no_env,
        } => cli::switch(config, pool, json, no_env),

        Command::Run {
            config,
            pool,
            no_env,
        } => {
            let opts = RunOptions {
                config_root: config,
                env: cli::env_overrides(no_env),
                pool,
            };
            match server::run(opts) {
                Ok(code) => std::process::exit(code),
                Err(e) => Err(e),
            }
        }

        Command::Render {
            pool,
            config,
            no_env,
        } => cli::render(config, pool, no_env),

        Command::Check {
            pool,
            config,
            no_env,
        } => cli::check(config, pool, no_env),

        Command::Status {
            config,
            json,
            no_env,
        } => cli::status(config, json, no_env),

        Command::Reload { config } => cli::reload(config),

        Command::Config { cmd } => cli::conf::run(cmd),
    };

    if let Err(e) = result {
        let code = cli::exit_code(&e);
        tracing::debug!(exit_code = code, "command failed");
        eprintln!("error: {e:#}");
        std::process::exit(code);
    }
}
