//! fintrack main entry point

mod commands;
mod render;

use clap::Parser;
use fintrack_config::{Config, ConfigError};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use commands::Command;

#[derive(Parser, Debug)]
#[command(name = "fintrack")]
#[command(author = "fintrack Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Track incomes, expenses, categories and budgets", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: PathBuf,

    /// Use the built-in sample data instead of the backend
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (config, missing) = match Config::load(&args.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(error) => {
            eprintln!("{}", error.to_details());
            return Err(error.into());
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if missing {
        log::warn!(
            "Config file {} not found, using defaults",
            args.config.display()
        );
    } else {
        log::debug!("Config loaded from {}", args.config.display());
    }
    commands::check_config(&config)?;

    let rt = Runtime::new()?;
    rt.block_on(commands::run(args.command, config, args.offline))
}
