use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{ConfigLoader, CONFIG_ENV};

pub mod commands;

use self::commands::{DecodeArgs, EncodeArgs, StatsArgs};

#[derive(Parser, Debug)]
#[command(
    name = "journal",
    version,
    about = "Formatting span codec and weekly statistics for journal notes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file location (takes precedence over JOURNAL_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Flatten styled text JSON into a formatting span list
    Encode(EncodeArgs),
    /// Rebuild styled text from a note's content and formattings
    Decode(DecodeArgs),
    /// Print weekly note counts and streaks for a list of notes
    Stats(StatsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var(CONFIG_ENV, path);
    }

    init_tracing(&cli.log_level)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;

    match cli.command {
        Commands::Encode(args) => commands::encode(args),
        Commands::Decode(args) => commands::decode(args),
        Commands::Stats(args) => {
            let loader = ConfigLoader::discover()?;
            let config = loader.load_or_init()?;
            commands::stats(&config, args)
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow::anyhow!("{err}"))
    })
    .map(|_| ())
}
