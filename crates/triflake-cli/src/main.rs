#![doc = include_str!("../README.md")]

mod command;
mod config;
mod telemetry;

use clap::Parser;
use config::{CliArgs, Command, GenerateConfig};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    telemetry::init_tracing()?;

    let mut out = command::stdout();
    match args.command {
        Command::Generate(args) => {
            let config = GenerateConfig::try_from(args)?;
            if cfg!(debug_assertions) {
                tracing::debug!("generate config: {:#?}", config);
            }
            command::generate(&config, &mut out)
        }
        Command::Inspect(args) => command::inspect(&args, &mut out),
    }
}
