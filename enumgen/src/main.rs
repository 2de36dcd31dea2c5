mod cli;
mod commands;
mod workspace_scanner;

use clap::Parser;
use cli::{Cli, Commands};
use enumgen_core::error::Result;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("enumgen: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Generate(args)) => commands::generate::run(cli, args.clone()),
        Some(Commands::Inspect(args)) => commands::inspect::run(cli, args.clone()),
        Some(Commands::Init(args)) => commands::init::run(cli, args.clone()),
        None => commands::generate::run_default(cli),
    }
}

/// RUST_LOG wins; otherwise the level follows -q / -v.
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
