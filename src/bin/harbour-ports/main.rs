//! harbour-ports CLI - inspect and validate port descriptors

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("harbour_ports=debug")
    } else {
        EnvFilter::new("harbour_ports=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let color = !cli.no_color;

    match cli.command {
        Commands::Check(args) => commands::check::execute(args, color),
        Commands::Depends(args) => commands::depends::execute(args),
        Commands::List(args) => commands::list::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
