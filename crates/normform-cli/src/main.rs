//! normform CLI - normal-form classification and decomposition.

mod cli;
mod commands;
mod logging;
mod server;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.log_json) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Classify { input, json } => commands::classify::run(input, json, cli.verbose),

        Commands::Normalize {
            input,
            target,
            current,
            output,
            json,
        } => commands::normalize::run(input, target, current, output, json, cli.verbose),

        Commands::Serve { host, port } => commands::serve::run(host, port),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
