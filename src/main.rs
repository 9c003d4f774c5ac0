//! Main entry point for refcheck CLI

use clap::Parser;
use refcheck::cli::Cli;
use refcheck::commands::execute_command;

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the default level
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    // Execute the command
    match execute_command(cli.command, cli.workspace.as_deref(), cli.config.as_deref()) {
        Ok(outcome) if outcome.is_success() => {}
        Ok(_) => {
            eprintln!("Error: referenced files are missing");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
