//! emonwire - Configuration validator for CT-clamp energy monitors
//!
//! Binary entry point: parses the command line, initializes logging and
//! runs the selected subcommand.

use clap::Parser;
use emonwire::cli::EmonWireCli;
use emonwire::logging::{init_logging, LogConfig};

fn main() {
    let cli = EmonWireCli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::from_env()
    };
    if let Err(e) = init_logging(&log_config) {
        eprintln!("failed to initialize logging: {}", e);
    }

    if let Err(e) = cli.execute() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
