// CLI binary entry point for tagforge

mod cli;

use clap::Parser;
use cli::{Config, OutputFormatter};
use std::process;

fn main() {
    let config = Config::parse();

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let formatter = OutputFormatter::new(config.format, config.quiet);
    if let Err(e) = cli::run(&config, &formatter) {
        formatter.print_error(&format!("{:#}", e));
        process::exit(1);
    }
}
