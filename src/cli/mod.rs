// Command-line front end, compiled into the binary only

pub mod commands;
pub mod config;
pub mod output;

pub use commands::run;
pub use config::Config;
pub use output::OutputFormatter;
