//! Command-line interface definitions using clap

use clap::Parser;

/// snaplink - in-memory URL shortener service
#[derive(Parser, Debug)]
#[command(name = "snaplink")]
#[command(version)]
#[command(about = "A small in-memory URL shortener service", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file (default: ./config.toml if present)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Write a sample configuration file to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub generate_config: Option<String>,
}
