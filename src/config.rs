//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "workclock")]
#[command(about = "Persistent work timer and role-gated navigation for one user session")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File holding the persisted timer
    #[arg(long, default_value = "workclock-store.json")]
    pub store: PathBuf,

    /// Role of the session (admin, office, worker, contractor, super_admin)
    #[arg(long, default_value = "worker")]
    pub role: String,

    /// Module to start disabled; may be repeated
    #[arg(long = "disable-module", value_name = "KEY")]
    pub disabled_modules: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
