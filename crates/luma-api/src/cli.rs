//! CLI definitions for the `luma` binary.
//!
//! Uses clap derive macros for argument parsing.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Luma memory-support backend.
#[derive(Parser)]
#[command(name = "luma", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as newline-delimited JSON.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log directive when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info,sqlx=warn",
            1 => "debug,sqlx=info,hyper=info",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on. Falls back to `[server] port` in config.toml.
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Address to bind to. Falls back to `[server] host` in config.toml.
        #[arg(long, env = "LUMA_HOST")]
        host: Option<String>,
    },

    /// Apply database migrations and exit.
    Migrate,

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}
