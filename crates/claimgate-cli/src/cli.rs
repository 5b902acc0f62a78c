//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

/// Main CLI application structure
#[derive(Parser, Debug)]
#[command(
    name = "claimgate",
    version,
    about = "Issue, verify and inspect HS256 bearer tokens",
    long_about = "Claimgate issues HS256 JSON Web Tokens and verifies them into claims identities.\n\n\
                  Settings come from claimgate.toml (or --config) and CLAIMGATE_* environment\n\
                  variables, e.g. CLAIMGATE_SIGN_KEY or CLAIMGATE_VALIDATION__VALIDATE_EXP.\n\n\
                  SECURITY WARNINGS:\n\
                  - Tokens passed as arguments may end up in shell history; use '-' to read stdin\n\
                  - Keep the signing key out of config files checked into version control"
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (default: ./claimgate.toml if present)
    #[arg(long, short = 'c', global = true, env = "CLAIMGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Enable verbose logging (-v, -vv, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all logging except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Issue a signed token for a user
    Issue {
        /// Username written to `sub` and `name`
        username: String,

        /// Role to include (repeatable; defaults to the configured roles)
        #[arg(long = "role", short = 'r')]
        roles: Vec<String>,

        /// Token lifetime in minutes
        #[arg(long, short = 'l')]
        lifetime: Option<u32>,
    },

    /// Verify a token and print the resulting identity
    Verify {
        /// Token, or '-' to read it from stdin
        token: String,

        /// Reject expired and not-yet-valid tokens
        #[arg(long)]
        enforce_lifetime: bool,

        /// Clock skew tolerance in seconds when enforcing lifetime
        #[arg(long, default_value_t = 0, requires = "enforce_lifetime")]
        leeway: u64,

        /// Fail unless the identity holds this role
        #[arg(long)]
        role: Option<String>,
    },

    /// Verify a token and print its claim set
    Decode {
        /// Token, or '-' to read it from stdin
        token: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Human,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    Compact,
}

impl Cli {
    /// Log level selected by `--quiet` / `-v`
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,
                1 => Level::INFO,
                2 => Level::DEBUG,
                _ => Level::TRACE,
            }
        }
    }

    /// Initialize the tracing subscriber
    ///
    /// Logs go to stderr so stdout carries only command output.
    pub fn init_tracing(&self) {
        tracing_subscriber::fmt()
            .with_max_level(self.log_level())
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .init();
    }
}
