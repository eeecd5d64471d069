//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::toadlester::Setting;

/// ToadLester reconcile - drive generator settings to a declared state.
#[derive(Parser, Debug)]
#[command(name = "toadlester")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the manifest file.
    #[arg(short, long, global = true, env = "TOADLESTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the ToadLester API; overrides the manifest endpoint.
    #[arg(short, long, global = true, env = "TOADLESTER_URL")]
    pub url: Option<String>,

    /// Request timeout in seconds; overrides the manifest endpoint.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Append a unique suffix to identity tags.
    #[arg(long, global = true)]
    pub unique_ids: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new sequence for a setting.
    Create(SettingArgs),

    /// Read the current value of a setting.
    Read(SettingArgs),

    /// Replace the sequence for a setting.
    Update(SettingArgs),

    /// Discard the sequence for a setting by reseeding it.
    Delete(SettingArgs),

    /// Show the full remote configuration.
    Snapshot,

    /// Validate the manifest.
    Validate {
        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// Check for drift between the manifest and the service.
    Drift,

    /// Create or update settings until the service matches the manifest.
    Apply,

    /// Probe the service's metrics endpoint.
    Health,
}

/// A setting given on the command line.
#[derive(Args, Debug, Clone)]
pub struct SettingArgs {
    /// Generator variable name (e.g. `INT_SIZE`).
    #[arg(short, long)]
    pub name: String,

    /// Value to seed the generator with.
    #[arg(long)]
    pub value: String,

    /// Read direction (up, down).
    #[arg(short, long, default_value = "up")]
    pub algo: String,
}

impl From<SettingArgs> for Setting {
    fn from(args: SettingArgs) -> Self {
        Self::new(args.name, args.value, args.algo)
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
