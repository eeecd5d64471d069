//! CLI module for the ToadLester reconcile tool.
//!
//! This module provides the command-line interface for driving a
//! ToadLester service from a manifest or from one-off settings.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat, SettingArgs};
pub use output::OutputFormatter;
