//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::mirror::{COOLDOWN_MS, DEBOUNCE_MS};

/// Docket documentation toolkit CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check local links in every markdown document
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },

    /// Print the compiled navigation sidebar as JSON
    Sidebar {
        #[command(flatten)]
        args: SidebarArgs,
    },

    /// Mirror the documents into a staging tree and keep it in sync
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        args: ServeArgs,
    },
}

/// Check command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Documents root directory
    #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub path: PathBuf,

    /// Print the broken-link mapping as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Sidebar command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct SidebarArgs {
    /// Documents root directory
    #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub path: PathBuf,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Serve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Documents root directory
    #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub path: PathBuf,

    /// Quiet period before navigation is regenerated (milliseconds)
    #[arg(long, default_value_t = DEBOUNCE_MS)]
    pub debounce_ms: u64,

    /// Period after a regeneration during which changes don't schedule another (milliseconds)
    #[arg(long, default_value_t = COOLDOWN_MS)]
    pub cooldown_ms: u64,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Commands {
    pub const fn verbose(&self) -> bool {
        match self {
            Self::Check { args } => args.verbose,
            Self::Sidebar { args } => args.verbose,
            Self::Serve { args } => args.verbose,
        }
    }
}
