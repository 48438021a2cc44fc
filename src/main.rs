//! Docket - navigation, link checking and live staging for markdown documentation.

mod cli;
mod config;
mod core;
mod links;
mod logger;
mod mirror;
mod sidebar;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.command.verbose());

    match &cli.command {
        Commands::Check { args } => cli::check::check(args),
        Commands::Sidebar { args } => cli::sidebar::print_sidebar(args),
        Commands::Serve { args } => cli::serve::serve(args),
    }
}
