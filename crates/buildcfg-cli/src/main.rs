//! buildcfg CLI
//!
//! Resolves target build configurations and checks which targets can share
//! a build environment.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose { "debug" } else { "info" };
    if let Err(e) = buildcfg_core::logging::init(directive) {
        eprintln!("{} {}", "warning:".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} target build configuration", "buildcfg".green().bold());
            println!();
            println!("Run {} for available commands.", "buildcfg --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Resolve {
            name,
            target_type,
            sources,
            json,
            args,
        } => commands::run_resolve(&name, &target_type, &sources, &args, json),
        Commands::CheckEnv {
            targets,
            policy,
            sources,
            json,
        } => commands::run_check_env(&targets, &policy, &sources, json),
        Commands::Fields { group, sensitive } => commands::run_fields(group.as_deref(), sensitive),
    }
}
