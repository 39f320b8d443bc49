//! The resolve command

use buildcfg_core::{CommandLine, TargetConfiguration, TargetRequest, ValueOrigin};
use buildcfg_meta::{FieldLookup, TargetType};
use colored::Colorize;

use super::{identity, pipeline};
use crate::cli::SourceArgs;
use crate::error::Result;

/// Run the resolve command
pub fn run_resolve(
    name: &str,
    target_type: &str,
    sources: &SourceArgs,
    args: &[String],
    json: bool,
) -> Result<()> {
    let target_type: TargetType = target_type.parse()?;
    let request = TargetRequest::new(identity(name, sources)?, target_type)
        .with_command_line(CommandLine::new(args.iter().cloned()));

    let config = pipeline(sources)?.build(&request)?;
    tracing::debug!(target_name = name, "Resolved");

    if json {
        println!("{}", serde_json::to_string_pretty(&config.to_json()?)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Target".bold(),
        config.identity().to_string().green().bold(),
        target_type
    );

    let mut current_group = None;
    for entry in config.entries()? {
        if current_group != Some(entry.group) {
            println!();
            println!("{}:", entry.group.as_str().cyan().bold());
            current_group = Some(entry.group);
        }
        let origin = match entry.origin {
            ValueOrigin::Default => entry.origin.as_str().dimmed(),
            _ => entry.origin.as_str().yellow(),
        };
        println!("  {:<40} {} ({})", entry.field, entry.value, origin);
    }

    Ok(())
}
