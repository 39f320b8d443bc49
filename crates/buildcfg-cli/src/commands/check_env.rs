//! The check-env command

use buildcfg_core::{
    CommandLine, ImmutableConfiguration, MismatchPolicy, SharedEnvironmentPlanner, TargetRequest,
    UniqueReason,
};
use buildcfg_meta::TargetType;
use colored::Colorize;

use super::{identity, pipeline};
use crate::cli::SourceArgs;
use crate::error::{CliError, Result};

/// Parse `NAME:TYPE[:ARGS]`.
fn parse_target(text: &str, sources: &SourceArgs) -> Result<TargetRequest> {
    let mut parts = text.splitn(3, ':');
    let (Some(name), Some(target_type)) = (parts.next(), parts.next()) else {
        return Err(CliError::user(format!(
            "Invalid target '{}': expected NAME:TYPE[:ARGS]",
            text
        )));
    };
    let target_type: TargetType = target_type.parse()?;
    let command_line = parts.next().map(CommandLine::parse).unwrap_or_default();

    Ok(TargetRequest::new(identity(name, sources)?, target_type).with_command_line(command_line))
}

/// Run the check-env command
pub fn run_check_env(
    targets: &[String],
    policy: &str,
    sources: &SourceArgs,
    json: bool,
) -> Result<()> {
    let policy: MismatchPolicy = policy.parse()?;
    let requests = targets
        .iter()
        .map(|text| parse_target(text, sources))
        .collect::<Result<Vec<_>>>()?;

    let configs = pipeline(sources)?
        .build_many(&requests)
        .into_iter()
        .collect::<buildcfg_core::Result<Vec<ImmutableConfiguration>>>()?;

    let plan = match SharedEnvironmentPlanner::new(policy).plan(&configs) {
        Ok(plan) => plan,
        Err(buildcfg_core::Error::InconsistentEnvironment { report }) => {
            eprint!("{}", report);
            return Err(buildcfg_core::Error::InconsistentEnvironment { report }.into());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if let Some(reference) = &plan.reference {
        println!("{} {}", "Reference:".bold(), reference.green());
    }
    println!("{}", "Shared environment:".bold());
    for name in &plan.shared {
        println!("  {} {}", "+".green(), name);
    }
    if !plan.unique.is_empty() {
        println!("{}", "Unique environments:".bold());
        for target in &plan.unique {
            match &target.reason {
                UniqueReason::Requested => {
                    println!("  {} {} (requested)", "*".cyan(), target.name);
                }
                UniqueReason::Inconsistent(report) => {
                    println!("  {} {} (forced)", "!".yellow(), target.name);
                    for line in report.to_string().lines().skip(1) {
                        println!("    {}", line.trim_start().dimmed());
                    }
                }
            }
        }
    }

    Ok(())
}
