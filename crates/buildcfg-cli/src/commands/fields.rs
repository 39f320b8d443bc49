//! The fields command

use buildcfg_meta::{FieldKind, FieldRegistry, GroupId};
use colored::Colorize;

use crate::error::Result;

/// Run the fields command
pub fn run_fields(group: Option<&str>, sensitive_only: bool) -> Result<()> {
    let filter: Option<GroupId> = group.map(str::parse::<GroupId>).transpose()?;
    let registry = FieldRegistry::builtin();

    let mut total = 0;
    for schema in registry.groups() {
        if filter.is_some_and(|g| g != schema.id()) {
            continue;
        }

        let fields: Vec<_> = schema
            .fields()
            .iter()
            .filter(|f| !sensitive_only || f.is_environment_sensitive())
            .collect();
        if fields.is_empty() {
            continue;
        }

        println!("{}:", schema.id().as_str().cyan().bold());
        for field in fields {
            let marker = match &field.kind {
                FieldKind::Alias(deprecation) => {
                    format!("-> {}", deprecation.replacement).as_str().yellow()
                }
                FieldKind::Stored(_) if field.is_environment_sensitive() => "env".magenta(),
                FieldKind::Stored(_) => "".normal(),
            };
            println!(
                "  {:<40} {:<24} {:<8} {}",
                field.name.green(),
                field.field_type.to_string(),
                marker,
                field.description.dimmed()
            );
            total += 1;
        }
        println!();
    }

    println!("{} {} fields.", "Total:".dimmed(), total);
    Ok(())
}
