//! Config sources
//!
//! The resolver never reads files or argument lists itself. It asks a
//! [`ConfigSourceAdapter`] for the raw values bound to each group's fields,
//! once for the config-file layer and once for the command line.

mod command_line;
mod memory;
mod toml_file;

pub use command_line::CommandLine;
pub use memory::MemoryConfigSource;
pub use toml_file::TomlConfigSource;

use std::path::Path;

use buildcfg_meta::{GroupSchema, Platform, RawValue, TargetIdentity};

use crate::error::Result;

/// A raw value a source bound to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub field: &'static str,
    pub raw: RawValue,
}

/// Hierarchical config-file lookup.
pub trait ConfigFileSource: Send + Sync {
    /// Value of `key` in `section` for the given project and platform, after
    /// the source's own layering.
    fn lookup(
        &self,
        section: &str,
        key: &str,
        project_dir: Option<&Path>,
        platform: Platform,
    ) -> Result<Option<RawValue>>;
}

/// Raw field values for one target, per group.
pub trait ConfigSourceAdapter {
    fn config_file_values(
        &self,
        group: &GroupSchema,
        identity: &TargetIdentity,
    ) -> Result<Vec<SourceEntry>>;

    fn command_line_values(&self, group: &GroupSchema) -> Result<Vec<SourceEntry>>;
}

/// A config-file source paired with a target's command line.
#[derive(Clone, Copy)]
pub struct LayeredSources<'a> {
    config: &'a dyn ConfigFileSource,
    command_line: &'a CommandLine,
}

impl<'a> LayeredSources<'a> {
    pub fn new(config: &'a dyn ConfigFileSource, command_line: &'a CommandLine) -> Self {
        Self {
            config,
            command_line,
        }
    }
}

impl ConfigSourceAdapter for LayeredSources<'_> {
    fn config_file_values(
        &self,
        group: &GroupSchema,
        identity: &TargetIdentity,
    ) -> Result<Vec<SourceEntry>> {
        let mut entries = Vec::new();
        for field in group.fields() {
            // First binding with a value wins
            for binding in &field.config {
                let value = self.config.lookup(
                    binding.section,
                    binding.key,
                    identity.project_dir(),
                    identity.platform(),
                )?;
                if let Some(raw) = value {
                    entries.push(SourceEntry {
                        field: field.name,
                        raw,
                    });
                    break;
                }
            }
        }
        Ok(entries)
    }

    fn command_line_values(&self, group: &GroupSchema) -> Result<Vec<SourceEntry>> {
        self.command_line.values_for(group)
    }
}
