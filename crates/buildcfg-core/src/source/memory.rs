//! In-memory config source

use std::collections::HashMap;
use std::path::Path;

use buildcfg_meta::{Platform, RawValue};

use super::ConfigFileSource;
use crate::error::Result;

/// Config values held in memory, with optional per-platform overrides.
///
/// Keys match case-insensitively; section names match exactly.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigSource {
    values: HashMap<(String, String), RawValue>,
    platform_values: HashMap<(Platform, String, String), RawValue>,
}

impl MemoryConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, section: &str, key: &str, value: RawValue) -> Self {
        self.insert(section, key, value);
        self
    }

    /// Add a value that only applies to `platform` and shadows the
    /// platform-independent one.
    pub fn with_platform(
        mut self,
        platform: Platform,
        section: &str,
        key: &str,
        value: RawValue,
    ) -> Self {
        self.platform_values.insert(
            (platform, section.to_string(), key.to_ascii_lowercase()),
            value,
        );
        self
    }

    pub fn insert(&mut self, section: &str, key: &str, value: RawValue) {
        self.values
            .insert((section.to_string(), key.to_ascii_lowercase()), value);
    }

    pub fn len(&self) -> usize {
        self.values.len() + self.platform_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConfigFileSource for MemoryConfigSource {
    fn lookup(
        &self,
        section: &str,
        key: &str,
        _project_dir: Option<&Path>,
        platform: Platform,
    ) -> Result<Option<RawValue>> {
        let key = key.to_ascii_lowercase();
        let platform_value = self
            .platform_values
            .get(&(platform, section.to_string(), key.clone()));
        Ok(platform_value
            .or_else(|| self.values.get(&(section.to_string(), key)))
            .cloned())
    }
}
