//! Layered TOML config files
//!
//! Config values are loaded from a hierarchy of files, later files
//! overriding earlier ones:
//! 1. Engine defaults (`<engine config>/BaseEngine.toml`)
//! 2. Engine platform defaults (`<engine config>/<Platform>/<Platform>Engine.toml`)
//! 3. Project config (`<project>/Config/DefaultEngine.toml`)
//! 4. Project platform config (`<project>/Config/<Platform>/<Platform>Engine.toml`)
//!
//! Each top-level table is a config section; section names containing `/`
//! or `.` must be quoted.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use buildcfg_meta::{Platform, RawValue};

use super::ConfigFileSource;
use crate::error::{Error, Result};

/// One parsed config file.
#[derive(Debug)]
struct ConfigLayer {
    path: PathBuf,
    sections: toml::Table,
}

impl ConfigLayer {
    fn get(&self, section: &str, key: &str) -> Option<&toml::Value> {
        let table = self.sections.get(section)?.as_table()?;
        table
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }
}

type HierarchyKey = (Option<PathBuf>, Platform);

/// Config-file source backed by TOML files on disk.
///
/// Each (project, platform) hierarchy is read on first use and cached for
/// the lifetime of the source.
#[derive(Debug)]
pub struct TomlConfigSource {
    engine_config_dir: Option<PathBuf>,
    hierarchies: RwLock<HashMap<HierarchyKey, Arc<Vec<ConfigLayer>>>>,
}

impl TomlConfigSource {
    /// Create a source reading engine defaults from `engine_config_dir`.
    pub fn new(engine_config_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine_config_dir: Some(engine_config_dir.into()),
            hierarchies: RwLock::new(HashMap::new()),
        }
    }

    /// Create a source reading project config files only.
    pub fn project_only() -> Self {
        Self {
            engine_config_dir: None,
            hierarchies: RwLock::new(HashMap::new()),
        }
    }

    pub fn engine_config_dir(&self) -> Option<&Path> {
        self.engine_config_dir.as_deref()
    }

    /// Candidate files for a hierarchy, lowest precedence first. Files that
    /// do not exist are skipped when loading.
    pub fn layer_paths(&self, project_dir: Option<&Path>, platform: Platform) -> Vec<PathBuf> {
        let platform_file = format!("{}Engine.toml", platform);
        let mut paths = Vec::new();
        if let Some(engine_dir) = &self.engine_config_dir {
            paths.push(engine_dir.join("BaseEngine.toml"));
            paths.push(engine_dir.join(platform.as_str()).join(&platform_file));
        }
        if let Some(project_dir) = project_dir {
            let config_dir = project_dir.join("Config");
            paths.push(config_dir.join("DefaultEngine.toml"));
            paths.push(config_dir.join(platform.as_str()).join(&platform_file));
        }
        paths
    }

    fn hierarchy(
        &self,
        project_dir: Option<&Path>,
        platform: Platform,
    ) -> Result<Arc<Vec<ConfigLayer>>> {
        let key = (project_dir.map(Path::to_path_buf), platform);
        if let Some(layers) = self
            .hierarchies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(layers));
        }

        let layers = Arc::new(self.load(project_dir, platform)?);
        let mut cache = self
            .hierarchies
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(key).or_insert(layers)))
    }

    fn load(&self, project_dir: Option<&Path>, platform: Platform) -> Result<Vec<ConfigLayer>> {
        let mut layers = Vec::new();
        for path in self.layer_paths(project_dir, platform) {
            if !path.is_file() {
                tracing::debug!(?path, "No config file - skipping");
                continue;
            }
            tracing::debug!(?path, "Loading config file");
            let content = fs::read_to_string(&path)?;
            let sections = content
                .parse::<toml::Table>()
                .map_err(|e| Error::ConfigParse {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            layers.push(ConfigLayer { path, sections });
        }
        Ok(layers)
    }
}

impl ConfigFileSource for TomlConfigSource {
    fn lookup(
        &self,
        section: &str,
        key: &str,
        project_dir: Option<&Path>,
        platform: Platform,
    ) -> Result<Option<RawValue>> {
        let layers = self.hierarchy(project_dir, platform)?;
        let found = layers
            .iter()
            .rev()
            .find_map(|layer| layer.get(section, key).map(|value| (layer, value)));

        Ok(found.map(|(layer, value)| {
            tracing::trace!(path = ?layer.path, section, key, "Config value found");
            to_raw(value)
        }))
    }
}

fn to_raw(value: &toml::Value) -> RawValue {
    match value {
        toml::Value::String(s) => RawValue::Text(s.clone()),
        toml::Value::Boolean(b) => RawValue::Bool(*b),
        toml::Value::Integer(i) => RawValue::Int(*i),
        toml::Value::Array(items) => RawValue::List(
            items
                .iter()
                .map(|item| match item {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        other => RawValue::Text(other.to_string()),
    }
}
