//! Nativized asset plugin lookup

use std::path::{Path, PathBuf};
use std::sync::Arc;

use buildcfg_meta::{Platform, TargetType};

use crate::error::Result;
use crate::source::ConfigFileSource;

/// Config section holding the project's packaging settings.
pub const PACKAGING_SETTINGS_SECTION: &str = "/Script/UnrealEd.ProjectPackagingSettings";

/// Key selecting the nativization method; `Disabled` turns lookup off.
pub const NATIVIZATION_METHOD_KEY: &str = "BlueprintNativizationMethod";

/// Finds the generated plugin holding a project's nativized assets.
pub trait NativizedPluginLocator: Send + Sync {
    fn locate(
        &self,
        project_file: &Path,
        platform: Platform,
        target_type: TargetType,
    ) -> Result<Option<PathBuf>>;
}

/// Locator for builds without nativized assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNativizedPlugins;

impl NativizedPluginLocator for NoNativizedPlugins {
    fn locate(&self, _: &Path, _: Platform, _: TargetType) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Locator probing the project's intermediate directory when the project's
/// packaging settings enable nativization.
#[derive(Clone)]
pub struct DiskNativizedPluginLocator {
    config: Arc<dyn ConfigFileSource>,
}

impl DiskNativizedPluginLocator {
    pub fn new(config: Arc<dyn ConfigFileSource>) -> Self {
        Self { config }
    }

    /// Where the plugin manifest is expected for a project, platform and type.
    pub fn plugin_path(project_dir: &Path, platform: Platform, target_type: TargetType) -> PathBuf {
        project_dir
            .join("Intermediate")
            .join("Plugins")
            .join("NativizedAssets")
            .join(platform.as_str())
            .join(target_type.as_str())
            .join("NativizedAssets.uplugin")
    }
}

impl NativizedPluginLocator for DiskNativizedPluginLocator {
    fn locate(
        &self,
        project_file: &Path,
        platform: Platform,
        target_type: TargetType,
    ) -> Result<Option<PathBuf>> {
        let Some(project_dir) = project_file.parent() else {
            return Ok(None);
        };
        let method = self.config.lookup(
            PACKAGING_SETTINGS_SECTION,
            NATIVIZATION_METHOD_KEY,
            Some(project_dir),
            platform,
        )?;
        let enabled = method
            .map(|m| !m.to_string().trim().eq_ignore_ascii_case("Disabled"))
            .unwrap_or(false);
        if !enabled {
            return Ok(None);
        }

        let path = Self::plugin_path(project_dir, platform, target_type);
        if path.is_file() {
            Ok(Some(path))
        } else {
            tracing::debug!(?path, "Nativization enabled but plugin not generated");
            Ok(None)
        }
    }
}

impl std::fmt::Debug for DiskNativizedPluginLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskNativizedPluginLocator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryConfigSource;
    use buildcfg_meta::RawValue;
    use std::fs;
    use tempfile::TempDir;

    fn locator(method: Option<&str>) -> DiskNativizedPluginLocator {
        let mut source = MemoryConfigSource::new();
        if let Some(method) = method {
            source.insert(
                PACKAGING_SETTINGS_SECTION,
                NATIVIZATION_METHOD_KEY,
                RawValue::text(method),
            );
        }
        DiskNativizedPluginLocator::new(Arc::new(source))
    }

    fn project_with_plugin() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let project_file = dir.path().join("MyGame.uproject");
        fs::write(&project_file, "{}").unwrap();
        let plugin = DiskNativizedPluginLocator::plugin_path(dir.path(), Platform::Win64, TargetType::Game);
        fs::create_dir_all(plugin.parent().unwrap()).unwrap();
        fs::write(&plugin, "{}").unwrap();
        (dir, project_file)
    }

    #[test]
    fn enabled_nativization_finds_generated_plugin() {
        let (_dir, project_file) = project_with_plugin();
        let found = locator(Some("Inclusive"))
            .locate(&project_file, Platform::Win64, TargetType::Game)
            .unwrap();
        assert!(found.unwrap().ends_with("Win64/Game/NativizedAssets.uplugin"));
    }

    #[test]
    fn disabled_or_unset_nativization_finds_nothing() {
        let (_dir, project_file) = project_with_plugin();
        for method in [None, Some("Disabled")] {
            let found = locator(method)
                .locate(&project_file, Platform::Win64, TargetType::Game)
                .unwrap();
            assert_eq!(found, None);
        }
    }

    #[test]
    fn missing_plugin_is_not_an_error() {
        let (_dir, project_file) = project_with_plugin();
        let found = locator(Some("Exclusive"))
            .locate(&project_file, Platform::Win64, TargetType::Server)
            .unwrap();
        assert_eq!(found, None);
    }
}
