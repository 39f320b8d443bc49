//! [`TestProject`] builder for on-disk config scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use buildcfg_meta::{Platform, TargetType};
use tempfile::TempDir;

/// A temporary engine config directory and project directory.
///
/// # Example
///
/// ```rust,no_run
/// use buildcfg_test_utils::project::TestProject;
///
/// let project = TestProject::new("MyGame");
/// project.write_project_config("[BuildConfiguration]\nbUseStaticCRT = true\n");
/// assert!(project.project_file().exists());
/// ```
pub struct TestProject {
    temp_dir: TempDir,
    name: String,
}

impl TestProject {
    /// Create the directories and an empty `<name>.uproject`.
    pub fn new(name: &str) -> Self {
        let project = Self {
            temp_dir: TempDir::new().unwrap(),
            name: name.to_string(),
        };
        fs::create_dir_all(project.engine_config_dir()).unwrap();
        fs::create_dir_all(project.project_dir().join("Config")).unwrap();
        fs::write(project.project_file(), "{\n  \"FileVersion\": 3\n}\n").unwrap();
        project
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn engine_config_dir(&self) -> PathBuf {
        self.temp_dir.path().join("Engine").join("Config")
    }

    pub fn project_dir(&self) -> PathBuf {
        self.temp_dir.path().join(&self.name)
    }

    pub fn project_file(&self) -> PathBuf {
        self.project_dir().join(format!("{}.uproject", self.name))
    }

    /// Write `BaseEngine.toml` in the engine config directory.
    pub fn write_engine_config(&self, content: &str) {
        write(&self.engine_config_dir().join("BaseEngine.toml"), content);
    }

    /// Write the project's `DefaultEngine.toml`.
    pub fn write_project_config(&self, content: &str) {
        write(
            &self.project_dir().join("Config").join("DefaultEngine.toml"),
            content,
        );
    }

    /// Write the project's platform-specific engine config.
    pub fn write_platform_config(&self, platform: Platform, content: &str) {
        let path = self
            .project_dir()
            .join("Config")
            .join(platform.as_str())
            .join(format!("{}Engine.toml", platform));
        write(&path, content);
    }

    /// Create the generated nativized asset plugin manifest.
    pub fn write_nativized_plugin(&self, platform: Platform, target_type: TargetType) -> PathBuf {
        let path = self
            .project_dir()
            .join("Intermediate")
            .join("Plugins")
            .join("NativizedAssets")
            .join(platform.as_str())
            .join(target_type.as_str())
            .join("NativizedAssets.uplugin");
        write(&path, "{\n  \"FriendlyName\": \"NativizedAssets\"\n}\n");
        path
    }

    /// Assert that a path relative to the project directory exists.
    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.project_dir().join(relative);
        assert!(path.exists(), "expected {} to exist", path.display());
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
