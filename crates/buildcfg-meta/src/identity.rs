//! Target identity
//!
//! A [`TargetIdentity`] names one buildable output. It is built once, through
//! [`TargetIdentityBuilder`], before resolution starts and is never mutated
//! afterwards. Missing or invalid identity fields are fatal: no configuration
//! is produced for a partially identified target.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::kinds::Configuration;
use crate::platform::Platform;

/// Version of the source tree a target is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildVersion {
    pub branch: String,
    pub changelist: u32,
    pub compatible_changelist: u32,
    pub is_promoted_build: bool,
}

impl BuildVersion {
    pub fn new(branch: impl Into<String>, changelist: u32, is_promoted_build: bool) -> Self {
        Self {
            branch: branch.into(),
            changelist,
            compatible_changelist: changelist,
            is_promoted_build,
        }
    }
}

/// Immutable identity of a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TargetIdentity {
    name: String,
    platform: Platform,
    configuration: Configuration,
    architecture: String,
    project_file: Option<PathBuf>,
    version: BuildVersion,
}

impl TargetIdentity {
    pub fn builder() -> TargetIdentityBuilder {
        TargetIdentityBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn configuration(&self) -> Configuration {
        self.configuration
    }

    /// Resolved architecture; never empty.
    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    pub fn project_file(&self) -> Option<&Path> {
        self.project_file.as_deref()
    }

    /// Directory containing the project file, if there is one.
    pub fn project_dir(&self) -> Option<&Path> {
        self.project_file.as_deref().and_then(Path::parent)
    }

    pub fn version(&self) -> &BuildVersion {
        &self.version
    }
}

impl std::fmt::Display for TargetIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.name, self.platform, self.configuration, self.architecture
        )
    }
}

/// Builder for [`TargetIdentity`].
#[derive(Debug, Clone, Default)]
pub struct TargetIdentityBuilder {
    name: Option<String>,
    platform: Option<Platform>,
    configuration: Option<Configuration>,
    architecture: String,
    project_file: Option<PathBuf>,
    version: BuildVersion,
}

impl TargetIdentityBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Defaults to `Development` when not set.
    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Empty selects the platform default.
    pub fn architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = architecture.into();
        self
    }

    pub fn project_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_file = Some(path.into());
        self
    }

    pub fn version(mut self, version: BuildVersion) -> Self {
        self.version = version;
        self
    }

    /// Validate and build the identity.
    pub fn build(self) -> Result<TargetIdentity> {
        let name = self
            .name
            .ok_or(Error::MissingIdentityField { field: "name" })?;
        validate_name(&name)?;
        let platform = self
            .platform
            .ok_or(Error::MissingIdentityField { field: "platform" })?;
        let architecture = platform
            .capabilities()
            .resolve_architecture(&self.architecture)?
            .to_string();

        Ok(TargetIdentity {
            name,
            platform,
            configuration: self.configuration.unwrap_or(Configuration::Development),
            architecture,
            project_file: self.project_file,
            version: self.version,
        })
    }
}

fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason| Error::InvalidTargetName {
        name: name.to_string(),
        reason,
    };

    let mut chars = name.chars();
    match chars.next() {
        None => return Err(invalid("name is empty")),
        Some(c) if !c.is_ascii_alphabetic() => {
            return Err(invalid("name must start with a letter"));
        }
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(invalid(
            "name may only contain letters, digits, '_' and '-'",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_fills_defaults() {
        let identity = TargetIdentity::builder()
            .name("MyGame")
            .platform(Platform::Win64)
            .build()
            .unwrap();

        assert_eq!(identity.name(), "MyGame");
        assert_eq!(identity.configuration(), Configuration::Development);
        assert_eq!(identity.architecture(), "x64");
        assert_eq!(identity.project_dir(), None);
        assert_eq!(identity.version(), &BuildVersion::default());
    }

    #[test]
    fn missing_name_is_fatal() {
        let err = TargetIdentity::builder()
            .platform(Platform::Linux)
            .build()
            .unwrap_err();
        assert_eq!(err, Error::MissingIdentityField { field: "name" });
    }

    #[test]
    fn missing_platform_is_fatal() {
        let err = TargetIdentity::builder().name("Tool").build().unwrap_err();
        assert_eq!(err, Error::MissingIdentityField { field: "platform" });
    }

    #[test]
    fn invalid_names_are_rejected() {
        for name in ["", "1Game", "My Game", "My/Game"] {
            let result = TargetIdentity::builder()
                .name(name)
                .platform(Platform::Linux)
                .build();
            assert!(
                matches!(result, Err(Error::InvalidTargetName { .. })),
                "expected '{}' to be rejected",
                name
            );
        }
    }

    #[test]
    fn invalid_architecture_is_rejected() {
        let result = TargetIdentity::builder()
            .name("MyGame")
            .platform(Platform::Win64)
            .architecture("sparc")
            .build();
        assert!(matches!(result, Err(Error::InvalidArchitecture { .. })));
    }

    #[test]
    fn project_dir_is_parent_of_project_file() {
        let identity = TargetIdentity::builder()
            .name("MyGame")
            .platform(Platform::Mac)
            .project_file("/work/MyGame/MyGame.uproject")
            .build()
            .unwrap();
        assert_eq!(identity.project_dir(), Some(Path::new("/work/MyGame")));
    }
}
