//! Target identity fixtures.

use buildcfg_meta::{BuildVersion, Configuration, Platform, TargetIdentity};

/// Development identity for `name` on `platform`.
pub fn identity(name: &str, platform: Platform) -> TargetIdentity {
    TargetIdentity::builder()
        .name(name)
        .platform(platform)
        .build()
        .unwrap_or_else(|e| panic!("fixture identity '{}' is invalid: {}", name, e))
}

/// Shipping identity on a promoted build, so `formal_build` defaults on.
pub fn promoted_identity(name: &str, platform: Platform, changelist: u32) -> TargetIdentity {
    TargetIdentity::builder()
        .name(name)
        .platform(platform)
        .configuration(Configuration::Shipping)
        .version(BuildVersion::new("release", changelist, true))
        .build()
        .unwrap_or_else(|e| panic!("fixture identity '{}' is invalid: {}", name, e))
}

/// Identity whose project file lives at `project_file`.
pub fn project_identity(
    name: &str,
    platform: Platform,
    project_file: impl Into<std::path::PathBuf>,
) -> TargetIdentity {
    TargetIdentity::builder()
        .name(name)
        .platform(platform)
        .project_file(project_file)
        .build()
        .unwrap_or_else(|e| panic!("fixture identity '{}' is invalid: {}", name, e))
}
