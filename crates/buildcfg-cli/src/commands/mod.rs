//! Command implementations for buildcfg-cli

pub mod check_env;
pub mod fields;
pub mod resolve;

pub use check_env::run_check_env;
pub use fields::run_fields;
pub use resolve::run_resolve;

use std::fs;
use std::sync::Arc;

use buildcfg_core::{
    ConfigFileSource, ConfigPipeline, ConfigResolver, CryptoSettings, DiskNativizedPluginLocator,
    MemoryConfigSource, StaticKeyStore, TomlConfigSource,
};
use buildcfg_meta::{Configuration, HostContext, Platform, TargetIdentity};

use crate::cli::SourceArgs;
use crate::error::{CliError, Result};

/// Wire a pipeline to the sources named on the command line.
pub(crate) fn pipeline(sources: &SourceArgs) -> Result<ConfigPipeline> {
    let config: Arc<dyn ConfigFileSource> = match (&sources.config_dir, &sources.project) {
        (Some(dir), _) => Arc::new(TomlConfigSource::new(dir)),
        (None, Some(_)) => Arc::new(TomlConfigSource::project_only()),
        (None, None) => Arc::new(MemoryConfigSource::new()),
    };

    let mut resolver = ConfigResolver::new(HostContext::detect(sources.installed))
        .with_nativized_locator(Arc::new(DiskNativizedPluginLocator::new(Arc::clone(&config))));

    if let Some(path) = &sources.crypto {
        let content = fs::read_to_string(path)?;
        let settings: CryptoSettings = serde_json::from_str(&content).map_err(|e| {
            CliError::user(format!("Invalid crypto settings in {}: {}", path.display(), e))
        })?;
        resolver = resolver.with_key_store(Arc::new(StaticKeyStore::new(settings)));
    }

    Ok(ConfigPipeline::new(resolver, config))
}

/// Build a target identity from a name and the shared source arguments.
pub(crate) fn identity(name: &str, sources: &SourceArgs) -> Result<TargetIdentity> {
    let platform: Platform = sources.platform.parse()?;
    let configuration: Configuration = sources.configuration.parse()?;

    let mut builder = TargetIdentity::builder()
        .name(name)
        .platform(platform)
        .configuration(configuration);
    if let Some(project) = &sources.project {
        builder = builder.project_file(project);
    }
    Ok(builder.build()?)
}
