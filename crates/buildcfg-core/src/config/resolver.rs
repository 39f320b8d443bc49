//! Layered resolution of a target configuration
//!
//! The `ConfigResolver` builds a [`MutableConfiguration`] for one target by
//! applying, in order:
//! 1. Static defaults from the field registry
//! 2. Config-file values (root group first, then extensions)
//! 3. Command-line values (same order)
//! 4. Platform reset hooks
//! 5. Generated values: key registration definitions and the nativized
//!    asset plugin
//!
//! Later layers override earlier ones subject to origin precedence; fields
//! untouched by any layer keep their default.

use std::sync::Arc;

use buildcfg_meta::{
    FieldLookup, FieldRegistry, FieldValue, GroupId, GroupSchema, HostContext, TargetIdentity,
    TargetType,
};
use tracing::debug;

use super::{MutableConfiguration, ResolutionStage, ValueOrigin};
use crate::crypto::{self, CryptoKeyStore, NoKeyStore};
use crate::error::{Error, Result};
use crate::platform::PlatformHooks;
use crate::plugins::{NativizedPluginLocator, NoNativizedPlugins};
use crate::source::{ConfigSourceAdapter, SourceEntry};

/// Resolves target configurations against a shared registry and host.
///
/// All state is read-only after construction, so one resolver may serve
/// several threads at once.
#[derive(Clone)]
pub struct ConfigResolver {
    registry: Arc<FieldRegistry>,
    host: HostContext,
    hooks: PlatformHooks,
    keys: Arc<dyn CryptoKeyStore>,
    nativized: Arc<dyn NativizedPluginLocator>,
}

impl ConfigResolver {
    /// Create a resolver over the built-in registry with capability-table
    /// platform resets, no crypto keys and no nativized plugins.
    pub fn new(host: HostContext) -> Self {
        Self {
            registry: FieldRegistry::builtin(),
            host,
            hooks: PlatformHooks::default(),
            keys: Arc::new(NoKeyStore),
            nativized: Arc::new(NoNativizedPlugins),
        }
    }

    pub fn with_registry(mut self, registry: Arc<FieldRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_platform_hooks(mut self, hooks: PlatformHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_key_store(mut self, keys: Arc<dyn CryptoKeyStore>) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_nativized_locator(mut self, locator: Arc<dyn NativizedPluginLocator>) -> Self {
        self.nativized = locator;
        self
    }

    pub fn registry(&self) -> &Arc<FieldRegistry> {
        &self.registry
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    /// Resolve one target.
    ///
    /// The result is at stage `Resolved`; it still needs its type preset
    /// before it can be projected or validated.
    pub fn resolve(
        &self,
        identity: &TargetIdentity,
        target_type: TargetType,
        sources: &dyn ConfigSourceAdapter,
    ) -> Result<MutableConfiguration> {
        identity
            .platform()
            .capabilities()
            .check_target_type(target_type)?;

        let mut config =
            MutableConfiguration::seed(Arc::clone(&self.registry), identity.clone(), self.host);
        config.set("target_type", target_type.field_value(), ValueOrigin::Generated)?;
        debug!(target_name = identity.name(), %target_type, "Seeded static defaults");

        let groups: Vec<&GroupSchema> = self.registry.groups().collect();

        // Layer 2 - config files
        let mut applied = 0;
        for group in &groups {
            let entries = sources.config_file_values(group, identity)?;
            applied += apply_entries(&mut config, group.id(), entries, ValueOrigin::ConfigFile)?;
        }
        debug!(target_name = identity.name(), applied, "Applied config-file values");

        // Layer 3 - command line
        let mut applied = 0;
        for group in &groups {
            let entries = sources.command_line_values(group)?;
            applied += apply_entries(&mut config, group.id(), entries, ValueOrigin::CommandLine)?;
        }
        debug!(target_name = identity.name(), applied, "Applied command-line values");

        // Layer 4 - platform resets
        self.hooks.run(&mut config)?;

        // Layer 5 - generated values
        self.add_key_registrations(&mut config)?;
        self.add_nativized_plugin(&mut config, target_type)?;

        config.advance(ResolutionStage::Resolved);
        Ok(config)
    }

    /// Replace any existing registration definitions with fresh ones.
    fn add_key_registrations(&self, config: &mut MutableConfiguration) -> Result<()> {
        let identity = config.identity();
        let settings = self.keys.load(identity.project_dir(), identity.platform())?;
        let definitions = crypto::registration_definitions(settings.as_ref());

        config.update_list(
            GroupId::Target,
            "project_definitions",
            ValueOrigin::Generated,
            |list| {
                list.retain(|d| !crypto::is_registration_definition(d));
                list.extend(definitions);
            },
        )
    }

    fn add_nativized_plugin(
        &self,
        config: &mut MutableConfiguration,
        target_type: TargetType,
    ) -> Result<()> {
        if !target_type.requires_cooked_data() {
            return Ok(());
        }
        let identity = config.identity();
        let Some(project_file) = identity.project_file() else {
            return Ok(());
        };
        let located = self
            .nativized
            .locate(project_file, identity.platform(), target_type)?;
        if let Some(path) = located {
            debug!(?path, "Nativized asset plugin found");
            config.set(
                "nativized_plugin",
                FieldValue::some(path.display().to_string()),
                ValueOrigin::Generated,
            )?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("fields", &self.registry.field_count())
            .field("host", &self.host)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// Coerce and assign source entries; returns how many took effect.
fn apply_entries(
    config: &mut MutableConfiguration,
    group: GroupId,
    entries: Vec<SourceEntry>,
    origin: ValueOrigin,
) -> Result<usize> {
    let registry = Arc::clone(config.registry());
    // Alias entries land first so the replacement's own binding wins a tie
    let (aliases, stored): (Vec<_>, Vec<_>) = entries.into_iter().partition(|entry| {
        registry
            .descriptor(group, entry.field)
            .is_ok_and(|d| d.deprecation().is_some())
    });
    let mut applied = 0;
    for entry in aliases.into_iter().chain(stored) {
        let descriptor = registry.descriptor(group, entry.field)?;
        let value = descriptor
            .field_type
            .coerce(descriptor.name, &entry.raw)
            .map_err(|_| Error::InvalidSourceValue {
                group,
                field: descriptor.name.to_string(),
                origin,
                raw: entry.raw.to_string(),
                expected: descriptor.field_type.to_string(),
            })?;
        if config.set_in(group, descriptor.name, value, origin)? {
            applied += 1;
        }
    }
    Ok(applied)
}
