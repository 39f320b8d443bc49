//! Platform reset hooks
//!
//! After config-file and command-line values are applied, each platform may
//! reset fields to its own engineering defaults. Hooks write through a
//! [`ResetScope`], which records every assignment with origin
//! `PlatformDefaults` and so never overrides command-line or caller values.

use std::sync::Arc;

use buildcfg_meta::{FieldLookup, FieldValue, GroupId, Platform};
use tracing::debug;

use crate::config::{MutableConfiguration, ValueOrigin};
use crate::error::Result;

/// Platform-specific default resets.
pub trait PlatformDefaults: Send + Sync {
    fn reset_defaults(&self, platform: Platform, scope: &mut ResetScope<'_>) -> Result<()>;
}

/// Write access handed to platform hooks.
pub struct ResetScope<'a> {
    config: &'a mut MutableConfiguration,
    applied: usize,
    skipped: usize,
}

impl<'a> ResetScope<'a> {
    pub(crate) fn new(config: &'a mut MutableConfiguration) -> Self {
        Self {
            config,
            applied: 0,
            skipped: 0,
        }
    }

    pub fn config(&self) -> &MutableConfiguration {
        self.config
    }

    /// Reset a root field.
    pub fn set(&mut self, field: &str, value: FieldValue) -> Result<bool> {
        self.set_in(GroupId::Target, field, value)
    }

    pub fn set_in(&mut self, group: GroupId, field: &str, value: FieldValue) -> Result<bool> {
        let applied = self
            .config
            .set_in(group, field, value, ValueOrigin::PlatformDefaults)?;
        if applied {
            self.applied += 1;
        } else {
            self.skipped += 1;
        }
        Ok(applied)
    }

    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Resets driven by the platform capability table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityDefaults;

impl PlatformDefaults for CapabilityDefaults {
    fn reset_defaults(&self, platform: Platform, scope: &mut ResetScope<'_>) -> Result<()> {
        for (field, value) in platform.capabilities().reset_defaults {
            scope.set(field, FieldValue::Bool(*value))?;
        }
        Ok(())
    }
}

/// Ordered set of reset hooks run for every target.
#[derive(Clone)]
pub struct PlatformHooks {
    hooks: Vec<Arc<dyn PlatformDefaults>>,
}

impl PlatformHooks {
    /// No hooks at all.
    pub fn empty() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Add a hook that runs after the existing ones.
    pub fn with(mut self, hook: impl PlatformDefaults + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub(crate) fn run(&self, config: &mut MutableConfiguration) -> Result<()> {
        let platform = config.identity().platform();
        let mut scope = ResetScope::new(config);
        for hook in &self.hooks {
            hook.reset_defaults(platform, &mut scope)?;
        }
        debug!(
            %platform,
            applied = scope.applied(),
            skipped = scope.skipped(),
            "Platform defaults applied"
        );
        Ok(())
    }
}

impl Default for PlatformHooks {
    fn default() -> Self {
        Self::empty().with(CapabilityDefaults)
    }
}

impl std::fmt::Debug for PlatformHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformHooks")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
