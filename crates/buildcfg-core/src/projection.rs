//! Read-only projection of finalized configurations
//!
//! Projection is the freeze point: the projector consumes the
//! [`MutableConfiguration`], so no mutation path survives it. Reads on the
//! [`ImmutableConfiguration`] are evaluated at call time against the frozen
//! store; list fields come back as owned snapshots.

use std::sync::Arc;

use buildcfg_meta::{
    FieldLookup, FieldRegistry, FieldValue, GroupId, HostContext, TargetIdentity, TargetType,
};

use crate::config::{MutableConfiguration, ResolutionStage, TargetConfiguration, ValueOrigin};
use crate::error::Result;

/// Freezes finalized configurations into read-only views.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyProjector;

impl ReadOnlyProjector {
    pub fn new() -> Self {
        Self
    }

    pub fn project(&self, config: MutableConfiguration) -> Result<ImmutableConfiguration> {
        config.require_stage(ResolutionStage::Finalized, "project")?;
        Ok(ImmutableConfiguration {
            inner: Arc::new(config),
        })
    }
}

/// Read-only view of a finalized target configuration.
///
/// Cloning is cheap and every clone reads the same frozen store.
#[derive(Debug, Clone)]
pub struct ImmutableConfiguration {
    inner: Arc<MutableConfiguration>,
}

impl ImmutableConfiguration {
    pub fn name(&self) -> &str {
        self.inner.identity().name()
    }

    pub fn get(&self, field: &str) -> Result<FieldValue> {
        self.inner.get(field)
    }

    pub fn get_in(&self, group: GroupId, field: &str) -> Result<FieldValue> {
        self.inner.get_in(group, field)
    }

    pub fn get_bool(&self, field: &str) -> Result<bool> {
        Ok(self.inner.root_bool(field)?)
    }

    /// Owned snapshot of a root list field.
    pub fn get_list(&self, field: &str) -> Result<Box<[String]>> {
        Ok(self.inner.root_list(field)?.into_boxed_slice())
    }

    pub fn target_type(&self) -> Result<TargetType> {
        Ok(FieldLookup::target_type(self.inner.as_ref())?)
    }

    /// View of one extension group.
    pub fn extension(&self, group: GroupId) -> Result<ImmutableExtension<'_>> {
        if !group.is_extension() || self.inner.registry().group(group).is_none() {
            return Err(buildcfg_meta::Error::UnknownVariant {
                kind: "extension group",
                value: group.to_string(),
            }
            .into());
        }
        Ok(ImmutableExtension {
            config: self,
            group,
        })
    }

    /// View of the extension group of the target's own platform.
    pub fn platform_extension(&self) -> ImmutableExtension<'_> {
        ImmutableExtension {
            config: self,
            group: self.inner.identity().platform().capabilities().extension,
        }
    }

    /// Views of every extension group, in registry order.
    pub fn extensions(&self) -> impl Iterator<Item = ImmutableExtension<'_>> {
        self.inner
            .registry()
            .groups()
            .map(|g| g.id())
            .filter(GroupId::is_extension)
            .map(move |group| ImmutableExtension {
                config: self,
                group,
            })
    }
}

impl FieldLookup for ImmutableConfiguration {
    fn identity(&self) -> &TargetIdentity {
        self.inner.identity()
    }

    fn host(&self) -> &HostContext {
        self.inner.host()
    }

    fn lookup(&self, group: GroupId, field: &str) -> buildcfg_meta::Result<FieldValue> {
        self.inner.lookup(group, field)
    }
}

impl TargetConfiguration for ImmutableConfiguration {
    fn stage(&self) -> ResolutionStage {
        self.inner.stage()
    }

    fn registry(&self) -> &FieldRegistry {
        self.inner.registry()
    }

    fn origin_of(&self, group: GroupId, field: &str) -> Result<ValueOrigin> {
        self.inner.origin_of(group, field)
    }
}

/// Read-only view of one extension group of a projected configuration.
#[derive(Debug, Clone, Copy)]
pub struct ImmutableExtension<'a> {
    config: &'a ImmutableConfiguration,
    group: GroupId,
}

impl ImmutableExtension<'_> {
    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn get(&self, field: &str) -> Result<FieldValue> {
        self.config.get_in(self.group, field)
    }

    pub fn get_bool(&self, field: &str) -> Result<bool> {
        let value = self.get(field)?;
        value.as_bool().ok_or_else(|| {
            buildcfg_meta::Error::TypeMismatch {
                field: field.to_string(),
                expected: "bool".to_string(),
                actual: value.kind().to_string(),
            }
            .into()
        })
    }
}
