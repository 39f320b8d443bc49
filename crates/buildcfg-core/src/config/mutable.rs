//! Mutable configuration store
//!
//! A [`MutableConfiguration`] holds one [`FieldSlot`] per stored field per
//! group. A slot carries the seeded static default (absent for computed
//! fields) shadowed by an optional assignment tagged with its
//! [`ValueOrigin`]. Reads return the assignment, else the seed, else the
//! computed default evaluated against the current values.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use buildcfg_meta::{
    AliasKind, DefaultContext, DefaultRule, FieldLookup, FieldRegistry, FieldValue, GroupId,
    HostContext, Override, TargetIdentity,
};
use serde::Serialize;
use tracing::{debug, warn};

use super::TargetConfiguration;
use crate::error::{Error, Result};

/// Where an assigned value came from.
///
/// A new assignment replaces an existing one only when its rank is at least
/// the existing rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrigin {
    Default,
    ConfigFile,
    PlatformDefaults,
    Preset,
    Generated,
    CommandLine,
    Caller,
}

impl ValueOrigin {
    pub fn rank(&self) -> u8 {
        match self {
            ValueOrigin::Default => 0,
            ValueOrigin::ConfigFile => 1,
            ValueOrigin::PlatformDefaults => 2,
            ValueOrigin::Preset | ValueOrigin::Generated => 3,
            ValueOrigin::CommandLine | ValueOrigin::Caller => 4,
        }
    }

    /// The higher-ranked of two origins, preferring `self` on ties.
    pub fn stronger(self, other: ValueOrigin) -> ValueOrigin {
        if other.rank() > self.rank() { other } else { self }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueOrigin::Default => "default",
            ValueOrigin::ConfigFile => "config file",
            ValueOrigin::PlatformDefaults => "platform defaults",
            ValueOrigin::Preset => "preset",
            ValueOrigin::Generated => "generated",
            ValueOrigin::CommandLine => "command line",
            ValueOrigin::Caller => "caller",
        }
    }
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of a configuration through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStage {
    Seeded,
    Resolved,
    Finalized,
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResolutionStage::Seeded => "seeded",
            ResolutionStage::Resolved => "resolved",
            ResolutionStage::Finalized => "finalized",
        })
    }
}

/// An explicitly assigned value and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assigned {
    pub value: FieldValue,
    pub origin: ValueOrigin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSlot {
    seed: Option<FieldValue>,
    assigned: Override<Assigned>,
}

impl FieldSlot {
    pub fn seed(&self) -> Option<&FieldValue> {
        self.seed.as_ref()
    }

    pub fn assigned(&self) -> Option<&Assigned> {
        self.assigned.explicit()
    }

    pub fn origin(&self) -> ValueOrigin {
        self.assigned()
            .map(|a| a.origin)
            .unwrap_or(ValueOrigin::Default)
    }
}

/// Configuration of one target while it is being resolved.
#[derive(Debug, Clone)]
pub struct MutableConfiguration {
    registry: Arc<FieldRegistry>,
    identity: TargetIdentity,
    host: HostContext,
    stage: ResolutionStage,
    slots: BTreeMap<GroupId, HashMap<&'static str, FieldSlot>>,
}

impl MutableConfiguration {
    /// Create a configuration holding only the registry's static defaults.
    pub fn seed(registry: Arc<FieldRegistry>, identity: TargetIdentity, host: HostContext) -> Self {
        let context = DefaultContext {
            identity: &identity,
            host: &host,
        };
        let slots = registry
            .groups()
            .map(|group| {
                let fields = group
                    .fields()
                    .iter()
                    .filter(|f| f.deprecation().is_none())
                    .map(|f| {
                        let slot = FieldSlot {
                            seed: f.seed(&context),
                            assigned: Override::Default,
                        };
                        (f.name, slot)
                    })
                    .collect();
                (group.id(), fields)
            })
            .collect();

        Self {
            registry,
            identity,
            host,
            stage: ResolutionStage::Seeded,
            slots,
        }
    }

    pub fn stage(&self) -> ResolutionStage {
        self.stage
    }

    pub(crate) fn advance(&mut self, stage: ResolutionStage) {
        if stage > self.stage {
            debug!(target_name = %self.identity.name(), from = %self.stage, to = %stage, "Stage advanced");
            self.stage = stage;
        }
    }

    pub fn registry(&self) -> &Arc<FieldRegistry> {
        &self.registry
    }

    /// Current value of a root field.
    pub fn get(&self, field: &str) -> Result<FieldValue> {
        self.get_in(GroupId::Target, field)
    }

    pub fn get_in(&self, group: GroupId, field: &str) -> Result<FieldValue> {
        Ok(self.read(group, field)?)
    }

    /// Assign a root field. Returns `false` when a higher-ranked assignment
    /// already holds the field.
    pub fn set(&mut self, field: &str, value: FieldValue, origin: ValueOrigin) -> Result<bool> {
        self.set_in(GroupId::Target, field, value, origin)
    }

    pub fn set_in(
        &mut self,
        group: GroupId,
        field: &str,
        value: FieldValue,
        origin: ValueOrigin,
    ) -> Result<bool> {
        let name = self.writable_name(group, field)?;
        self.registry.descriptor(group, name)?.check_value(&value)?;

        let slot = self.slot_mut(group, name)?;
        if let Some(existing) = slot.assigned() {
            if existing.origin.rank() > origin.rank() {
                debug!(
                    group = %group,
                    field = name,
                    kept = %existing.origin,
                    skipped = %origin,
                    "Lower-precedence assignment skipped"
                );
                return Ok(false);
            }
        }
        slot.assigned = Override::Explicit(Assigned { value, origin });
        Ok(true)
    }

    /// Origin of a field's current value; `Default` when nothing assigned it.
    pub fn origin_of(&self, group: GroupId, field: &str) -> Result<ValueOrigin> {
        let name = self.stored_name(group, field)?;
        Ok(self.slot(group, name)?.origin())
    }

    pub fn is_explicit(&self, group: GroupId, field: &str) -> Result<bool> {
        Ok(self.origin_of(group, field)? != ValueOrigin::Default)
    }

    /// Edit a list field in place.
    ///
    /// The edit always lands; the slot keeps the stronger of its existing
    /// origin and `origin`.
    pub fn update_list<F>(
        &mut self,
        group: GroupId,
        field: &str,
        origin: ValueOrigin,
        edit: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Vec<String>),
    {
        let name = self.writable_name(group, field)?;
        let mut items = match self.get_in(group, name)? {
            FieldValue::List(items) => items,
            other => {
                return Err(buildcfg_meta::Error::TypeMismatch {
                    field: name.to_string(),
                    expected: "list".to_string(),
                    actual: other.kind().to_string(),
                }
                .into());
            }
        };
        edit(&mut items);

        let slot = self.slot_mut(group, name)?;
        let origin = slot.origin().stronger(origin);
        slot.assigned = Override::Explicit(Assigned {
            value: FieldValue::List(items),
            origin,
        });
        Ok(())
    }

    /// Append the items not already present, keeping existing order.
    pub fn append_unique<I, S>(
        &mut self,
        group: GroupId,
        field: &str,
        items: I,
        origin: ValueOrigin,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.update_list(group, field, origin, |list| {
            for item in items {
                let item = item.into();
                if !list.contains(&item) {
                    list.push(item);
                }
            }
        })
    }

    fn read(&self, group: GroupId, field: &str) -> buildcfg_meta::Result<FieldValue> {
        let descriptor = self.registry.descriptor(group, field)?;
        if let Some(deprecation) = descriptor.deprecation() {
            warn!(
                target_name = %self.identity.name(),
                group = %group,
                field,
                replacement = deprecation.replacement,
                "Deprecated field read"
            );
            return self.read(group, deprecation.replacement);
        }

        let slot = self.slot(group, descriptor.name)?;
        if let Some(assigned) = slot.assigned() {
            return Ok(assigned.value.clone());
        }
        if let Some(seed) = slot.seed() {
            return Ok(seed.clone());
        }
        match descriptor.default_rule() {
            Some(DefaultRule::Computed { compute, .. }) => {
                let value = compute(self)?;
                descriptor.check_value(&value)?;
                Ok(value)
            }
            _ => Err(buildcfg_meta::Error::InvalidDescriptor {
                field: descriptor.name.to_string(),
                reason: "stored field has no seed".to_string(),
            }),
        }
    }

    /// Name of the slot that reads of `field` land on.
    fn stored_name(&self, group: GroupId, field: &str) -> Result<&'static str> {
        let descriptor = self.registry.descriptor(group, field)?;
        Ok(match descriptor.deprecation() {
            Some(deprecation) => deprecation.replacement,
            None => descriptor.name,
        })
    }

    /// Name of the slot that writes to `field` land on.
    fn writable_name(&self, group: GroupId, field: &str) -> Result<&'static str> {
        let descriptor = self.registry.descriptor(group, field)?;
        match descriptor.deprecation() {
            Some(deprecation) if deprecation.kind == AliasKind::GetOnly => {
                Err(Error::ReadOnlyAlias {
                    field: descriptor.name.to_string(),
                    replacement: deprecation.replacement.to_string(),
                })
            }
            Some(deprecation) => {
                warn!(
                    target_name = %self.identity.name(),
                    group = %group,
                    field = descriptor.name,
                    replacement = deprecation.replacement,
                    "Deprecated field written"
                );
                Ok(deprecation.replacement)
            }
            None => Ok(descriptor.name),
        }
    }

    fn slot(&self, group: GroupId, name: &str) -> buildcfg_meta::Result<&FieldSlot> {
        self.slots
            .get(&group)
            .and_then(|fields| fields.get(name))
            .ok_or_else(|| buildcfg_meta::Error::UnknownField {
                group,
                field: name.to_string(),
            })
    }

    fn slot_mut(&mut self, group: GroupId, name: &str) -> Result<&mut FieldSlot> {
        self.slots
            .get_mut(&group)
            .and_then(|fields| fields.get_mut(name))
            .ok_or_else(|| {
                buildcfg_meta::Error::UnknownField {
                    group,
                    field: name.to_string(),
                }
                .into()
            })
    }
}

impl FieldLookup for MutableConfiguration {
    fn identity(&self) -> &TargetIdentity {
        &self.identity
    }

    fn host(&self) -> &HostContext {
        &self.host
    }

    fn lookup(&self, group: GroupId, field: &str) -> buildcfg_meta::Result<FieldValue> {
        self.read(group, field)
    }
}

impl TargetConfiguration for MutableConfiguration {
    fn stage(&self) -> ResolutionStage {
        self.stage
    }

    fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    fn origin_of(&self, group: GroupId, field: &str) -> Result<ValueOrigin> {
        MutableConfiguration::origin_of(self, group, field)
    }
}
