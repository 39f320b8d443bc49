//! Configuration store and resolution
//!
//! Resolution turns a [`TargetIdentity`](buildcfg_meta::TargetIdentity) and
//! its sources into a [`MutableConfiguration`]; the
//! [`TargetConfiguration`] trait is the read surface shared with the frozen
//! projection.

mod mutable;
mod resolver;

pub use mutable::{Assigned, FieldSlot, MutableConfiguration, ResolutionStage, ValueOrigin};
pub use resolver::ConfigResolver;

use buildcfg_meta::{FieldLookup, FieldRegistry, FieldValue, GroupId};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};

/// One stored field's current value, as listed by [`TargetConfiguration::entries`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldEntry {
    pub group: GroupId,
    pub field: &'static str,
    pub value: FieldValue,
    pub origin: ValueOrigin,
}

/// Read access shared by mutable and projected configurations.
pub trait TargetConfiguration: FieldLookup {
    fn stage(&self) -> ResolutionStage;

    fn registry(&self) -> &FieldRegistry;

    fn origin_of(&self, group: GroupId, field: &str) -> Result<ValueOrigin>;

    /// Fail unless the configuration has reached `required`.
    fn require_stage(&self, required: ResolutionStage, operation: &'static str) -> Result<()> {
        let actual = self.stage();
        if actual < required {
            return Err(Error::Stage {
                target: self.identity().name().to_string(),
                operation,
                required,
                actual,
            });
        }
        Ok(())
    }

    /// Every stored field of every group, in registry order. Aliases are
    /// skipped.
    fn entries(&self) -> Result<Vec<FieldEntry>> {
        let mut entries = Vec::new();
        for group in self.registry().groups() {
            for field in group.fields().iter().filter(|f| f.deprecation().is_none()) {
                entries.push(FieldEntry {
                    group: group.id(),
                    field: field.name,
                    value: self.lookup(group.id(), field.name)?,
                    origin: self.origin_of(group.id(), field.name)?,
                });
            }
        }
        Ok(entries)
    }

    /// JSON rendering for inspection: identity, stage and grouped values.
    fn to_json(&self) -> Result<Value> {
        let mut groups = Map::new();
        for entry in self.entries()? {
            let group = groups
                .entry(entry.group.as_str())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(fields) = group {
                fields.insert(entry.field.to_string(), serde_json::to_value(&entry.value)?);
            }
        }
        Ok(json!({
            "target": serde_json::to_value(self.identity())?,
            "host": serde_json::to_value(self.host())?,
            "stage": self.stage(),
            "groups": groups,
        }))
    }
}
