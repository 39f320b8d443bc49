//! Field registry - the declarative table of every configurable field
//!
//! Each [`FieldDescriptor`] carries its type, default rule, consistency tag
//! and source bindings as plain data. The built-in table is assembled once
//! per process by [`FieldRegistry::builtin`].

mod extension_fields;
mod store;
mod target_fields;
mod types;

pub use store::{FieldRegistry, GroupSchema};
pub use types::{
    AliasKind, ComputedDefault, ConfigBinding, ConsistencyTag, DefaultContext, DefaultRule,
    Deprecation, FieldDescriptor, FieldKind, FlagBinding, GroupId, StaticDefault,
};

/// Config section holding the root target's build settings.
pub const BUILD_CONFIGURATION_SECTION: &str = "BuildConfiguration";

/// Every built-in group, root first.
pub fn builtin_groups() -> Vec<GroupSchema> {
    let mut groups = vec![GroupSchema::new(
        GroupId::Target,
        target_fields::target_fields(),
    )];
    groups.extend(extension_fields::extension_groups());
    groups
}
