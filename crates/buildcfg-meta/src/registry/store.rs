//! Field registry storage and validation

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock};

use super::types::{AliasKind, DefaultRule, FieldDescriptor, GroupId};
use crate::error::{Error, Result};
use crate::value::FieldType;

static BUILTIN: LazyLock<Arc<FieldRegistry>> = LazyLock::new(|| {
    Arc::new(
        FieldRegistry::new(super::builtin_groups()).expect("built-in field table is valid"),
    )
});

/// Ordered field table of one configurable object.
#[derive(Debug, Clone)]
pub struct GroupSchema {
    id: GroupId,
    fields: Vec<FieldDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl GroupSchema {
    pub fn new(id: GroupId, fields: Vec<FieldDescriptor>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name, i))
            .collect();
        Self { id, fields, index }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Declarative metadata for every configurable field, built once.
///
/// Construction validates the table: unique names, defaults of the declared
/// type, well-formed aliases and bindings, and an acyclic dependency graph
/// between computed fields.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    groups: BTreeMap<GroupId, GroupSchema>,
}

impl FieldRegistry {
    pub fn new(groups: Vec<GroupSchema>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for group in groups {
            validate_group(&group)?;
            map.insert(group.id, group);
        }
        if !map.contains_key(&GroupId::Target) {
            return Err(Error::InvalidDescriptor {
                field: "<target>".to_string(),
                reason: "registry has no target group".to_string(),
            });
        }
        let registry = Self { groups: map };
        tracing::debug!(
            groups = registry.groups.len(),
            fields = registry.field_count(),
            "Field registry validated"
        );
        Ok(registry)
    }

    /// The built-in registry, shared by every resolution in the process.
    pub fn builtin() -> Arc<FieldRegistry> {
        Arc::clone(&BUILTIN)
    }

    pub fn group(&self, id: GroupId) -> Option<&GroupSchema> {
        self.groups.get(&id)
    }

    /// Groups in resolution order (root first).
    pub fn groups(&self) -> impl Iterator<Item = &GroupSchema> {
        self.groups.values()
    }

    pub fn descriptor(&self, group: GroupId, name: &str) -> Result<&FieldDescriptor> {
        self.group(group)
            .and_then(|g| g.get(name))
            .ok_or_else(|| Error::UnknownField {
                group,
                field: name.to_string(),
            })
    }

    /// Every environment-sensitive stored field, root group first.
    pub fn environment_sensitive(&self) -> impl Iterator<Item = (GroupId, &FieldDescriptor)> {
        self.groups.values().flat_map(|g| {
            g.fields()
                .iter()
                .filter(|f| f.is_environment_sensitive() && f.deprecation().is_none())
                .map(move |f| (g.id, f))
        })
    }

    pub fn field_count(&self) -> usize {
        self.groups.values().map(GroupSchema::len).sum()
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> Error {
    Error::InvalidDescriptor {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn validate_group(group: &GroupSchema) -> Result<()> {
    if group.index.len() != group.fields.len() {
        let mut seen = HashMap::new();
        for field in &group.fields {
            if seen.insert(field.name, ()).is_some() {
                return Err(invalid(field.name, "declared twice"));
            }
        }
    }

    for field in &group.fields {
        validate_bindings(field)?;
        match field.deprecation() {
            Some(deprecation) => {
                let replacement = group
                    .get(deprecation.replacement)
                    .ok_or_else(|| invalid(field.name, "alias replacement does not exist"))?;
                if replacement.deprecation().is_some() {
                    return Err(invalid(field.name, "alias forwards to another alias"));
                }
                if replacement.field_type != field.field_type {
                    return Err(invalid(field.name, "alias type differs from replacement"));
                }
                if deprecation.kind == AliasKind::GetOnly
                    && !(field.config.is_empty() && field.flags.is_empty())
                {
                    return Err(invalid(field.name, "get-only alias cannot have bindings"));
                }
                if field.is_environment_sensitive() {
                    return Err(invalid(field.name, "aliases carry no consistency tag"));
                }
            }
            None => {
                if let Some(DefaultRule::Constant(value)) = field.default_rule() {
                    field.check_value(value)?;
                }
                if let Some(DefaultRule::Computed { depends_on, .. }) = field.default_rule() {
                    for dep in depends_on.iter() {
                        if group.get(dep).is_none() {
                            return Err(invalid(
                                field.name,
                                format!("depends on unknown field '{}'", dep),
                            ));
                        }
                    }
                }
            }
        }
    }

    check_acyclic(group)
}

fn validate_bindings(field: &FieldDescriptor) -> Result<()> {
    for flag in &field.flags {
        if flag.flag.starts_with('-') || flag.flag.contains(['=', '+']) {
            return Err(invalid(field.name, format!("malformed flag '{}'", flag.flag)));
        }
        if flag.list_separator.is_some() && field.field_type != FieldType::List {
            return Err(invalid(field.name, "list separator on a non-list field"));
        }
        if let Some(forced) = flag.forced {
            field
                .field_type
                .coerce(field.name, &crate::value::RawValue::text(forced))?;
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

fn check_acyclic(group: &GroupSchema) -> Result<()> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    for field in group.fields() {
        visit(group, field.name, &mut marks)?;
    }
    Ok(())
}

fn visit<'a>(
    group: &'a GroupSchema,
    name: &'a str,
    marks: &mut HashMap<&'a str, Mark>,
) -> Result<()> {
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            return Err(Error::DependencyCycle {
                field: name.to_string(),
                via: name.to_string(),
            });
        }
        None => {}
    }

    let Some(field) = group.get(name) else {
        return Ok(());
    };
    marks.insert(name, Mark::Visiting);
    if let Some(DefaultRule::Computed { depends_on, .. }) = field.default_rule() {
        for dep in depends_on.iter() {
            if marks.get(dep) == Some(&Mark::Visiting) {
                return Err(Error::DependencyCycle {
                    field: name.to_string(),
                    via: dep.to_string(),
                });
            }
            visit(group, dep, marks)?;
        }
    }
    marks.insert(name, Mark::Done);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::FieldLookup;
    use crate::registry::ConsistencyTag;
    use crate::value::FieldValue;

    fn always_true(_: &dyn FieldLookup) -> Result<FieldValue> {
        Ok(FieldValue::Bool(true))
    }

    fn target(fields: Vec<FieldDescriptor>) -> Vec<GroupSchema> {
        vec![GroupSchema::new(GroupId::Target, fields)]
    }

    #[test]
    fn builtin_registry_is_valid_and_shared() {
        let a = FieldRegistry::builtin();
        let b = FieldRegistry::builtin();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.group(GroupId::Target).is_some());
        assert_eq!(a.groups().next().map(GroupSchema::id), Some(GroupId::Target));
    }

    #[test]
    fn builtin_registry_has_every_extension_group() {
        let registry = FieldRegistry::builtin();
        for group in GroupId::ALL {
            assert!(registry.group(*group).is_some(), "missing group {}", group);
        }
    }

    #[test]
    fn environment_sensitive_skips_local_fields() {
        let registry = FieldRegistry::builtin();
        assert!(
            registry
                .environment_sensitive()
                .all(|(_, f)| f.tag == ConsistencyTag::EnvironmentSensitive)
        );
        assert!(
            registry
                .environment_sensitive()
                .any(|(g, f)| g == GroupId::Target && f.name == "use_static_crt")
        );
        assert!(
            registry
                .environment_sensitive()
                .any(|(g, _)| g == GroupId::Windows)
        );
    }

    #[test]
    fn unknown_field_lookup_names_group() {
        let registry = FieldRegistry::builtin();
        let err = registry.descriptor(GroupId::Mac, "nope").unwrap_err();
        assert_eq!(
            err,
            Error::UnknownField {
                group: GroupId::Mac,
                field: "nope".into()
            }
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let groups = target(vec![
            FieldDescriptor::constant("a", FieldType::Bool, true.into()),
            FieldDescriptor::constant("a", FieldType::Bool, false.into()),
        ]);
        assert!(matches!(
            FieldRegistry::new(groups),
            Err(Error::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn mistyped_constant_default_is_rejected() {
        let groups = target(vec![FieldDescriptor::constant(
            "a",
            FieldType::Int,
            true.into(),
        )]);
        assert!(matches!(
            FieldRegistry::new(groups),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn dependency_cycles_are_rejected() {
        let groups = target(vec![
            FieldDescriptor::computed("a", FieldType::Bool, &["b"], always_true),
            FieldDescriptor::computed("b", FieldType::Bool, &["c"], always_true),
            FieldDescriptor::computed("c", FieldType::Bool, &["a"], always_true),
        ]);
        assert!(matches!(
            FieldRegistry::new(groups),
            Err(Error::DependencyCycle { .. })
        ));
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let groups = target(vec![FieldDescriptor::computed(
            "a",
            FieldType::Bool,
            &["a"],
            always_true,
        )]);
        assert!(matches!(
            FieldRegistry::new(groups),
            Err(Error::DependencyCycle { .. })
        ));
    }

    #[test]
    fn unknown_dependency_is_rejected() {
        let groups = target(vec![FieldDescriptor::computed(
            "a",
            FieldType::Bool,
            &["missing"],
            always_true,
        )]);
        assert!(FieldRegistry::new(groups).is_err());
    }

    #[test]
    fn get_only_alias_with_binding_is_rejected() {
        let groups = target(vec![
            FieldDescriptor::constant("a", FieldType::Bool, true.into()),
            FieldDescriptor::alias("old_a", FieldType::Bool, "a", AliasKind::GetOnly)
                .flag("OldA"),
        ]);
        assert!(FieldRegistry::new(groups).is_err());
    }

    #[test]
    fn list_separator_requires_list_field() {
        let groups = target(vec![
            FieldDescriptor::constant("a", FieldType::Bool, true.into()).list_flag("A", '+'),
        ]);
        assert!(FieldRegistry::new(groups).is_err());
    }

    #[test]
    fn forced_flag_value_must_coerce() {
        let groups = target(vec![
            FieldDescriptor::constant("a", FieldType::Bool, true.into()).flag_forcing("A", "sometimes"),
        ]);
        assert!(matches!(
            FieldRegistry::new(groups),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn registry_without_target_group_is_rejected() {
        let groups = vec![GroupSchema::new(GroupId::Mac, vec![])];
        assert!(FieldRegistry::new(groups).is_err());
    }
}
