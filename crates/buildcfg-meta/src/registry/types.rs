//! Core types for the field registry

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::host::HostContext;
use crate::identity::TargetIdentity;
use crate::lookup::FieldLookup;
use crate::value::{FieldType, FieldValue};

/// A configurable object: the target root or one platform extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupId {
    Target,
    Windows,
    Mac,
    Linux,
    IOS,
    Android,
}

impl GroupId {
    /// Resolution order: the root group first, then extensions.
    pub const ALL: &'static [GroupId] = &[
        GroupId::Target,
        GroupId::Windows,
        GroupId::Mac,
        GroupId::Linux,
        GroupId::IOS,
        GroupId::Android,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupId::Target => "target",
            GroupId::Windows => "windows",
            GroupId::Mac => "mac",
            GroupId::Linux => "linux",
            GroupId::IOS => "ios",
            GroupId::Android => "android",
        }
    }

    pub fn is_extension(&self) -> bool {
        !matches!(self, GroupId::Target)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for GroupId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for GroupId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownVariant {
                kind: "field group",
                value: s.to_string(),
            })
    }
}

/// Whether a field must match across targets sharing compiled binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsistencyTag {
    /// Must be identical for every target in a shared build environment.
    EnvironmentSensitive,
    Local,
}

/// Location of a field's value in the config-file hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigBinding {
    pub section: &'static str,
    pub key: &'static str,
}

/// One command-line spelling bound to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagBinding {
    /// Flag name without the leading dash, matched case-insensitively.
    pub flag: &'static str,
    /// Value used whenever the flag appears, ignoring any value text.
    pub forced: Option<&'static str>,
    /// Separator splitting one flag value into several list items.
    pub list_separator: Option<char>,
}

/// Forwarding rule of a deprecated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKind {
    /// Reads forward to the replacement; writes are rejected.
    GetOnly,
    /// Reads and writes forward to the replacement.
    GetSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deprecation {
    pub replacement: &'static str,
    pub kind: AliasKind,
}

/// Inputs available to static default rules.
#[derive(Debug, Clone, Copy)]
pub struct DefaultContext<'a> {
    pub identity: &'a TargetIdentity,
    pub host: &'a HostContext,
}

pub type StaticDefault = fn(&DefaultContext<'_>) -> FieldValue;
pub type ComputedDefault = fn(&dyn FieldLookup) -> Result<FieldValue>;

/// How a field obtains its value when nothing overrides it.
#[derive(Clone)]
pub enum DefaultRule {
    Constant(FieldValue),
    /// Evaluated once when the configuration is seeded.
    Static(StaticDefault),
    /// Evaluated on every read from the current values of `depends_on`
    /// (fields of the same group).
    Computed {
        depends_on: &'static [&'static str],
        compute: ComputedDefault,
    },
}

impl fmt::Debug for DefaultRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultRule::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            DefaultRule::Static(_) => f.write_str("Static(..)"),
            DefaultRule::Computed { depends_on, .. } => f
                .debug_struct("Computed")
                .field("depends_on", depends_on)
                .finish(),
        }
    }
}

/// Storage behaviour of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Stored(DefaultRule),
    Alias(Deprecation),
}

/// Static metadata for one configurable field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub field_type: FieldType,
    pub kind: FieldKind,
    pub tag: ConsistencyTag,
    pub config: Vec<ConfigBinding>,
    pub flags: Vec<FlagBinding>,
    pub description: &'static str,
}

impl FieldDescriptor {
    pub fn new(name: &'static str, field_type: FieldType, default: DefaultRule) -> Self {
        Self {
            name,
            field_type,
            kind: FieldKind::Stored(default),
            tag: ConsistencyTag::Local,
            config: Vec::new(),
            flags: Vec::new(),
            description: "",
        }
    }

    pub fn constant(name: &'static str, field_type: FieldType, value: FieldValue) -> Self {
        Self::new(name, field_type, DefaultRule::Constant(value))
    }

    pub fn computed(
        name: &'static str,
        field_type: FieldType,
        depends_on: &'static [&'static str],
        compute: ComputedDefault,
    ) -> Self {
        Self::new(
            name,
            field_type,
            DefaultRule::Computed {
                depends_on,
                compute,
            },
        )
    }

    /// A deprecated name forwarding to `replacement`.
    pub fn alias(
        name: &'static str,
        field_type: FieldType,
        replacement: &'static str,
        kind: AliasKind,
    ) -> Self {
        Self {
            name,
            field_type,
            kind: FieldKind::Alias(Deprecation { replacement, kind }),
            tag: ConsistencyTag::Local,
            config: Vec::new(),
            flags: Vec::new(),
            description: "",
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn environment_sensitive(mut self) -> Self {
        self.tag = ConsistencyTag::EnvironmentSensitive;
        self
    }

    pub fn config(mut self, section: &'static str, key: &'static str) -> Self {
        self.config.push(ConfigBinding { section, key });
        self
    }

    pub fn flag(mut self, flag: &'static str) -> Self {
        self.flags.push(FlagBinding {
            flag,
            forced: None,
            list_separator: None,
        });
        self
    }

    pub fn flag_forcing(mut self, flag: &'static str, forced: &'static str) -> Self {
        self.flags.push(FlagBinding {
            flag,
            forced: Some(forced),
            list_separator: None,
        });
        self
    }

    pub fn list_flag(mut self, flag: &'static str, separator: char) -> Self {
        self.flags.push(FlagBinding {
            flag,
            forced: None,
            list_separator: Some(separator),
        });
        self
    }

    pub fn is_environment_sensitive(&self) -> bool {
        self.tag == ConsistencyTag::EnvironmentSensitive
    }

    pub fn default_rule(&self) -> Option<&DefaultRule> {
        match &self.kind {
            FieldKind::Stored(rule) => Some(rule),
            FieldKind::Alias(_) => None,
        }
    }

    pub fn deprecation(&self) -> Option<&Deprecation> {
        match &self.kind {
            FieldKind::Alias(deprecation) => Some(deprecation),
            FieldKind::Stored(_) => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.default_rule(), Some(DefaultRule::Computed { .. }))
    }

    /// Value the field is seeded with, or `None` for computed and alias fields.
    pub fn seed(&self, context: &DefaultContext<'_>) -> Option<FieldValue> {
        match self.default_rule()? {
            DefaultRule::Constant(value) => Some(value.clone()),
            DefaultRule::Static(rule) => Some(rule(context)),
            DefaultRule::Computed { .. } => None,
        }
    }

    /// Fail unless `value` has this field's declared type.
    pub fn check_value(&self, value: &FieldValue) -> Result<()> {
        if self.field_type.accepts(value) {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                field: self.name.to_string(),
                expected: self.field_type.to_string(),
                actual: value.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::Configuration;
    use crate::platform::Platform;

    #[test]
    fn builder_accumulates_bindings() {
        let descriptor = FieldDescriptor::constant("use_pch_files", FieldType::Bool, true.into())
            .config("BuildConfiguration", "bUsePCHFiles")
            .flag_forcing("NoPCH", "false")
            .describe("Use precompiled headers");

        assert_eq!(descriptor.config.len(), 1);
        assert_eq!(descriptor.flags[0].forced, Some("false"));
        assert_eq!(descriptor.tag, ConsistencyTag::Local);
        assert!(!descriptor.is_computed());
    }

    #[test]
    fn static_rules_seed_from_identity() {
        let identity = TargetIdentity::builder()
            .name("MyGame")
            .platform(Platform::Linux)
            .configuration(Configuration::Shipping)
            .build()
            .unwrap();
        let host = HostContext::new(Platform::Linux, true);
        let descriptor = FieldDescriptor::new(
            "use_precompiled",
            FieldType::Bool,
            DefaultRule::Static(|ctx| FieldValue::Bool(ctx.host.engine_installed)),
        );

        let context = DefaultContext {
            identity: &identity,
            host: &host,
        };
        assert_eq!(descriptor.seed(&context), Some(FieldValue::Bool(true)));
    }

    #[test]
    fn alias_has_no_seed() {
        let alias = FieldDescriptor::alias("use_chaos", FieldType::Bool, "compile_chaos", AliasKind::GetSet);
        assert!(alias.default_rule().is_none());
        assert_eq!(alias.deprecation().unwrap().replacement, "compile_chaos");
    }

    #[test]
    fn check_value_rejects_wrong_type() {
        let descriptor = FieldDescriptor::constant("n", FieldType::Int, FieldValue::Int(0));
        assert!(descriptor.check_value(&FieldValue::Int(3)).is_ok());
        assert!(matches!(
            descriptor.check_value(&FieldValue::Bool(true)),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn group_ids_parse_and_display() {
        assert_eq!("Windows".parse::<GroupId>().unwrap(), GroupId::Windows);
        assert_eq!(GroupId::IOS.to_string(), "ios");
        assert!(!GroupId::Target.is_extension());
    }
}
