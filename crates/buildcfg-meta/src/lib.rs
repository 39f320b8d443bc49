//! Field metadata and target identity for buildcfg.
//!
//! This crate holds the static half of target configuration: the closed
//! enumerations, the platform capability table, target identities and the
//! [`FieldRegistry`] describing every configurable field. It has no notion of
//! resolution; see `buildcfg-core` for that.

pub mod error;
pub mod host;
pub mod identity;
pub mod kinds;
pub mod lookup;
pub mod platform;
pub mod registry;
pub mod value;

pub use error::{Error, Result};
pub use host::HostContext;
pub use identity::{BuildVersion, TargetIdentity, TargetIdentityBuilder};
pub use kinds::{
    BuildEnvironment, Configuration, LinkType, StaticAnalyzer, TargetType, WindowsCompiler,
    parse_field,
};
pub use lookup::FieldLookup;
pub use platform::{Platform, PlatformCapabilities, PlatformGroup, all_capabilities};
pub use registry::{
    AliasKind, ConfigBinding, ConsistencyTag, DefaultContext, DefaultRule, Deprecation,
    FieldDescriptor, FieldKind, FieldRegistry, FlagBinding, GroupId, GroupSchema,
};
pub use value::{FieldType, FieldValue, Override, RawValue};
