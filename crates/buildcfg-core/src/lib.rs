//! Configuration resolution and shared-environment consistency for buildcfg
//!
//! This crate turns a target identity and its config sources into a
//! finalized, read-only configuration, and checks that targets sharing
//! compiled binaries agree on every environment-sensitive field:
//!
//! - **Sources**: config-file and command-line adapters
//! - **Resolution**: layered defaulting into a mutable configuration
//! - **Presets**: per-type bundles that finalize a configuration
//! - **Projection**: the frozen, read-only view
//! - **Environment**: pairwise validation and shared-environment planning
//!
//! # Architecture
//!
//! ```text
//!                 buildcfg-cli
//!                      |
//!                buildcfg-core
//!                      |
//!                buildcfg-meta
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use buildcfg_core::{ConfigPipeline, ConfigResolver, MemoryConfigSource, TargetRequest};
//! use buildcfg_meta::{HostContext, Platform, TargetIdentity, TargetType};
//!
//! fn example() -> buildcfg_core::Result<()> {
//!     let identity = TargetIdentity::builder()
//!         .name("MyGame")
//!         .platform(Platform::Win64)
//!         .build()?;
//!     let pipeline = ConfigPipeline::new(
//!         ConfigResolver::new(HostContext::detect(false)),
//!         Arc::new(MemoryConfigSource::new()),
//!     );
//!     let config = pipeline.build(&TargetRequest::new(identity, TargetType::Game))?;
//!     assert!(!config.get_bool("build_with_editor_only_data")?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crypto;
pub mod environment;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod platform;
pub mod plugins;
pub mod preset;
pub mod projection;
pub mod source;

pub use config::{
    ConfigResolver, FieldEntry, MutableConfiguration, ResolutionStage, TargetConfiguration,
    ValueOrigin,
};
pub use crypto::{CryptoKeyStore, CryptoSettings, NoKeyStore, SigningKey, StaticKeyStore};
pub use environment::{
    ConsistencyReport, EnvironmentPlan, FieldMismatch, MismatchPolicy, SharedEnvironmentPlanner,
    SharedEnvironmentValidator, UniqueReason, UniqueTarget,
};
pub use error::{Error, Result};
pub use pipeline::{CallerOverride, ConfigPipeline, TargetRequest};
pub use platform::{CapabilityDefaults, PlatformDefaults, PlatformHooks, ResetScope};
pub use plugins::{DiskNativizedPluginLocator, NativizedPluginLocator, NoNativizedPlugins};
pub use preset::TargetTypePresetApplier;
pub use projection::{ImmutableConfiguration, ImmutableExtension, ReadOnlyProjector};
pub use source::{
    CommandLine, ConfigFileSource, ConfigSourceAdapter, LayeredSources, MemoryConfigSource,
    SourceEntry, TomlConfigSource,
};
