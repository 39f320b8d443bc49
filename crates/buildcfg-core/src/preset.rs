//! Target-type preset bundles
//!
//! Each target type forces a bundle of settings once its configuration is
//! resolved. Bundle values are recorded with origin `Preset`: they override
//! defaults, config files and platform resets, but never command-line or
//! caller values. Applying a bundle twice leaves the configuration exactly
//! as applying it once.

use buildcfg_meta::{FieldLookup, FieldValue, GroupId, LinkType, TargetType};
use tracing::debug;

use crate::config::{MutableConfiguration, ResolutionStage, TargetConfiguration, ValueOrigin};
use crate::error::{Error, Result};

/// Fixed field values forced by a type.
struct Bundle {
    values: &'static [(&'static str, bool)],
    /// Whether `has_exports` follows the current link type.
    exports_follow_link_type: bool,
    definitions: &'static [&'static str],
}

const GAME: Bundle = Bundle {
    values: &[
        ("build_with_editor_only_data", false),
        ("build_requires_cooked_data", true),
        ("compile_against_engine", true),
    ],
    exports_follow_link_type: true,
    definitions: &["TARGET_GAME=1"],
};

const CLIENT: Bundle = Bundle {
    values: &[
        ("build_with_editor_only_data", false),
        ("build_requires_cooked_data", true),
        ("compile_against_engine", true),
        ("with_server_code", false),
    ],
    exports_follow_link_type: true,
    definitions: &["TARGET_GAME=1"],
};

const EDITOR: Bundle = Bundle {
    values: &[
        ("build_with_editor_only_data", true),
        ("build_requires_cooked_data", false),
        ("compile_against_engine", true),
        ("with_perf_counters", true),
        ("include_plugins_for_target_platforms", true),
    ],
    exports_follow_link_type: true,
    definitions: &["TARGET_EDITOR=1"],
};

const SERVER: Bundle = Bundle {
    values: &[
        ("build_requires_cooked_data", true),
        ("compile_against_engine", true),
        ("with_perf_counters", true),
    ],
    exports_follow_link_type: true,
    definitions: &["TARGET_SERVER=1", "USE_NULL_RHI=1"],
};

fn bundle(target_type: TargetType) -> Option<&'static Bundle> {
    match target_type {
        TargetType::Game => Some(&GAME),
        TargetType::Client => Some(&CLIENT),
        TargetType::Editor => Some(&EDITOR),
        TargetType::Server => Some(&SERVER),
        TargetType::Program => None,
    }
}

/// Applies the preset bundle of a target type and finalizes the
/// configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetTypePresetApplier;

impl TargetTypePresetApplier {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, config: &mut MutableConfiguration, target_type: TargetType) -> Result<()> {
        config.require_stage(ResolutionStage::Resolved, "apply preset to")?;
        config
            .identity()
            .platform()
            .capabilities()
            .check_target_type(target_type)?;

        config.set("target_type", target_type.field_value(), ValueOrigin::Preset)?;
        let recorded = config.target_type()?;
        if recorded != target_type {
            return Err(Error::TargetTypeConflict {
                target: config.identity().name().to_string(),
                requested: target_type,
                recorded,
                origin: config.origin_of(GroupId::Target, "target_type")?,
            });
        }

        if let Some(bundle) = bundle(target_type) {
            let mut skipped = 0;
            for (field, value) in bundle.values {
                if !config.set(field, FieldValue::Bool(*value), ValueOrigin::Preset)? {
                    skipped += 1;
                }
            }
            if bundle.exports_follow_link_type {
                let exports = config.link_type()? == LinkType::Modular;
                config.set("has_exports", FieldValue::Bool(exports), ValueOrigin::Preset)?;
            }
            config.append_unique(
                GroupId::Target,
                "global_definitions",
                bundle.definitions.iter().copied(),
                ValueOrigin::Preset,
            )?;
            debug!(
                target_name = config.identity().name(),
                %target_type,
                skipped,
                "Preset applied"
            );
        }

        config.advance(ResolutionStage::Finalized);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildcfg_meta::{FieldRegistry, HostContext, Platform, TargetIdentity};

    fn resolved(platform: Platform) -> MutableConfiguration {
        let identity = TargetIdentity::builder()
            .name("MyGame")
            .platform(platform)
            .build()
            .unwrap();
        let mut config = MutableConfiguration::seed(
            FieldRegistry::builtin(),
            identity,
            HostContext::new(Platform::Win64, false),
        );
        config.advance(ResolutionStage::Resolved);
        config
    }

    #[test]
    fn seeded_configuration_is_refused() {
        let identity = TargetIdentity::builder()
            .name("MyGame")
            .platform(Platform::Win64)
            .build()
            .unwrap();
        let mut config = MutableConfiguration::seed(
            FieldRegistry::builtin(),
            identity,
            HostContext::new(Platform::Win64, false),
        );
        let err = TargetTypePresetApplier
            .apply(&mut config, TargetType::Game)
            .unwrap_err();
        assert!(matches!(err, Error::Stage { .. }));
    }

    #[test]
    fn server_bundle_adds_null_rhi() {
        let mut config = resolved(Platform::Linux);
        TargetTypePresetApplier
            .apply(&mut config, TargetType::Server)
            .unwrap();
        assert_eq!(
            config.get("global_definitions").unwrap(),
            FieldValue::list(["TARGET_SERVER=1", "USE_NULL_RHI=1"])
        );
        assert_eq!(config.get("with_perf_counters").unwrap(), FieldValue::Bool(true));
        assert_eq!(config.stage(), ResolutionStage::Finalized);
    }

    #[test]
    fn client_bundle_drops_server_code() {
        let mut config = resolved(Platform::Win64);
        TargetTypePresetApplier
            .apply(&mut config, TargetType::Client)
            .unwrap();
        assert_eq!(config.get("with_server_code").unwrap(), FieldValue::Bool(false));
        assert_eq!(
            config.get("global_definitions").unwrap(),
            FieldValue::list(["TARGET_GAME=1"])
        );
    }

    #[test]
    fn program_has_no_bundle_but_is_finalized() {
        let mut config = resolved(Platform::Win64);
        TargetTypePresetApplier
            .apply(&mut config, TargetType::Program)
            .unwrap();
        assert_eq!(config.get("global_definitions").unwrap(), FieldValue::empty_list());
        assert_eq!(config.get("launch_module_name").unwrap(), FieldValue::none());
        assert_eq!(config.stage(), ResolutionStage::Finalized);
    }

    #[test]
    fn command_line_values_survive_the_bundle() {
        let mut config = resolved(Platform::Win64);
        config
            .set("with_perf_counters", false.into(), ValueOrigin::CommandLine)
            .unwrap();
        TargetTypePresetApplier
            .apply(&mut config, TargetType::Editor)
            .unwrap();
        assert_eq!(config.get("with_perf_counters").unwrap(), FieldValue::Bool(false));
        assert_eq!(config.get("build_with_editor_only_data").unwrap(), FieldValue::Bool(true));
    }

    #[test]
    fn unsupported_type_is_an_identity_error() {
        let mut config = resolved(Platform::IOS);
        let err = TargetTypePresetApplier
            .apply(&mut config, TargetType::Editor)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Meta(buildcfg_meta::Error::UnsupportedTargetType { .. })
        ));
    }
}
