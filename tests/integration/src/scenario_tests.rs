//! Reference scenarios for resolved target configurations

use std::sync::Arc;

use buildcfg_core::crypto::{ENCRYPTION_KEY_REGISTRATION, SIGNING_KEY_REGISTRATION};
use buildcfg_core::{
    CommandLine, ConfigPipeline, ConfigResolver, ImmutableConfiguration, MemoryConfigSource,
    SharedEnvironmentValidator, TargetRequest,
};
use buildcfg_meta::{FieldValue, GroupId, HostContext, Platform, TargetType};
use buildcfg_test_utils::identity::identity;
use pretty_assertions::assert_eq;

fn build(name: &str, target_type: TargetType, args: &str) -> ImmutableConfiguration {
    let pipeline = ConfigPipeline::new(
        ConfigResolver::new(HostContext::new(Platform::Win64, false)),
        Arc::new(MemoryConfigSource::new()),
    );
    let request = TargetRequest::new(identity(name, Platform::Win64), target_type)
        .with_command_line(CommandLine::parse(args));
    pipeline.build(&request).unwrap()
}

#[test]
fn test_plain_game_target() {
    let config = build("MyGame", TargetType::Game, "");

    assert!(!config.get_bool("build_with_editor_only_data").unwrap());
    assert!(config.get_bool("build_requires_cooked_data").unwrap());
    assert!(config.get_bool("compile_against_engine").unwrap());
    assert!(!config.get_bool("formal_build").unwrap());
    assert_eq!(
        &*config.get_list("global_definitions").unwrap(),
        &["TARGET_GAME=1".to_string()]
    );
}

#[test]
fn test_editor_target() {
    let config = build("MyEditor", TargetType::Editor, "");

    assert_eq!(config.get("link_type").unwrap(), FieldValue::Enum("Modular"));
    assert!(config.get_bool("has_exports").unwrap());
    assert!(config.get_bool("build_with_editor_only_data").unwrap());
    assert!(!config.get_bool("build_requires_cooked_data").unwrap());
    assert!(config.get_bool("with_perf_counters").unwrap());
    assert!(config.get_bool("build_developer_tools").unwrap());
    assert_eq!(
        &*config.get_list("global_definitions").unwrap(),
        &["TARGET_EDITOR=1".to_string()]
    );
}

#[test]
fn test_missing_crypto_settings_define_empty_macros() {
    let config = build("MyGame", TargetType::Game, "");

    assert_eq!(
        config.get_list("project_definitions").unwrap().to_vec(),
        vec![
            format!("{}=", ENCRYPTION_KEY_REGISTRATION),
            format!("{}=", SIGNING_KEY_REGISTRATION),
        ]
    );
}

#[test]
fn test_static_crt_is_the_only_mismatch() {
    let a = build("GameA", TargetType::Game, "-StaticCRT");
    let b = build("GameB", TargetType::Game, "");

    let report = SharedEnvironmentValidator.validate(&a, &b).unwrap();

    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].group, GroupId::Target);
    assert_eq!(report.mismatches[0].field, "use_static_crt");
    assert_eq!(report.mismatches[0].value_a, FieldValue::Bool(true));
    assert_eq!(report.mismatches[0].value_b, FieldValue::Bool(false));
}

#[test]
fn test_deprecated_alias_reads_forward() {
    let config = build("MyGame", TargetType::Game, "");

    assert_eq!(
        config.get("include_editor_only_data").unwrap(),
        config.get("build_with_editor_only_data").unwrap()
    );
}

#[test]
fn test_windows_extension_defaults() {
    let config = build("MyGame", TargetType::Game, "-Clang");
    let windows = config.extension(GroupId::Windows).unwrap();

    assert_eq!(windows.get("compiler").unwrap(), FieldValue::Enum("Clang"));
    assert_eq!(windows.get("target_windows_version").unwrap(), FieldValue::Int(0x601));
}
