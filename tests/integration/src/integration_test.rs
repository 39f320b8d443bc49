//! End-to-end test over an on-disk project
//!
//! This test exercises the complete flow: TOML config hierarchy -> layered
//! resolution -> presets -> projection -> shared-environment planning.

use std::sync::Arc;

use buildcfg_core::{
    CommandLine, ConfigFileSource, ConfigPipeline, ConfigResolver, CryptoSettings,
    DiskNativizedPluginLocator, MismatchPolicy, SharedEnvironmentPlanner, StaticKeyStore,
    TargetConfiguration, TargetRequest, TomlConfigSource, UniqueReason, ValueOrigin,
};
use buildcfg_meta::{FieldValue, GroupId, HostContext, Platform, TargetType};
use buildcfg_test_utils::identity::project_identity;
use buildcfg_test_utils::project::TestProject;
use pretty_assertions::assert_eq;

/// Set up a project with engine, project and Linux platform config
fn setup_project() -> TestProject {
    let project = TestProject::new("Shooter");
    project.write_engine_config(
        r#"
[BuildConfiguration]
bUseUnityBuild = true
bUseLoggingInShipping = false
"#,
    );
    project.write_project_config(
        r#"
[BuildConfiguration]
bUseLoggingInShipping = true
bWithPushModel = true

["/Script/UnrealEd.ProjectPackagingSettings"]
BlueprintNativizationMethod = "Exclusive"
"#,
    );
    project.write_platform_config(
        Platform::Linux,
        r#"
["/Script/LinuxTargetPlatform.LinuxTargetSettings"]
bEnableAddressSanitizer = true
"#,
    );
    project
}

fn pipeline(project: &TestProject) -> ConfigPipeline {
    let source: Arc<dyn ConfigFileSource> =
        Arc::new(TomlConfigSource::new(project.engine_config_dir()));
    let settings = CryptoSettings {
        encryption_key: Some(vec![0xde, 0xad]),
        enable_pak_full_asset_encryption: true,
        ..CryptoSettings::default()
    };
    let resolver = ConfigResolver::new(HostContext::new(Platform::Linux, false))
        .with_key_store(Arc::new(StaticKeyStore::new(settings)))
        .with_nativized_locator(Arc::new(DiskNativizedPluginLocator::new(Arc::clone(&source))));
    ConfigPipeline::new(resolver, source)
}

fn request(project: &TestProject, name: &str, target_type: TargetType, args: &str) -> TargetRequest {
    TargetRequest::new(
        project_identity(name, Platform::Linux, project.project_file()),
        target_type,
    )
    .with_command_line(CommandLine::parse(args))
}

#[test]
fn test_full_project_flow() {
    let project = setup_project();
    let manifest = project.write_nativized_plugin(Platform::Linux, TargetType::Game);
    let pipeline = pipeline(&project);

    let results = pipeline.build_many(&[
        request(&project, "Shooter", TargetType::Game, ""),
        request(&project, "ShooterServer", TargetType::Server, ""),
        request(&project, "ShooterEditor", TargetType::Editor, ""),
    ]);
    let configs: Vec<_> = results.into_iter().map(Result::unwrap).collect();
    let game = &configs[0];

    // Project config beats engine config
    assert!(game.get_bool("use_logging_in_shipping").unwrap());
    assert_eq!(
        game.origin_of(GroupId::Target, "use_logging_in_shipping").unwrap(),
        ValueOrigin::ConfigFile
    );
    assert!(game.get_bool("with_push_model").unwrap());

    // Platform config lands in the Linux extension only
    let linux = game.platform_extension();
    assert_eq!(linux.group(), GroupId::Linux);
    assert!(linux.get_bool("enable_address_sanitizer").unwrap());

    // Generated values
    assert_eq!(
        game.get_list("project_definitions").unwrap()[0],
        "IMPLEMENT_ENCRYPTION_KEY_REGISTRATION()=UE_REGISTER_ENCRYPTION_KEY(0xde,0xad)"
    );
    assert_eq!(
        game.get("nativized_plugin").unwrap(),
        FieldValue::some(manifest.display().to_string())
    );
    // No plugin was generated for the server
    assert_eq!(configs[1].get("nativized_plugin").unwrap(), FieldValue::none());

    // Game, server and editor cannot share one environment
    let plan = SharedEnvironmentPlanner::new(MismatchPolicy::ForceUnique)
        .plan(&configs)
        .unwrap();
    assert_eq!(plan.reference.as_deref(), Some("Shooter"));
    assert_eq!(plan.shared, vec!["Shooter".to_string()]);
    assert!(plan.is_unique("ShooterServer"));
    assert!(plan.is_unique("ShooterEditor"));
    assert!(
        plan.unique
            .iter()
            .all(|u| matches!(u.reason, UniqueReason::Inconsistent(_)))
    );
}

#[test]
fn test_json_rendering() {
    let project = setup_project();
    let config = pipeline(&project)
        .build(&request(&project, "Shooter", TargetType::Game, "-Define=EXTRA=1"))
        .unwrap();

    let json = config.to_json().unwrap();

    assert_eq!(json["stage"], "finalized");
    assert_eq!(json["target"]["name"], "Shooter");
    assert_eq!(
        json["groups"]["target"]["global_definitions"],
        serde_json::json!(["EXTRA=1", "TARGET_GAME=1"])
    );
    assert_eq!(json["groups"]["linux"]["enable_address_sanitizer"], true);
    // Aliases are not rendered
    assert!(json["groups"]["target"].get("use_chaos").is_none());
}
