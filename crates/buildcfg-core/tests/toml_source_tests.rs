//! End-to-end tests over on-disk TOML config hierarchies

use std::sync::Arc;

use buildcfg_core::{
    ConfigFileSource, ConfigPipeline, ConfigResolver, DiskNativizedPluginLocator, Error,
    TargetConfiguration, TargetRequest, TomlConfigSource, ValueOrigin,
};
use buildcfg_meta::{FieldValue, GroupId, HostContext, Platform, RawValue, TargetType};
use buildcfg_test_utils::identity::project_identity;
use buildcfg_test_utils::project::TestProject;
use pretty_assertions::assert_eq;

fn pipeline_for(project: &TestProject) -> ConfigPipeline {
    let source: Arc<dyn ConfigFileSource> =
        Arc::new(TomlConfigSource::new(project.engine_config_dir()));
    let resolver = ConfigResolver::new(HostContext::new(Platform::Win64, false))
        .with_nativized_locator(Arc::new(DiskNativizedPluginLocator::new(Arc::clone(&source))));
    ConfigPipeline::new(resolver, source)
}

fn game_request(project: &TestProject, platform: Platform) -> TargetRequest {
    TargetRequest::new(
        project_identity(project.name(), platform, project.project_file()),
        TargetType::Game,
    )
}

#[test]
fn test_project_config_overrides_engine_config() {
    let project = TestProject::new("MyGame");
    project.write_engine_config(
        r#"
[BuildConfiguration]
bUseStaticCRT = true
bUseUnityBuild = false
"#,
    );
    project.write_project_config(
        r#"
[BuildConfiguration]
bUseStaticCRT = false
"#,
    );

    let config = pipeline_for(&project)
        .build(&game_request(&project, Platform::Win64))
        .unwrap();

    assert_eq!(config.get("use_static_crt").unwrap(), FieldValue::Bool(false));
    assert_eq!(config.get("use_unity_build").unwrap(), FieldValue::Bool(false));
    assert_eq!(
        config.origin_of(GroupId::Target, "use_unity_build").unwrap(),
        ValueOrigin::ConfigFile
    );
}

#[test]
fn test_platform_config_applies_to_its_platform_only() {
    let project = TestProject::new("MyGame");
    project.write_platform_config(
        Platform::Linux,
        r#"
[BuildConfiguration]
bUseIncrementalLinking = true

["/Script/LinuxTargetPlatform.LinuxTargetSettings"]
bSaveSymFile = false
"#,
    );
    let pipeline = pipeline_for(&project);

    let linux = pipeline.build(&game_request(&project, Platform::Linux)).unwrap();
    let windows = pipeline.build(&game_request(&project, Platform::Win64)).unwrap();

    assert!(linux.get_bool("use_incremental_linking").unwrap());
    assert!(!linux.platform_extension().get_bool("save_sym_file").unwrap());
    assert!(!windows.get_bool("use_incremental_linking").unwrap());
}

#[test]
fn test_deprecated_config_key_feeds_replacement() {
    let project = TestProject::new("MyGame");
    project.write_project_config(
        r#"
[BuildConfiguration]
bUseChaos = false
"#,
    );

    let config = pipeline_for(&project)
        .build(&game_request(&project, Platform::Win64))
        .unwrap();

    assert_eq!(config.get("compile_chaos").unwrap(), FieldValue::Bool(false));
    assert_eq!(config.get("use_chaos").unwrap(), FieldValue::Bool(false));
}

#[test]
fn test_malformed_file_reports_its_path() {
    let project = TestProject::new("MyGame");
    project.write_project_config("[BuildConfiguration\nbUseStaticCRT = ");

    let err = pipeline_for(&project)
        .build(&game_request(&project, Platform::Win64))
        .unwrap_err();

    match err {
        Error::ConfigParse { path, .. } => assert!(path.ends_with("Config/DefaultEngine.toml")),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_nativized_plugin_from_packaging_settings() {
    let project = TestProject::new("MyGame");
    project.write_project_config(
        r#"
["/Script/UnrealEd.ProjectPackagingSettings"]
BlueprintNativizationMethod = "Inclusive"
"#,
    );
    let manifest = project.write_nativized_plugin(Platform::Win64, TargetType::Game);

    let config = pipeline_for(&project)
        .build(&game_request(&project, Platform::Win64))
        .unwrap();

    assert_eq!(
        config.get("nativized_plugin").unwrap(),
        FieldValue::some(manifest.display().to_string())
    );
}

#[test]
fn test_lookup_is_case_insensitive_on_keys() {
    let project = TestProject::new("MyGame");
    project.write_project_config(
        r#"
[BuildConfiguration]
busestaticcrt = true
"#,
    );
    let source = TomlConfigSource::new(project.engine_config_dir());

    let value = source
        .lookup(
            "BuildConfiguration",
            "bUseStaticCRT",
            Some(&project.project_dir()),
            Platform::Win64,
        )
        .unwrap();

    assert_eq!(value, Some(RawValue::Bool(true)));
}
