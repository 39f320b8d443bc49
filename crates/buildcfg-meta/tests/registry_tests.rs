//! Tests for the built-in field table

use buildcfg_meta::{
    AliasKind, ConsistencyTag, FieldRegistry, FieldType, FieldValue, GroupId, TargetType,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn root_group_lists_target_type_first() {
    let registry = FieldRegistry::builtin();
    let target = registry.group(GroupId::Target).unwrap();
    assert_eq!(target.fields()[0].name, "target_type");
    assert_eq!(
        target.fields()[0].default_rule().and_then(|rule| match rule {
            buildcfg_meta::DefaultRule::Constant(value) => Some(value.clone()),
            _ => None,
        }),
        Some(TargetType::Game.field_value())
    );
}

#[rstest]
#[case("link_type", &["target_type"])]
#[case("has_exports", &["link_type"])]
#[case("build_developer_tools", &["compile_against_engine", "target_type"])]
#[case("build_target_developer_tools", &["build_developer_tools"])]
fn computed_fields_declare_dependencies(#[case] field: &str, #[case] expected: &[&str]) {
    let registry = FieldRegistry::builtin();
    let descriptor = registry.descriptor(GroupId::Target, field).unwrap();
    match descriptor.default_rule() {
        Some(buildcfg_meta::DefaultRule::Computed { depends_on, .. }) => {
            assert_eq!(*depends_on, expected)
        }
        other => panic!("{} is not computed: {:?}", field, other),
    }
}

#[rstest]
#[case("use_chaos", "compile_chaos", AliasKind::GetSet)]
#[case("include_editor_only_data", "build_with_editor_only_data", AliasKind::GetOnly)]
fn deprecated_aliases_forward_to_replacement(
    #[case] alias: &str,
    #[case] replacement: &str,
    #[case] kind: AliasKind,
) {
    let registry = FieldRegistry::builtin();
    let deprecation = registry
        .descriptor(GroupId::Target, alias)
        .unwrap()
        .deprecation()
        .copied()
        .unwrap();
    assert_eq!(deprecation.replacement, replacement);
    assert_eq!(deprecation.kind, kind);
}

#[test]
fn environment_sensitive_fields_include_crt_and_sanitizers() {
    let registry = FieldRegistry::builtin();
    let sensitive: Vec<_> = registry
        .environment_sensitive()
        .map(|(group, field)| format!("{}.{}", group, field.name))
        .collect();

    for expected in [
        "target.use_static_crt",
        "target.build_with_editor_only_data",
        "target.global_definitions",
        "windows.compiler",
        "linux.enable_memory_sanitizer",
        "android.minimum_sdk_version",
    ] {
        assert!(sensitive.iter().any(|s| s == expected), "missing {}", expected);
    }
    assert!(!sensitive.iter().any(|s| s == "target.use_unity_build"));
}

#[test]
fn aliases_are_never_environment_sensitive() {
    let registry = FieldRegistry::builtin();
    for group in registry.groups() {
        for field in group.fields() {
            if field.deprecation().is_some() {
                assert_eq!(field.tag, ConsistencyTag::Local, "{}", field.name);
            }
        }
    }
}

#[test]
fn list_fields_use_plus_separated_flags() {
    let registry = FieldRegistry::builtin();
    let defines = registry
        .descriptor(GroupId::Target, "global_definitions")
        .unwrap();
    assert_eq!(defines.field_type, FieldType::List);
    assert_eq!(defines.flags[0].flag, "Define");
    assert_eq!(defines.flags[0].list_separator, Some('+'));
}

#[test]
fn windows_target_version_defaults_to_win7() {
    let registry = FieldRegistry::builtin();
    let descriptor = registry
        .descriptor(GroupId::Windows, "target_windows_version")
        .unwrap();
    assert!(matches!(
        descriptor.default_rule(),
        Some(buildcfg_meta::DefaultRule::Constant(FieldValue::Int(0x601)))
    ));
}
