//! Root target fields
//!
//! Declaration order is the order fields are listed and rendered in.

use super::BUILD_CONFIGURATION_SECTION as BUILD;
use super::types::{AliasKind, DefaultRule, FieldDescriptor};
use crate::error::Result;
use crate::kinds::{BuildEnvironment, LinkType, TargetType};
use crate::lookup::FieldLookup;
use crate::value::{FieldType, FieldValue};

const TARGET_TYPES: FieldType = FieldType::Enum(TargetType::VARIANTS);
const LINK_TYPES: FieldType = FieldType::Enum(LinkType::VARIANTS);
const ENVIRONMENTS: FieldType = FieldType::Enum(BuildEnvironment::VARIANTS);

fn link_type(fields: &dyn FieldLookup) -> Result<FieldValue> {
    let link = match fields.target_type()? {
        TargetType::Editor => LinkType::Modular,
        _ => LinkType::Monolithic,
    };
    Ok(link.field_value())
}

fn build_developer_tools(fields: &dyn FieldLookup) -> Result<FieldValue> {
    let tools_type = matches!(
        fields.target_type()?,
        TargetType::Editor | TargetType::Program
    );
    Ok(FieldValue::Bool(
        fields.root_bool("compile_against_engine")? && tools_type,
    ))
}

fn build_target_developer_tools(fields: &dyn FieldLookup) -> Result<FieldValue> {
    fields.root("build_developer_tools")
}

fn launch_module_name(fields: &dyn FieldLookup) -> Result<FieldValue> {
    Ok(match fields.target_type()? {
        TargetType::Program => FieldValue::none(),
        _ => FieldValue::some("Launch"),
    })
}

fn is_editor(fields: &dyn FieldLookup) -> Result<FieldValue> {
    Ok(FieldValue::Bool(fields.target_type()? == TargetType::Editor))
}

fn build_with_editor_only_data(fields: &dyn FieldLookup) -> Result<FieldValue> {
    Ok(FieldValue::Bool(matches!(
        fields.target_type()?,
        TargetType::Editor | TargetType::Program
    )))
}

fn build_requires_cooked_data(fields: &dyn FieldLookup) -> Result<FieldValue> {
    Ok(FieldValue::Bool(fields.target_type()?.requires_cooked_data()))
}

fn with_server_code(fields: &dyn FieldLookup) -> Result<FieldValue> {
    Ok(FieldValue::Bool(fields.target_type()? != TargetType::Client))
}

fn has_exports(fields: &dyn FieldLookup) -> Result<FieldValue> {
    Ok(FieldValue::Bool(fields.link_type()? == LinkType::Modular))
}

fn bool_field(name: &'static str, value: bool) -> FieldDescriptor {
    FieldDescriptor::constant(name, FieldType::Bool, FieldValue::Bool(value))
}

pub(super) fn target_fields() -> Vec<FieldDescriptor> {
    vec![
        // Target shape
        FieldDescriptor::constant("target_type", TARGET_TYPES, TargetType::Game.field_value())
            .describe("Category of target"),
        FieldDescriptor::computed("link_type", LINK_TYPES, &["target_type"], link_type)
            .flag_forcing("Monolithic", "Monolithic")
            .flag_forcing("Modular", "Modular")
            .describe("Modular for editors, monolithic otherwise"),
        FieldDescriptor::constant(
            "build_environment",
            ENVIRONMENTS,
            BuildEnvironment::Shared.field_value(),
        )
        .flag_forcing("SharedBuildEnvironment", "Shared")
        .flag_forcing("UniqueBuildEnvironment", "Unique")
        .describe("Whether engine binaries are shared with other targets"),
        FieldDescriptor::computed(
            "launch_module_name",
            FieldType::Optional,
            &["target_type"],
            launch_module_name,
        )
        .describe("Module providing the entry point; none for programs"),
        FieldDescriptor::computed("has_exports", FieldType::Bool, &["link_type"], has_exports)
            .describe("Whether the binaries export symbols"),
        bool_field("should_compile_as_dll", false)
            .flag("CompileAsDll")
            .describe("Build the target as a library"),
        // Engine linkage
        bool_field("compile_against_engine", true)
            .environment_sensitive()
            .describe("Link against the engine modules"),
        bool_field("compile_against_core_uobject", true)
            .environment_sensitive()
            .describe("Link against the object system"),
        bool_field("compile_against_application_core", true)
            .environment_sensitive()
            .describe("Link against the application layer"),
        bool_field("compile_with_plugin_support", false)
            .environment_sensitive()
            .describe("Support loading plugins"),
        FieldDescriptor::computed(
            "build_with_editor_only_data",
            FieldType::Bool,
            &["target_type"],
            build_with_editor_only_data,
        )
        .environment_sensitive()
        .config(BUILD, "bBuildWithEditorOnlyData")
        .describe("Compile editor-only data"),
        FieldDescriptor::computed(
            "build_requires_cooked_data",
            FieldType::Bool,
            &["target_type"],
            build_requires_cooked_data,
        )
        .describe("Target runs cooked content"),
        FieldDescriptor::computed(
            "build_developer_tools",
            FieldType::Bool,
            &["compile_against_engine", "target_type"],
            build_developer_tools,
        )
        .environment_sensitive()
        .config(BUILD, "bBuildDeveloperTools")
        .describe("Compile developer tools"),
        FieldDescriptor::computed(
            "build_target_developer_tools",
            FieldType::Bool,
            &["build_developer_tools"],
            build_target_developer_tools,
        )
        .config(BUILD, "bBuildTargetDeveloperTools")
        .describe("Compile developer tools for the target platform"),
        FieldDescriptor::computed(
            "with_server_code",
            FieldType::Bool,
            &["target_type"],
            with_server_code,
        )
        .environment_sensitive()
        .describe("Compile server-only code"),
        bool_field("with_perf_counters", false)
            .environment_sensitive()
            .describe("Compile performance counters"),
        bool_field("with_push_model", false)
            .environment_sensitive()
            .config(BUILD, "bWithPushModel")
            .describe("Compile push-model replication"),
        FieldDescriptor::computed("with_speed_tree", FieldType::Bool, &["target_type"], is_editor)
            .describe("Compile SpeedTree support"),
        FieldDescriptor::computed(
            "include_plugins_for_target_platforms",
            FieldType::Bool,
            &["target_type"],
            is_editor,
        )
        .describe("Include plugins for every target platform"),
        bool_field("compile_icu", true)
            .environment_sensitive()
            .config(BUILD, "bCompileICU")
            .describe("Compile ICU unicode support"),
        bool_field("compile_cef3", true)
            .environment_sensitive()
            .config(BUILD, "bCompileCEF3")
            .describe("Compile the embedded browser"),
        bool_field("compile_ispc", true)
            .environment_sensitive()
            .config(BUILD, "bCompileISPC")
            .describe("Compile ISPC kernels"),
        bool_field("compile_chaos", true)
            .environment_sensitive()
            .config(BUILD, "bCompileChaos")
            .describe("Compile the physics engine"),
        FieldDescriptor::alias("use_chaos", FieldType::Bool, "compile_chaos", AliasKind::GetSet)
            .config(BUILD, "bUseChaos")
            .describe("Deprecated; use compile_chaos"),
        FieldDescriptor::alias(
            "include_editor_only_data",
            FieldType::Bool,
            "build_with_editor_only_data",
            AliasKind::GetOnly,
        )
        .describe("Deprecated; use build_with_editor_only_data"),
        // Runtime libraries and checks
        bool_field("use_static_crt", false)
            .environment_sensitive()
            .config(BUILD, "bUseStaticCRT")
            .flag("StaticCRT")
            .describe("Link the C runtime statically"),
        bool_field("use_debug_crt", false)
            .environment_sensitive()
            .config(BUILD, "bDebugBuildsActuallyUseDebugCRT")
            .describe("Use the debug C runtime in debug builds"),
        bool_field("use_iterator_debugging", false)
            .environment_sensitive()
            .config(BUILD, "bUseIteratorDebugging")
            .describe("Enable checked standard library iterators"),
        bool_field("use_logging_in_shipping", false)
            .environment_sensitive()
            .config(BUILD, "bUseLoggingInShipping")
            .describe("Keep logging in shipping builds"),
        bool_field("use_checks_in_shipping", false)
            .environment_sensitive()
            .config(BUILD, "bUseChecksInShipping")
            .describe("Keep assertions in shipping builds"),
        bool_field("use_malloc_profiler", false)
            .environment_sensitive()
            .config(BUILD, "bUseMallocProfiler")
            .describe("Compile the allocation profiler"),
        bool_field("use_inlining", true)
            .config(BUILD, "bUseInlining")
            .describe("Allow function inlining"),
        // Build options
        bool_field("use_unity_build", true)
            .config(BUILD, "bUseUnityBuild")
            .flag_forcing("DisableUnity", "false")
            .describe("Batch sources into unity files"),
        bool_field("force_unity_build", false)
            .config(BUILD, "bForceUnityBuild")
            .flag("ForceUnity")
            .describe("Use unity files even for small modules"),
        bool_field("use_adaptive_unity_build", true)
            .config(BUILD, "bUseAdaptiveUnityBuild")
            .describe("Exclude recently modified files from unity batches"),
        bool_field("use_pch_files", true)
            .config(BUILD, "bUsePCHFiles")
            .flag_forcing("NoPCH", "false")
            .describe("Use precompiled headers"),
        bool_field("use_shared_pchs", true)
            .config(BUILD, "bUseSharedPCHs")
            .flag_forcing("NoSharedPCH", "false")
            .describe("Share precompiled headers between modules"),
        bool_field("use_incremental_linking", false)
            .config(BUILD, "bUseIncrementalLinking")
            .flag_forcing("IncrementalLinking", "true")
            .flag_forcing("NoIncrementalLinking", "false")
            .describe("Link incrementally"),
        bool_field("allow_ltcg", false)
            .config(BUILD, "bAllowLTCG")
            .flag_forcing("LTCG", "true")
            .describe("Allow link-time code generation"),
        bool_field("pgo_profile", false)
            .flag("PGOProfile")
            .describe("Instrument for profile-guided optimisation"),
        bool_field("pgo_optimize", false)
            .flag("PGOOptimize")
            .describe("Optimise with recorded profile data"),
        bool_field("disable_debug_info", false)
            .config(BUILD, "bDisableDebugInfo")
            .flag_forcing("NoDebugInfo", "true")
            .describe("Omit debug information"),
        bool_field("compile_for_size", false)
            .config(BUILD, "bCompileForSize")
            .describe("Optimise for size instead of speed"),
        FieldDescriptor::new(
            "formal_build",
            FieldType::Bool,
            DefaultRule::Static(|ctx| {
                let version = ctx.identity.version();
                FieldValue::Bool(version.is_promoted_build && version.changelist > 0)
            }),
        )
        .config(BUILD, "bFormalBuild")
        .flag_forcing("Formal", "true")
        .describe("Formal build for distribution; on for promoted builds"),
        FieldDescriptor::new(
            "use_precompiled",
            FieldType::Bool,
            DefaultRule::Static(|ctx| FieldValue::Bool(ctx.host.engine_installed)),
        )
        .flag_forcing("UsePrecompiled", "true")
        .describe("Link against precompiled engine binaries"),
        bool_field("precompile", false)
            .flag_forcing("Precompile", "true")
            .describe("Produce binaries for later precompiled use"),
        bool_field("build_all_modules", false)
            .flag_forcing("AllModules", "true")
            .describe("Build every module, not only dependencies"),
        bool_field("build_additional_console_app", true)
            .config(BUILD, "bBuildAdditionalConsoleApp")
            .describe("Produce a console variant of the executable"),
        bool_field("with_low_level_tests", false)
            .flag_forcing("WithLowLevelTests", "true")
            .describe("Compile low level tests"),
        bool_field("deploy_after_compile", false)
            .flag_forcing("Deploy", "true")
            .describe("Deploy to a device after compiling"),
        FieldDescriptor::constant("compiler_arguments", FieldType::Optional, FieldValue::none())
            .flag("CompilerArguments")
            .describe("Extra arguments for the compiler"),
        FieldDescriptor::constant("linker_arguments", FieldType::Optional, FieldValue::none())
            .flag("LinkerArguments")
            .describe("Extra arguments for the linker"),
        FieldDescriptor::constant("enable_plugins", FieldType::List, FieldValue::empty_list())
            .list_flag("EnablePlugin", '+')
            .describe("Plugins forced on"),
        FieldDescriptor::constant("disable_plugins", FieldType::List, FieldValue::empty_list())
            .list_flag("DisablePlugin", '+')
            .describe("Plugins forced off"),
        FieldDescriptor::constant(
            "global_definitions",
            FieldType::List,
            FieldValue::empty_list(),
        )
        .environment_sensitive()
        .list_flag("Define", '+')
        .describe("Preprocessor definitions applied to every module"),
        FieldDescriptor::constant(
            "project_definitions",
            FieldType::List,
            FieldValue::empty_list(),
        )
        .describe("Preprocessor definitions applied to project modules"),
        FieldDescriptor::constant("nativized_plugin", FieldType::Optional, FieldValue::none())
            .describe("Generated plugin holding nativized assets"),
    ]
}
