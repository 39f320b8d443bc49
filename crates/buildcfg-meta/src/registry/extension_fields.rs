//! Per-platform extension groups

use super::store::GroupSchema;
use super::types::{FieldDescriptor, GroupId};
use crate::kinds::{StaticAnalyzer, WindowsCompiler};
use crate::value::{FieldType, FieldValue};

const WINDOWS: &str = "/Script/WindowsTargetPlatform.WindowsTargetSettings";
const MAC: &str = "/Script/MacTargetPlatform.MacTargetSettings";
const LINUX: &str = "/Script/LinuxTargetPlatform.LinuxTargetSettings";
const IOS: &str = "/Script/IOSRuntimeSettings.IOSRuntimeSettings";
const ANDROID: &str = "/Script/AndroidRuntimeSettings.AndroidRuntimeSettings";

fn sanitizer(name: &'static str, flag: &'static str, section: &'static str, key: &'static str) -> FieldDescriptor {
    FieldDescriptor::constant(name, FieldType::Bool, FieldValue::Bool(false))
        .environment_sensitive()
        .config(section, key)
        .flag_forcing(flag, "true")
}

fn address_sanitizer(section: &'static str) -> FieldDescriptor {
    sanitizer("enable_address_sanitizer", "EnableASan", section, "bEnableAddressSanitizer")
        .describe("Instrument with AddressSanitizer")
}

fn thread_sanitizer(section: &'static str) -> FieldDescriptor {
    sanitizer("enable_thread_sanitizer", "EnableTSan", section, "bEnableThreadSanitizer")
        .describe("Instrument with ThreadSanitizer")
}

fn undefined_sanitizer(section: &'static str) -> FieldDescriptor {
    sanitizer(
        "enable_undefined_behavior_sanitizer",
        "EnableUBSan",
        section,
        "bEnableUndefinedBehaviorSanitizer",
    )
    .describe("Instrument with UndefinedBehaviorSanitizer")
}

fn windows_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::constant(
            "compiler",
            FieldType::Enum(WindowsCompiler::VARIANTS),
            WindowsCompiler::Default.field_value(),
        )
        .environment_sensitive()
        .config(WINDOWS, "Compiler")
        .flag_forcing("2022", "VisualStudio2022")
        .flag_forcing("Clang", "Clang")
        .flag_forcing("Intel", "Intel")
        .describe("Compiler toolchain"),
        FieldDescriptor::constant(
            "static_analyzer",
            FieldType::Enum(StaticAnalyzer::VARIANTS),
            StaticAnalyzer::None.field_value(),
        )
        .flag("StaticAnalyzer")
        .describe("Static analyzer run during compilation"),
        FieldDescriptor::constant("strict_conformance_mode", FieldType::Bool, false.into())
            .environment_sensitive()
            .config(WINDOWS, "bStrictConformanceMode")
            .flag_forcing("Strict", "true")
            .describe("Enable strict standard conformance"),
        FieldDescriptor::constant("pch_memory_allocation_factor", FieldType::Int, FieldValue::Int(0))
            .config(WINDOWS, "PCHMemoryAllocationFactor"),
        FieldDescriptor::constant("target_windows_version", FieldType::Int, FieldValue::Int(0x601))
            .environment_sensitive()
            .config(WINDOWS, "TargetWindowsVersion")
            .describe("Minimum supported Windows version"),
        FieldDescriptor::constant("windows_sdk_version", FieldType::Optional, FieldValue::none())
            .config(WINDOWS, "WindowsSDKVersion")
            .flag("WindowsSDKVersion"),
        address_sanitizer(WINDOWS),
    ]
}

fn mac_fields() -> Vec<FieldDescriptor> {
    vec![
        address_sanitizer(MAC),
        thread_sanitizer(MAC),
        undefined_sanitizer(MAC),
        FieldDescriptor::constant("use_dsym_files", FieldType::Bool, true.into())
            .config(MAC, "bUseDSYMFiles")
            .describe("Split debug symbols into dSYM bundles"),
    ]
}

fn linux_fields() -> Vec<FieldDescriptor> {
    vec![
        address_sanitizer(LINUX),
        thread_sanitizer(LINUX),
        undefined_sanitizer(LINUX),
        sanitizer("enable_memory_sanitizer", "EnableMSan", LINUX, "bEnableMemorySanitizer")
            .describe("Instrument with MemorySanitizer"),
        FieldDescriptor::constant("save_sym_file", FieldType::Bool, true.into())
            .config(LINUX, "bSaveSymFile")
            .describe("Write a .sym file next to the binaries"),
    ]
}

fn ios_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::constant("generate_dsym", FieldType::Bool, false.into())
            .config(IOS, "bGeneratedSYMFile")
            .describe("Generate dSYM debug symbols"),
        address_sanitizer(IOS),
        thread_sanitizer(IOS),
        FieldDescriptor::constant("minimum_ios_version", FieldType::Str, FieldValue::str("15.0"))
            .environment_sensitive()
            .config(IOS, "MinimumiOSVersion")
            .describe("Lowest OS version the binaries run on"),
    ]
}

fn android_fields() -> Vec<FieldDescriptor> {
    vec![
        address_sanitizer(ANDROID),
        sanitizer(
            "enable_hw_address_sanitizer",
            "EnableHWASan",
            ANDROID,
            "bEnableHWAddressSanitizer",
        )
        .describe("Instrument with hardware-assisted AddressSanitizer"),
        thread_sanitizer(ANDROID),
        undefined_sanitizer(ANDROID),
        FieldDescriptor::constant("minimum_sdk_version", FieldType::Int, FieldValue::Int(26))
            .environment_sensitive()
            .config(ANDROID, "MinSDKVersion")
            .describe("Lowest API level the binaries run on"),
    ]
}

pub(super) fn extension_groups() -> Vec<GroupSchema> {
    vec![
        GroupSchema::new(GroupId::Windows, windows_fields()),
        GroupSchema::new(GroupId::Mac, mac_fields()),
        GroupSchema::new(GroupId::Linux, linux_fields()),
        GroupSchema::new(GroupId::IOS, ios_fields()),
        GroupSchema::new(GroupId::Android, android_fields()),
    ]
}
