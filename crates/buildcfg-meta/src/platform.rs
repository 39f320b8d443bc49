//! Target platforms and their capability records
//!
//! Platform support is a flat table looked up by [`Platform`]: each record
//! lists the platform's groups, valid architectures, the target types it can
//! build, which extension group carries its specific settings, and the field
//! values its engineering defaults reset.

use crate::error::{Error, Result};
use crate::kinds::{TargetType, string_enum};
use crate::registry::GroupId;

string_enum! {
    /// Platform a target is compiled for.
    pub enum Platform as "platform" {
        Win64,
        Mac,
        Linux,
        LinuxArm64,
        IOS,
        TVOS,
        Android,
    }
}

/// Broad families a platform belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformGroup {
    Windows,
    Microsoft,
    Apple,
    Unix,
    Linux,
    Android,
    Desktop,
    Mobile,
}

/// Capability record for one platform.
#[derive(Debug, Clone, Copy)]
pub struct PlatformCapabilities {
    pub platform: Platform,
    pub groups: &'static [PlatformGroup],
    /// Valid architecture names; the first one is the default.
    pub architectures: &'static [&'static str],
    pub supported_target_types: &'static [TargetType],
    /// Extension group holding this platform's specific settings.
    pub extension: GroupId,
    /// Root fields reset by the platform's engineering defaults.
    pub reset_defaults: &'static [(&'static str, bool)],
}

const ALL_TYPES: &[TargetType] = &[
    TargetType::Game,
    TargetType::Client,
    TargetType::Editor,
    TargetType::Server,
    TargetType::Program,
];

const DEVICE_TYPES: &[TargetType] = &[TargetType::Game, TargetType::Client];

static CAPABILITIES: &[PlatformCapabilities] = &[
    PlatformCapabilities {
        platform: Platform::Win64,
        groups: &[
            PlatformGroup::Windows,
            PlatformGroup::Microsoft,
            PlatformGroup::Desktop,
        ],
        architectures: &["x64", "arm64"],
        supported_target_types: ALL_TYPES,
        extension: GroupId::Windows,
        reset_defaults: &[],
    },
    PlatformCapabilities {
        platform: Platform::Mac,
        groups: &[PlatformGroup::Apple, PlatformGroup::Unix, PlatformGroup::Desktop],
        architectures: &["arm64", "x86_64"],
        supported_target_types: ALL_TYPES,
        extension: GroupId::Mac,
        reset_defaults: &[("build_additional_console_app", false)],
    },
    PlatformCapabilities {
        platform: Platform::Linux,
        groups: &[PlatformGroup::Unix, PlatformGroup::Linux, PlatformGroup::Desktop],
        architectures: &["x86_64-unknown-linux-gnu"],
        supported_target_types: ALL_TYPES,
        extension: GroupId::Linux,
        reset_defaults: &[("build_additional_console_app", false)],
    },
    PlatformCapabilities {
        platform: Platform::LinuxArm64,
        groups: &[PlatformGroup::Unix, PlatformGroup::Linux, PlatformGroup::Desktop],
        architectures: &["aarch64-unknown-linux-gnueabi"],
        supported_target_types: &[
            TargetType::Game,
            TargetType::Client,
            TargetType::Server,
            TargetType::Program,
        ],
        extension: GroupId::Linux,
        reset_defaults: &[("build_additional_console_app", false), ("compile_cef3", false)],
    },
    PlatformCapabilities {
        platform: Platform::IOS,
        groups: &[PlatformGroup::Apple, PlatformGroup::Mobile],
        architectures: &["arm64"],
        supported_target_types: DEVICE_TYPES,
        extension: GroupId::IOS,
        reset_defaults: &[
            ("build_additional_console_app", false),
            ("compile_cef3", false),
            ("compile_ispc", false),
        ],
    },
    PlatformCapabilities {
        platform: Platform::TVOS,
        groups: &[PlatformGroup::Apple, PlatformGroup::Mobile],
        architectures: &["arm64"],
        supported_target_types: DEVICE_TYPES,
        extension: GroupId::IOS,
        reset_defaults: &[
            ("build_additional_console_app", false),
            ("compile_cef3", false),
            ("compile_ispc", false),
            ("compile_icu", false),
        ],
    },
    PlatformCapabilities {
        platform: Platform::Android,
        groups: &[PlatformGroup::Android, PlatformGroup::Unix, PlatformGroup::Mobile],
        architectures: &["arm64", "x64"],
        supported_target_types: DEVICE_TYPES,
        extension: GroupId::Android,
        reset_defaults: &[("build_additional_console_app", false), ("compile_cef3", false)],
    },
];

impl Platform {
    /// Capability record for this platform.
    pub fn capabilities(&self) -> &'static PlatformCapabilities {
        CAPABILITIES
            .iter()
            .find(|c| c.platform == *self)
            .unwrap_or(&CAPABILITIES[0])
    }

    /// Platform the current process was compiled for, when it is a build host.
    pub fn host() -> Option<Platform> {
        if cfg!(target_os = "windows") {
            Some(Platform::Win64)
        } else if cfg!(target_os = "macos") {
            Some(Platform::Mac)
        } else if cfg!(all(target_os = "linux", target_arch = "aarch64")) {
            Some(Platform::LinuxArm64)
        } else if cfg!(target_os = "linux") {
            Some(Platform::Linux)
        } else {
            None
        }
    }
}

impl PlatformCapabilities {
    pub fn is_in_group(&self, group: PlatformGroup) -> bool {
        self.groups.contains(&group)
    }

    pub fn default_architecture(&self) -> &'static str {
        self.architectures.first().copied().unwrap_or_default()
    }

    pub fn supports(&self, target_type: TargetType) -> bool {
        self.supported_target_types.contains(&target_type)
    }

    /// Normalise an architecture name: empty selects the default.
    pub fn resolve_architecture(&self, architecture: &str) -> Result<&'static str> {
        if architecture.is_empty() {
            return Ok(self.default_architecture());
        }
        self.architectures
            .iter()
            .copied()
            .find(|a| a.eq_ignore_ascii_case(architecture))
            .ok_or_else(|| Error::InvalidArchitecture {
                architecture: architecture.to_string(),
                platform: self.platform.to_string(),
            })
    }

    /// Fail unless `target_type` can be built for this platform.
    pub fn check_target_type(&self, target_type: TargetType) -> Result<()> {
        if self.supports(target_type) {
            Ok(())
        } else {
            Err(Error::UnsupportedTargetType {
                target_type: target_type.to_string(),
                platform: self.platform.to_string(),
            })
        }
    }
}

/// Every capability record, in platform declaration order.
pub fn all_capabilities() -> &'static [PlatformCapabilities] {
    CAPABILITIES
}
