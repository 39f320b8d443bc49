//! Process-wide facts about the build host
//!
//! These are fixed once at start-up and only ever read during resolution, so
//! they are shared between concurrently resolving targets without locking.

use serde::Serialize;

use crate::platform::Platform;

/// Read-only facts about the machine running the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HostContext {
    pub host_platform: Platform,
    /// Whether the engine is an installed (precompiled) distribution.
    pub engine_installed: bool,
}

impl HostContext {
    pub fn new(host_platform: Platform, engine_installed: bool) -> Self {
        Self {
            host_platform,
            engine_installed,
        }
    }

    /// Detect the host platform; falls back to Linux on unknown hosts.
    pub fn detect(engine_installed: bool) -> Self {
        Self::new(Platform::host().unwrap_or(Platform::Linux), engine_installed)
    }
}

impl Default for HostContext {
    fn default() -> Self {
        Self::detect(false)
    }
}
