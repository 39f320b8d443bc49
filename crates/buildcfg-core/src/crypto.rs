//! Pak encryption and signing key registration
//!
//! Every resolved target carries two generated definitions in
//! `project_definitions`, one registering the encryption key and one the
//! signing key. When a key is absent or disabled, its macro is defined empty.

use std::path::Path;

use buildcfg_meta::Platform;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Prefix of the encryption key registration definition.
pub const ENCRYPTION_KEY_REGISTRATION: &str = "IMPLEMENT_ENCRYPTION_KEY_REGISTRATION()";

/// Prefix of the signing key registration definition.
pub const SIGNING_KEY_REGISTRATION: &str = "IMPLEMENT_SIGNING_KEY_REGISTRATION()";

/// RSA key pair used to sign pak files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKey {
    pub exponent: Vec<u8>,
    pub modulus: Vec<u8>,
}

/// Crypto settings of one project and platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoSettings {
    pub encryption_key: Option<Vec<u8>>,
    pub signing_key: Option<SigningKey>,
    pub enable_pak_index_encryption: bool,
    pub enable_pak_ini_encryption: bool,
    pub enable_pak_uasset_encryption: bool,
    pub enable_pak_full_asset_encryption: bool,
    pub enable_pak_signing: bool,
}

impl CryptoSettings {
    /// A key is present and at least one pak encryption mode uses it.
    pub fn is_encryption_enabled(&self) -> bool {
        self.encryption_key.as_ref().is_some_and(|k| !k.is_empty())
            && (self.enable_pak_index_encryption
                || self.enable_pak_ini_encryption
                || self.enable_pak_uasset_encryption
                || self.enable_pak_full_asset_encryption)
    }

    pub fn is_signing_enabled(&self) -> bool {
        self.enable_pak_signing
            && self
                .signing_key
                .as_ref()
                .is_some_and(|k| !k.exponent.is_empty() && !k.modulus.is_empty())
    }
}

/// Source of a project's crypto settings.
pub trait CryptoKeyStore: Send + Sync {
    fn load(&self, project_dir: Option<&Path>, platform: Platform) -> Result<Option<CryptoSettings>>;
}

/// Key store that never has keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeyStore;

impl CryptoKeyStore for NoKeyStore {
    fn load(&self, _project_dir: Option<&Path>, _platform: Platform) -> Result<Option<CryptoSettings>> {
        Ok(None)
    }
}

/// Key store returning the same settings for every target.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyStore {
    settings: CryptoSettings,
}

impl StaticKeyStore {
    pub fn new(settings: CryptoSettings) -> Self {
        Self { settings }
    }
}

impl CryptoKeyStore for StaticKeyStore {
    fn load(&self, _project_dir: Option<&Path>, _platform: Platform) -> Result<Option<CryptoSettings>> {
        Ok(Some(self.settings.clone()))
    }
}

/// The two key registration definitions for `settings`.
pub fn registration_definitions(settings: Option<&CryptoSettings>) -> [String; 2] {
    let encryption = settings
        .filter(|s| s.is_encryption_enabled())
        .and_then(|s| s.encryption_key.as_deref())
        .map(|key| format!("UE_REGISTER_ENCRYPTION_KEY({})", hex_list(key)))
        .unwrap_or_default();

    let signing = settings
        .filter(|s| s.is_signing_enabled())
        .and_then(|s| s.signing_key.as_ref())
        .map(|key| {
            format!(
                "UE_REGISTER_SIGNING_KEY(UE_LIST_ARGUMENT({}), UE_LIST_ARGUMENT({}))",
                hex_list(&key.exponent),
                hex_list(&key.modulus)
            )
        })
        .unwrap_or_default();

    [
        format!("{}={}", ENCRYPTION_KEY_REGISTRATION, encryption),
        format!("{}={}", SIGNING_KEY_REGISTRATION, signing),
    ]
}

/// Whether `definition` is one of the generated registration definitions.
pub fn is_registration_definition(definition: &str) -> bool {
    definition.starts_with(ENCRYPTION_KEY_REGISTRATION)
        || definition.starts_with(SIGNING_KEY_REGISTRATION)
}

fn hex_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{:02x}", b))
        .collect::<Vec<_>>()
        .join(",")
}
