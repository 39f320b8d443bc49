//! Closed enumerations used by target identities and configuration fields
//!
//! Each enum converts to and from its variant name (case-insensitive on
//! parse) and to a [`FieldValue::Enum`] so it can be stored in a
//! configuration slot.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::value::FieldValue;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Variant names, in declaration order.
            pub const VARIANTS: &'static [&'static str] = &[$(stringify!($variant)),+];

            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            pub fn field_value(&self) -> $crate::value::FieldValue {
                $crate::value::FieldValue::Enum(self.as_str())
            }

            /// Read a variant back out of a stored field value.
            pub fn from_field(value: &$crate::value::FieldValue) -> Option<Self> {
                value.as_str().and_then(|s| s.parse().ok())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| $crate::error::Error::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

pub(crate) use string_enum;

string_enum! {
    /// Category of target, driving default bundles.
    pub enum TargetType as "target type" {
        /// Cooked, monolithic game executable.
        Game,
        /// Game without server code.
        Client,
        /// Modular editor build.
        Editor,
        /// Dedicated server.
        Server,
        /// Standalone program; no preset bundle.
        Program,
    }
}

impl TargetType {
    /// Types that run cooked content.
    pub fn requires_cooked_data(&self) -> bool {
        matches!(self, TargetType::Game | TargetType::Client | TargetType::Server)
    }
}

string_enum! {
    /// How modules are linked into the final binaries.
    pub enum LinkType as "link type" {
        /// Everything in a single binary.
        Monolithic,
        /// Separate dynamic modules.
        Modular,
    }
}

string_enum! {
    /// Whether a target shares compiled engine artifacts with other targets.
    pub enum BuildEnvironment as "build environment" {
        Shared,
        Unique,
    }
}

string_enum! {
    /// Build configuration of a target.
    pub enum Configuration as "configuration" {
        Debug,
        DebugGame,
        Development,
        Shipping,
        Test,
    }
}

string_enum! {
    /// Compiler family used on Windows.
    pub enum WindowsCompiler as "windows compiler" {
        Default,
        VisualStudio2022,
        Clang,
        Intel,
    }
}

string_enum! {
    /// Static analyzer run alongside compilation on Windows.
    pub enum StaticAnalyzer as "static analyzer" {
        None,
        Default,
        PVSStudio,
    }
}

/// Parse helper for callers holding a `FieldValue` that should be a
/// particular enum.
pub fn parse_field<T>(field: &str, value: &FieldValue) -> Result<T, Error>
where
    T: FromStr<Err = Error> + fmt::Debug,
{
    value
        .as_str()
        .ok_or_else(|| Error::TypeMismatch {
            field: field.to_string(),
            expected: "enum".to_string(),
            actual: value.kind().to_string(),
        })?
        .parse()
}
