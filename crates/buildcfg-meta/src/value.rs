//! Field values, declared field types and raw source values
//!
//! Every configurable field carries a [`FieldType`]. Values arriving from a
//! config file or the command line are [`RawValue`]s and must be coerced into
//! a [`FieldValue`] of the declared type before they reach a configuration.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Declared type of a configurable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Int,
    Str,
    /// A string that may be absent.
    Optional,
    /// Ordered list of strings.
    List,
    /// Closed set of variant names, matched case-insensitively.
    Enum(&'static [&'static str]),
}

impl FieldType {
    /// Check that a value is of this type (and, for enums, a known variant).
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (FieldType::Bool, FieldValue::Bool(_))
            | (FieldType::Int, FieldValue::Int(_))
            | (FieldType::Str, FieldValue::Str(_))
            | (FieldType::Optional, FieldValue::Optional(_))
            | (FieldType::List, FieldValue::List(_)) => true,
            (FieldType::Enum(variants), FieldValue::Enum(v)) => variants.contains(v),
            _ => false,
        }
    }

    /// Coerce a raw source value into this type.
    ///
    /// Failure is reported against `field`; callers must not substitute a
    /// default when this fails.
    pub fn coerce(&self, field: &str, raw: &RawValue) -> Result<FieldValue> {
        let invalid = || Error::InvalidValue {
            field: field.to_string(),
            expected: self.to_string(),
            raw: raw.to_string(),
        };

        match (self, raw) {
            (FieldType::Bool, RawValue::Bool(b)) => Ok(FieldValue::Bool(*b)),
            (FieldType::Bool, RawValue::Text(text)) => {
                parse_bool(text).map(FieldValue::Bool).ok_or_else(invalid)
            }
            (FieldType::Int, RawValue::Int(i)) => Ok(FieldValue::Int(*i)),
            (FieldType::Int, RawValue::Text(text)) => text
                .trim()
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| invalid()),
            (FieldType::Str, RawValue::Text(text)) => Ok(FieldValue::Str(text.clone())),
            (FieldType::Optional, RawValue::Text(text)) if text.is_empty() => {
                Ok(FieldValue::Optional(None))
            }
            (FieldType::Optional, RawValue::Text(text)) => {
                Ok(FieldValue::Optional(Some(text.clone())))
            }
            (FieldType::List, RawValue::List(items)) => Ok(FieldValue::List(items.clone())),
            (FieldType::List, RawValue::Text(text)) => Ok(FieldValue::List(vec![text.clone()])),
            (FieldType::Enum(variants), RawValue::Text(text)) => variants
                .iter()
                .find(|v| v.eq_ignore_ascii_case(text.trim()))
                .map(|v| FieldValue::Enum(*v))
                .ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => write!(f, "bool"),
            FieldType::Int => write!(f, "int"),
            FieldType::Str => write!(f, "string"),
            FieldType::Optional => write!(f, "optional string"),
            FieldType::List => write!(f, "list"),
            FieldType::Enum(variants) => write!(f, "one of [{}]", variants.join(", ")),
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A resolved, typed field value.
///
/// Equality is value equality; lists compare as ordered sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Optional(Option<String>),
    List(Vec<String>),
    Enum(&'static str),
}

impl FieldValue {
    pub fn str(value: impl Into<String>) -> Self {
        FieldValue::Str(value.into())
    }

    pub fn some(value: impl Into<String>) -> Self {
        FieldValue::Optional(Some(value.into()))
    }

    pub fn none() -> Self {
        FieldValue::Optional(None)
    }

    pub fn empty_list() -> Self {
        FieldValue::List(Vec::new())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// String view of `Str`, `Enum` and present `Optional` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            FieldValue::Enum(s) => Some(s),
            FieldValue::Optional(Some(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the value's shape, used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Str(_) => "string",
            FieldValue::Optional(_) => "optional string",
            FieldValue::List(_) => "list",
            FieldValue::Enum(_) => "enum",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Str(s) => write!(f, "\"{}\"", s),
            FieldValue::Optional(Some(s)) => write!(f, "\"{}\"", s),
            FieldValue::Optional(None) => write!(f, "<none>"),
            FieldValue::List(items) => write!(f, "[{}]", items.join(", ")),
            FieldValue::Enum(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

/// An uncoerced value as produced by a config source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Bool(bool),
    Int(i64),
    List(Vec<String>),
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => write!(f, "{}", s),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Int(i) => write!(f, "{}", i),
            RawValue::List(items) => write!(f, "{}", items.join("+")),
        }
    }
}

/// An optional explicit value shadowing a default.
///
/// `Default` means "evaluate the field's default rule"; `Explicit` wins
/// unconditionally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Override<T> {
    #[default]
    Default,
    Explicit(T),
}

impl<T> Override<T> {
    pub fn is_explicit(&self) -> bool {
        matches!(self, Override::Explicit(_))
    }

    pub fn explicit(&self) -> Option<&T> {
        match self {
            Override::Explicit(value) => Some(value),
            Override::Default => None,
        }
    }

    /// Return the explicit value, or evaluate `default`.
    pub fn get_or_else<F>(&self, default: F) -> T
    where
        T: Clone,
        F: FnOnce() -> T,
    {
        match self {
            Override::Explicit(value) => value.clone(),
            Override::Default => default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LINK: &[&str] = &["Monolithic", "Modular"];

    #[rstest]
    #[case("true", true)]
    #[case("True", true)]
    #[case("1", true)]
    #[case("no", false)]
    #[case(" FALSE ", false)]
    fn bool_coercion_accepts_common_spellings(#[case] text: &str, #[case] expected: bool) {
        let value = FieldType::Bool.coerce("flag", &RawValue::text(text)).unwrap();
        assert_eq!(value, FieldValue::Bool(expected));
    }

    #[test]
    fn bool_coercion_rejects_garbage_with_field_and_raw_value() {
        let err = FieldType::Bool
            .coerce("use_static_crt", &RawValue::text("maybe"))
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidValue {
                field: "use_static_crt".into(),
                expected: "bool".into(),
                raw: "maybe".into(),
            }
        );
    }

    #[test]
    fn enum_coercion_is_case_insensitive_and_canonicalises() {
        let value = FieldType::Enum(LINK)
            .coerce("link_type", &RawValue::text("modular"))
            .unwrap();
        assert_eq!(value, FieldValue::Enum("Modular"));
    }

    #[test]
    fn enum_coercion_rejects_unknown_variant() {
        let err = FieldType::Enum(LINK)
            .coerce("link_type", &RawValue::text("Static"))
            .unwrap_err();
        assert!(err.to_string().contains("one of [Monolithic, Modular]"));
    }

    #[test]
    fn int_coercion_rejects_non_numeric_text() {
        assert!(FieldType::Int.coerce("n", &RawValue::text("12a")).is_err());
        assert_eq!(
            FieldType::Int.coerce("n", &RawValue::text(" 42 ")).unwrap(),
            FieldValue::Int(42)
        );
    }

    #[test]
    fn optional_coercion_treats_empty_text_as_absent() {
        assert_eq!(
            FieldType::Optional.coerce("o", &RawValue::text("")).unwrap(),
            FieldValue::none()
        );
        assert_eq!(
            FieldType::Optional.coerce("o", &RawValue::text("Launch")).unwrap(),
            FieldValue::some("Launch")
        );
    }

    #[test]
    fn list_coercion_wraps_single_text() {
        assert_eq!(
            FieldType::List.coerce("l", &RawValue::text("A")).unwrap(),
            FieldValue::list(["A"])
        );
        assert!(FieldType::Str.coerce("s", &RawValue::List(vec![])).is_err());
    }

    #[test]
    fn accepts_checks_enum_membership() {
        assert!(FieldType::Enum(LINK).accepts(&FieldValue::Enum("Modular")));
        assert!(!FieldType::Enum(LINK).accepts(&FieldValue::Enum("Static")));
        assert!(!FieldType::Bool.accepts(&FieldValue::Int(1)));
    }

    #[test]
    fn list_equality_is_order_sensitive() {
        assert_ne!(FieldValue::list(["A", "B"]), FieldValue::list(["B", "A"]));
    }

    #[test]
    fn override_prefers_explicit_value() {
        let explicit = Override::Explicit(3);
        let default: Override<i32> = Override::Default;
        assert_eq!(explicit.get_or_else(|| 7), 3);
        assert_eq!(default.get_or_else(|| 7), 7);
        assert!(explicit.is_explicit());
        assert_eq!(default.explicit(), None);
    }
}
