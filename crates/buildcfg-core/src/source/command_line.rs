//! Command-line flag matching
//!
//! Flags take the forms `-Name`, `-Name=Value` and, for list fields,
//! `-Name+Value`. Names match case-insensitively against each field's flag
//! bindings. Tokens that do not start with `-` or match no binding are
//! ignored.

use buildcfg_meta::{FieldDescriptor, FieldType, FlagBinding, GroupSchema, RawValue};

use super::SourceEntry;
use crate::error::{Error, Result};

/// Argument list of one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    args: Vec<String>,
}

/// A flag token split into name and value.
struct Token<'a> {
    name: &'a str,
    value: Option<&'a str>,
}

impl<'a> Token<'a> {
    fn parse(arg: &'a str) -> Option<Self> {
        let body = arg.strip_prefix('-')?;
        if body.is_empty() {
            return None;
        }
        // The first '=' or '+' ends the name
        match body.find(['=', '+']) {
            Some(at) => Some(Token {
                name: &body[..at],
                value: Some(&body[at + 1..]),
            }),
            None => Some(Token {
                name: body,
                value: None,
            }),
        }
    }
}

impl CommandLine {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a whitespace-separated argument string.
    pub fn parse(text: &str) -> Self {
        Self::new(text.split_whitespace())
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Raw values for every field of `group` named by a flag, in field order.
    ///
    /// Scalar fields take the last matching flag; list fields accumulate
    /// every matching flag in argument order.
    pub fn values_for(&self, group: &GroupSchema) -> Result<Vec<SourceEntry>> {
        let tokens: Vec<Token<'_>> = self.args.iter().filter_map(|a| Token::parse(a)).collect();
        let mut entries = Vec::new();

        for field in group.fields().iter().filter(|f| !f.flags.is_empty()) {
            let mut scalar = None;
            let mut list: Option<Vec<String>> = None;

            for token in &tokens {
                let Some(binding) = field
                    .flags
                    .iter()
                    .find(|b| b.flag.eq_ignore_ascii_case(token.name))
                else {
                    continue;
                };

                if field.field_type == FieldType::List {
                    list.get_or_insert_with(Vec::new)
                        .extend(list_items(field, binding, token)?);
                } else {
                    scalar = Some(scalar_value(field, binding, token)?);
                }
            }

            if let Some(items) = list {
                entries.push(SourceEntry {
                    field: field.name,
                    raw: RawValue::List(items),
                });
            } else if let Some(raw) = scalar {
                entries.push(SourceEntry {
                    field: field.name,
                    raw,
                });
            }
        }
        Ok(entries)
    }
}

fn scalar_value(field: &FieldDescriptor, binding: &FlagBinding, token: &Token<'_>) -> Result<RawValue> {
    if let Some(forced) = binding.forced {
        return Ok(RawValue::text(forced));
    }
    match (token.value, field.field_type) {
        (Some(value), _) => Ok(RawValue::text(value)),
        (None, FieldType::Bool) => Ok(RawValue::Bool(true)),
        (None, _) => Err(Error::MissingFlagValue {
            flag: binding.flag.to_string(),
            field: field.name.to_string(),
        }),
    }
}

fn list_items(
    field: &FieldDescriptor,
    binding: &FlagBinding,
    token: &Token<'_>,
) -> Result<Vec<String>> {
    let value = binding
        .forced
        .or(token.value)
        .ok_or_else(|| Error::MissingFlagValue {
            flag: binding.flag.to_string(),
            field: field.name.to_string(),
        })?;
    let items = match binding.list_separator {
        Some(separator) => value
            .split(separator)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        None if value.is_empty() => Vec::new(),
        None => vec![value.to_string()],
    };
    Ok(items)
}
