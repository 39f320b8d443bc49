//! Read access to a configuration's current field values
//!
//! Computed default rules only see configurations through this trait, which
//! keeps the registry independent of how values are stored.

use crate::error::{Error, Result};
use crate::host::HostContext;
use crate::identity::TargetIdentity;
use crate::kinds::{LinkType, TargetType, parse_field};
use crate::registry::GroupId;
use crate::value::FieldValue;

pub trait FieldLookup {
    fn identity(&self) -> &TargetIdentity;

    fn host(&self) -> &HostContext;

    /// Current value of `field` in `group`, evaluating defaults as needed.
    fn lookup(&self, group: GroupId, field: &str) -> Result<FieldValue>;

    fn root(&self, field: &str) -> Result<FieldValue> {
        self.lookup(GroupId::Target, field)
    }

    fn root_bool(&self, field: &str) -> Result<bool> {
        let value = self.root(field)?;
        value.as_bool().ok_or_else(|| mismatch(field, "bool", &value))
    }

    fn root_list(&self, field: &str) -> Result<Vec<String>> {
        match self.root(field)? {
            FieldValue::List(items) => Ok(items),
            other => Err(mismatch(field, "list", &other)),
        }
    }

    fn target_type(&self) -> Result<TargetType> {
        parse_field("target_type", &self.root("target_type")?)
    }

    fn link_type(&self) -> Result<LinkType> {
        parse_field("link_type", &self.root("link_type")?)
    }
}

fn mismatch(field: &str, expected: &str, value: &FieldValue) -> Error {
    Error::TypeMismatch {
        field: field.to_string(),
        expected: expected.to_string(),
        actual: value.kind().to_string(),
    }
}
