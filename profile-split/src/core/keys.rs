//! Key extraction and qualified-key splitting for permission entries.

use serde_json::Value;

use crate::core::category::Category;
use crate::core::error::{DecomposeError, Result};
use crate::profile::Entry;

/// Separator between object and leaf in `Object.Field` / `Object.RecordType`.
pub const QUALIFIED_SEPARATOR: char = '.';
/// Separator between object and layout name in `Object-Layout`.
pub const LAYOUT_SEPARATOR: char = '-';

/// Position of an entry within the profile, used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef {
    pub category: Category,
    pub index: usize,
}

impl EntryRef {
    pub fn new(category: Category, index: usize) -> Self {
        Self { category, index }
    }

    fn malformed(self, key: &str, reason: impl Into<String>) -> DecomposeError {
        DecomposeError::MalformedKey {
            category: self.category,
            index: self.index,
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Read a required, non-empty string field.
pub fn required_str<'a>(entry: &'a Entry, at: EntryRef, field: &'static str) -> Result<&'a str> {
    match entry.get(field) {
        Some(Value::String(value)) if !value.is_empty() => Ok(value.as_str()),
        _ => Err(DecomposeError::MissingKey {
            category: at.category,
            index: at.index,
            field,
        }),
    }
}

/// Read an optional string field. Absent, `null` and `""` all count as unset.
pub fn optional_str<'a>(entry: &'a Entry, field: &str) -> Option<&'a str> {
    match entry.get(field) {
        Some(Value::String(value)) if !value.is_empty() => Some(value.as_str()),
        _ => None,
    }
}

/// Split `Object.Leaf`: exactly one `.`, both sides non-empty.
pub fn split_qualified(key: &str, at: EntryRef) -> Result<(&str, &str)> {
    let Some((object, leaf)) = key.split_once(QUALIFIED_SEPARATOR) else {
        return Err(at.malformed(key, "expected '<object>.<name>'"));
    };
    if leaf.contains(QUALIFIED_SEPARATOR) {
        return Err(at.malformed(key, "more than one '.' separator"));
    }
    if object.is_empty() || leaf.is_empty() {
        return Err(at.malformed(key, "empty object or name part"));
    }
    Ok((object, leaf))
}

/// Object part of an `Object-Layout` value: the text before the first `-`.
///
/// Layout names themselves may contain `-`, so only the first one counts.
pub fn layout_object(layout: &str, at: EntryRef) -> Result<&str> {
    match layout.split_once(LAYOUT_SEPARATOR) {
        Some((object, name)) if !object.is_empty() && !name.is_empty() => Ok(object),
        _ => Err(at.malformed(layout, "expected '<object>-<layout name>'")),
    }
}

/// Reject values that would not stay a single path component.
pub fn path_segment(value: &str, at: EntryRef) -> Result<&str> {
    let unsafe_segment = value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\')
        || value.contains('\0');
    if unsafe_segment {
        return Err(DecomposeError::UnsafeSegment {
            category: at.category,
            index: at.index,
            segment: value.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at() -> EntryRef {
        EntryRef::new(Category::FieldPermissions, 3)
    }

    #[test]
    fn split_qualified_accepts_namespaced_names() {
        assert_eq!(
            split_qualified("ns__Invoice__c.ns__Total__c", at()).expect("split"),
            ("ns__Invoice__c", "ns__Total__c")
        );
    }

    #[test]
    fn split_qualified_rejects_missing_or_extra_separator() {
        for key in ["AccountName", "Account.Name.Extra", ".Name", "Account."] {
            let err = split_qualified(key, at()).expect_err(key);
            assert!(matches!(err, DecomposeError::MalformedKey { index: 3, .. }));
        }
    }

    #[test]
    fn layout_object_uses_first_dash_only() {
        assert_eq!(
            layout_object("Account-Account Layout - Sales", at()).expect("object"),
            "Account"
        );
        assert!(layout_object("NoDash", at()).is_err());
        assert!(layout_object("-Layout", at()).is_err());
    }

    #[test]
    fn required_str_rejects_empty_and_non_string() {
        let entry = json!({"field": "", "other": 4});
        let entry = entry.as_object().expect("object");
        assert!(required_str(entry, at(), "field").is_err());
        assert!(required_str(entry, at(), "other").is_err());
        assert!(required_str(entry, at(), "absent").is_err());
    }

    #[test]
    fn optional_str_treats_null_as_unset() {
        let entry = json!({"recordType": null});
        assert_eq!(optional_str(entry.as_object().expect("object"), "recordType"), None);
    }

    #[test]
    fn path_segment_rejects_traversal() {
        for value in ["..", ".", "a/b", "a\\b"] {
            assert!(path_segment(value, at()).is_err(), "{value}");
        }
        assert_eq!(path_segment("Lead-Lead Layout", at()).expect("ok"), "Lead-Lead Layout");
    }
}
