//! Field exposure policy.
//!
//! Fields whose names start with `_` or `internal_` carry persistence
//! metadata, not data, and are never exposed. A record may instead supply a
//! curated override list, which is taken as-is.

use crate::entity::Record;
use crate::field::Field;

/// Name prefixes that mark a field as metadata.
pub const EXCLUDED_PREFIXES: [&str; 2] = ["internal_", "_"];

/// Check whether a field name is exposed under the prefix rule.
pub fn is_exposed(name: &str) -> bool {
    !EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Where an introspection pass takes its fields from.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSource {
    /// The record's full declared field list; the prefix rule applies.
    Declared(Vec<Field>),
    /// A curated override list; every entry is exposed, in the given order.
    Override(Vec<Field>),
}

impl FieldSource {
    /// Select the source for a record: the override if it declares one,
    /// otherwise its declared fields.
    pub fn of<R: Record + ?Sized>(record: &R) -> Self {
        match record.exposed_override() {
            Some(fields) => FieldSource::Override(fields),
            None => FieldSource::Declared(record.declared_fields()),
        }
    }

    /// Check whether `name` is exposed within this source.
    pub fn exposes(&self, name: &str) -> bool {
        match self {
            FieldSource::Declared(_) => is_exposed(name),
            FieldSource::Override(_) => true,
        }
    }

    /// Whether this source is an override list.
    pub const fn is_override(&self) -> bool {
        matches!(self, FieldSource::Override(_))
    }

    /// The source's fields, in order.
    pub fn fields(&self) -> &[Field] {
        match self {
            FieldSource::Declared(fields) | FieldSource::Override(fields) => fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_rule() {
        assert!(is_exposed("id"));
        assert!(is_exposed("name"));
        assert!(is_exposed("internalish"));
        assert!(is_exposed("my_internal_"));
        assert!(!is_exposed("_secret"));
        assert!(!is_exposed("__hidden"));
        assert!(!is_exposed("internal_version"));
        assert!(!is_exposed("_"));
    }

    #[test]
    fn test_override_exposes_everything() {
        let source = FieldSource::Override(vec![Field::new("_kept", 1_i64)]);
        assert!(source.exposes("_kept"));
        assert!(source.exposes("internal_x"));
        assert!(source.is_override());

        let source = FieldSource::Declared(Vec::new());
        assert!(!source.exposes("_kept"));
        assert!(source.exposes("kept"));
    }
}
