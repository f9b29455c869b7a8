//! Equality filter sets validated against a per-entity allowlist.

use std::collections::BTreeMap;

use super::QueryError;
use super::value::{FieldKind, Value};

/// One filterable field: its column name and declared kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name, also the query-string key.
    pub name: &'static str,
    /// Kind used to parse raw values.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Declares a field.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    /// Looks a field up by name.
    #[must_use]
    pub fn find<'a>(fields: &'a [Self], name: &str) -> Option<&'a Self> {
        fields.iter().find(|f| f.name == name)
    }
}

/// Field → required value. Every pair must hold for a row to match.
///
/// Keys are the static names from the allowlist, so a set built through
/// [`FilterSet::parse`] never carries a caller-supplied identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    entries: BTreeMap<&'static str, Value>,
}

impl FilterSet {
    /// An empty set, matching every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets the required value for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: &'static str, value: impl Into<Value>) {
        self.entries.insert(field, value.into());
    }

    /// Required value for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries.get(field)
    }

    /// Iterates pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is filtered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses raw query pairs against an allowlist.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownField`] for a key outside `fields` and
    /// [`QueryError::InvalidFilterValue`] for a value that does not parse
    /// as the field's kind.
    pub fn parse<I>(fields: &[FieldSpec], pairs: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut set = Self::new();
        for (key, raw) in pairs {
            let spec = FieldSpec::find(fields, &key).ok_or(QueryError::UnknownField(key))?;
            let value = spec
                .kind
                .parse(&raw)
                .ok_or_else(|| QueryError::InvalidFilterValue {
                    field: spec.name.to_string(),
                    value: raw.clone(),
                })?;
            set.entries.insert(spec.name, value);
        }
        Ok(set)
    }
}
