//! Pagination, filtering and free-text search shared by every list endpoint.
//!
//! The pieces here are storage-agnostic: a [`ListQuery`] is parsed from the
//! raw query string, validated against an entity's field allowlist, and
//! turned into [`Criteria`] plus a normalised [`PageRequest`]. Stores only
//! ever see validated input.

pub mod filter;
pub mod page;
pub mod search;
pub mod value;

use std::collections::BTreeMap;

pub use filter::{FieldSpec, FilterSet};
pub use page::{Page, PageBounds, PageRequest};
pub use search::SearchTerm;
pub use value::{FieldKind, Value};

/// Errors raised while validating list input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Filter key is not in the entity allowlist.
    #[error("unknown filter field: {0}")]
    UnknownField(String),

    /// Filter value does not parse as the field's declared kind.
    #[error("invalid value {value:?} for field {field}")]
    InvalidFilterValue {
        /// Field name.
        field: String,
        /// Raw value as received.
        value: String,
    },

    /// `page` or `page_size` is not an integer.
    #[error("invalid {param}: {value:?}")]
    InvalidPagination {
        /// Parameter name.
        param: &'static str,
        /// Raw value as received.
        value: String,
    },

    /// A reserved parameter was sent under both of its names.
    #[error("{name} and {alias} are the same parameter; send only one")]
    DuplicateParam {
        /// Canonical name.
        name: &'static str,
        /// Alias.
        alias: &'static str,
    },

    /// Search text is empty or whitespace only.
    #[error("search query must not be empty")]
    EmptySearch,

    /// The entity declares no searchable fields.
    #[error("search is not supported for {0}")]
    SearchUnsupported(&'static str),

    /// Page bounds are unusable.
    #[error("invalid page bounds: default {default}, max {max}")]
    InvalidBounds {
        /// Requested default page size.
        default: i64,
        /// Requested maximum page size.
        max: i64,
    },
}

/// What a store matches on: ANDed equality filters plus an optional search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    /// Equality filters.
    pub filters: FilterSet,
    /// Case-insensitive substring search over the entity's search fields.
    pub search: Option<SearchTerm>,
}

impl Criteria {
    /// Criteria with filters only.
    #[must_use]
    pub fn filtered(filters: FilterSet) -> Self {
        Self {
            filters,
            search: None,
        }
    }

    /// Adds a search term.
    #[must_use]
    pub fn with_search(mut self, search: SearchTerm) -> Self {
        self.search = Some(search);
        self
    }
}

/// A parsed but not yet normalised list request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Validated equality filters.
    pub filters: FilterSet,
    /// Raw search text, if a `query`/`q` key was present.
    pub search: Option<String>,
    /// Raw page number.
    pub page: Option<i64>,
    /// Raw page size.
    pub page_size: Option<i64>,
}

impl ListQuery {
    /// Parses a query-string map.
    ///
    /// `page`, `page_size` (alias `size`) and `query` (alias `q`) are
    /// reserved. Every other key is a filter and must appear in `fields`.
    /// An empty `page` or `page_size` counts as missing.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidPagination`] for a non-numeric page
    /// parameter, [`QueryError::DuplicateParam`] when a parameter is sent
    /// under both its name and its alias, and the errors of
    /// [`FilterSet::parse`] for filters.
    pub fn from_params(
        fields: &[FieldSpec],
        params: BTreeMap<String, String>,
    ) -> Result<Self, QueryError> {
        for (name, alias) in [("page_size", "size"), ("query", "q")] {
            if params.contains_key(name) && params.contains_key(alias) {
                return Err(QueryError::DuplicateParam { name, alias });
            }
        }

        let mut page = None;
        let mut page_size = None;
        let mut search = None;
        let mut filters = Vec::new();

        for (key, value) in params {
            match key.as_str() {
                "page" => page = parse_page_param("page", &value)?,
                "page_size" | "size" => page_size = parse_page_param("page_size", &value)?,
                "query" | "q" => search = Some(value),
                _ => filters.push((key, value)),
            }
        }

        Ok(Self {
            filters: FilterSet::parse(fields, filters)?,
            search,
            page,
            page_size,
        })
    }

    /// Builds store criteria, validating the search text when present.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptySearch`] for blank search text.
    pub fn criteria(&self) -> Result<Criteria, QueryError> {
        let search = self.search.as_deref().map(SearchTerm::new).transpose()?;
        Ok(Criteria {
            filters: self.filters.clone(),
            search,
        })
    }

    /// Normalises the paging input against `bounds`.
    #[must_use]
    pub fn page_request(&self, bounds: &PageBounds) -> PageRequest {
        bounds.normalize(self.page, self.page_size)
    }
}

fn parse_page_param(param: &'static str, raw: &str) -> Result<Option<i64>, QueryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| QueryError::InvalidPagination {
            param,
            value: raw.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::new("user_id", FieldKind::Uuid),
        FieldSpec::new("meal_type", FieldKind::Text),
    ];

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn reserved_keys_are_not_filters() {
        let Ok(query) = ListQuery::from_params(
            FIELDS,
            params(&[("page", "2"), ("size", "5"), ("q", "oat"), ("meal_type", "lunch")]),
        ) else {
            panic!("query should parse");
        };
        assert_eq!(query.page, Some(2));
        assert_eq!(query.page_size, Some(5));
        assert_eq!(query.search.as_deref(), Some("oat"));
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters.get("meal_type"), Some(&Value::from("lunch")));
    }

    #[test]
    fn empty_page_counts_as_missing() {
        let Ok(query) = ListQuery::from_params(FIELDS, params(&[("page", ""), ("page_size", " ")]))
        else {
            panic!("query should parse");
        };
        assert_eq!(query.page, None);
        assert_eq!(query.page_size, None);
        let req = query.page_request(&PageBounds::STANDARD);
        assert_eq!((req.page(), req.page_size()), (1, 10));
    }

    #[test]
    fn non_numeric_page_is_rejected() {
        let result = ListQuery::from_params(FIELDS, params(&[("page_size", "ten")]));
        assert!(matches!(
            result,
            Err(QueryError::InvalidPagination { param: "page_size", .. })
        ));
    }

    #[test]
    fn name_and_alias_together_are_rejected() {
        let result = ListQuery::from_params(FIELDS, params(&[("page_size", "5"), ("size", "50")]));
        assert_eq!(
            result,
            Err(QueryError::DuplicateParam {
                name: "page_size",
                alias: "size"
            })
        );
        let result = ListQuery::from_params(FIELDS, params(&[("query", "oat"), ("q", "rice")]));
        assert!(matches!(result, Err(QueryError::DuplicateParam { name: "query", .. })));
    }

    #[test]
    fn unknown_filter_is_rejected() {
        let result = ListQuery::from_params(FIELDS, params(&[("password_hash", "x")]));
        assert_eq!(
            result,
            Err(QueryError::UnknownField("password_hash".to_string()))
        );
    }

    #[test]
    fn blank_search_is_rejected_by_criteria() {
        let Ok(query) = ListQuery::from_params(FIELDS, params(&[("query", "   ")])) else {
            panic!("query should parse");
        };
        assert_eq!(query.criteria(), Err(QueryError::EmptySearch));
    }
}
