//! Free-text search terms.

use super::QueryError;

/// A validated, non-empty search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Trims `raw` and rejects it if nothing is left.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptySearch`] for empty or whitespace input.
    pub fn new(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::EmptySearch);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The trimmed text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ILIKE` pattern matching the term anywhere, with `\`, `%` and `_`
    /// escaped so they match literally.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for c in self.0.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }

    /// Case-insensitive containment, the in-process equivalent of
    /// [`like_pattern`](Self::like_pattern).
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }
}
