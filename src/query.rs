//! List query builder for collection reads
//!
//! Builds the `limit`/`offset`/`q` query string accepted by
//! `GET /api/db/{collection}`.

use std::fmt;

/// Query parameters for listing documents in a collection
///
/// Parameters left unset are omitted from the query string entirely.
///
/// # Example
/// ```
/// use peoplechain::ListQuery;
///
/// let qs = ListQuery::new().limit(10).q("filter").to_query_string();
/// assert_eq!(qs, "limit=10&q=filter");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    limit_value: Option<usize>,
    offset_value: Option<usize>,
    q_value: Option<String>,
}

impl ListQuery {
    /// Create an empty query (no filtering, no bounds)
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of results
    pub fn limit(mut self, n: usize) -> Self {
        self.limit_value = Some(n);
        self
    }

    /// Skip results (offset)
    pub fn offset(mut self, n: usize) -> Self {
        self.offset_value = Some(n);
        self
    }

    /// Free-text filter matched server-side against document content
    pub fn q(mut self, text: impl Into<String>) -> Self {
        self.q_value = Some(text.into());
        self
    }

    /// Compile to a URL-escaped query string; empty when nothing is set
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();

        if let Some(limit) = self.limit_value {
            pairs.push(format!("limit={}", limit));
        }

        if let Some(offset) = self.offset_value {
            pairs.push(format!("offset={}", offset));
        }

        if let Some(ref q) = self.q_value {
            pairs.push(format!("q={}", urlencoding::encode(q)));
        }

        pairs.join("&")
    }
}

impl fmt::Display for ListQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}
