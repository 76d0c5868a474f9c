//! Backend-neutral find-query construction.
//!
//! A [`FindQuery`] describes a filter, a projection and a row limit. The
//! MongoDB store translates it to BSON; the in-memory store evaluates it
//! directly with [`FindQuery::matches`] and [`FindQuery::project`]. Builder
//! methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use toys_kingdom::QueryBuilder;
//! let query = QueryBuilder::new()
//!     .where_contains("toy_name", "robo")
//!     .select(&["toy_name", "price"])
//!     .limit(20)
//!     .build();
//! assert_eq!(query.limit, Some(20));
//! ```

use serde_json::Value;

use crate::models::ToyDocument;

/// A single filter predicate over a toy document.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `field == value`. A `null` value also matches a missing field.
    Eq { field: String, value: Value },
    /// Case-insensitive literal substring match on a string field.
    Contains { field: String, text: String },
    Or(Vec<Filter>),
    And(Vec<Filter>),
}

impl Filter {
    /// Evaluate the predicate against a document.
    pub fn matches(&self, doc: &ToyDocument) -> bool {
        match self {
            Filter::Eq { field, value } => match doc.get(field) {
                Some(found) => found == value,
                None => value.is_null(),
            },
            Filter::Contains { field, text } => doc
                .get(field)
                .and_then(|v| v.as_str())
                .map(|s| s.to_lowercase().contains(&text.to_lowercase()))
                .unwrap_or(false),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
            Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
        }
    }
}

/// A built find request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    /// `None` matches every document.
    pub filter: Option<Filter>,
    /// Included fields. `_id` is always returned, as MongoDB does by default.
    pub projection: Option<Vec<String>>,
    pub limit: Option<usize>,
}

impl FindQuery {
    pub fn matches(&self, doc: &ToyDocument) -> bool {
        self.filter.as_ref().map(|f| f.matches(doc)).unwrap_or(true)
    }

    /// Apply the projection to a document.
    pub fn project(&self, doc: &ToyDocument) -> ToyDocument {
        let Some(fields) = &self.projection else {
            return doc.clone();
        };
        doc.iter()
            .filter(|(key, _)| key.as_str() == "_id" || fields.iter().any(|f| f == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Builds [`FindQuery`] values.
///
/// Multiple `where_*` calls are AND-combined.
#[derive(Debug, Default)]
pub struct QueryBuilder {
    filters: Vec<Filter>,
    projection: Option<Vec<String>>,
    limit_val: Option<usize>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict returned fields (replaces any earlier selection).
    pub fn select(&mut self, fields: &[&str]) -> &mut Self {
        self.projection = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Add an equality condition.
    pub fn where_eq(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.filters.push(Filter::Eq {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Add a case-insensitive substring condition.
    ///
    /// `text` is matched literally; regex metacharacters carry no meaning.
    pub fn where_contains(&mut self, field: &str, text: &str) -> &mut Self {
        self.filters.push(Filter::Contains {
            field: field.to_string(),
            text: text.to_string(),
        });
        self
    }

    /// Add OR-combined conditions. An empty list is a no-op.
    pub fn where_or(&mut self, filters: Vec<Filter>) -> &mut Self {
        if !filters.is_empty() {
            self.filters.push(Filter::Or(filters));
        }
        self
    }

    /// Set the maximum number of documents to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    pub fn build(&self) -> FindQuery {
        let filter = match self.filters.len() {
            0 => None,
            1 => Some(self.filters[0].clone()),
            _ => Some(Filter::And(self.filters.clone())),
        };
        FindQuery {
            filter,
            projection: self.projection.clone(),
            limit: self.limit_val,
        }
    }
}
