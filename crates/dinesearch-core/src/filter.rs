//! Filter predicates applied before facet aggregation.
//!
//! Filters are conjunctive: a document matches a query only when it matches
//! every filter. Two filters on the same field are legal and both apply.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{KeywordField, NumericField};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Byte-for-byte match on a keyword field.
    Exact { field: KeywordField, value: String },
    /// Match on a keyword field ignoring letter case.
    CaseInsensitive { field: KeywordField, value: String },
    /// Numeric equality.
    Equals { field: NumericField, value: i64 },
    /// Numeric half-open range `[from, to)`. A missing bound is unbounded.
    Range { field: NumericField, from: Option<i64>, to: Option<i64> },
}

impl Filter {
    pub fn exact(field: KeywordField, value: impl Into<String>) -> Self {
        Self::Exact { field, value: value.into() }
    }

    pub fn case_insensitive(field: KeywordField, value: impl Into<String>) -> Self {
        Self::CaseInsensitive { field, value: value.into() }
    }

    pub fn equals(field: NumericField, value: i64) -> Self {
        Self::Equals { field, value }
    }

    pub fn range(field: NumericField, from: Option<i64>, to: Option<i64>) -> Result<Self> {
        match (from, to) {
            (None, None) => Err(Error::invalid(format!("range filter on {} has no bounds", field))),
            (Some(lo), Some(hi)) if lo >= hi => {
                Err(Error::invalid(format!("range filter on {} is empty: [{}, {})", field, lo, hi)))
            }
            _ => Ok(Self::Range { field, from, to }),
        }
    }
}

/// An ordered, conjunctive list of filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet(Vec<Filter>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new set with `filter` appended.
    #[must_use]
    pub fn with(&self, filter: Filter) -> Self {
        let mut filters = self.0.clone();
        filters.push(filter);
        Self(filters)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
