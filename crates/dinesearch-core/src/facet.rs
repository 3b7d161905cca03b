//! Facet requests and the facet results engines hand back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::types::{KeywordField, NumericField};

/// Default number of distinct terms a terms facet reports.
pub const DEFAULT_TERMS_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacetRequest {
    Terms { field: KeywordField, size: usize },
    Histogram { field: NumericField, interval: i64 },
}

impl FacetRequest {
    pub fn terms(field: KeywordField, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid(format!("terms facet on {} must report at least one term", field)));
        }
        Ok(Self::Terms { field, size })
    }

    pub fn histogram(field: NumericField, interval: i64) -> Result<Self> {
        if interval <= 0 {
            return Err(Error::invalid(format!(
                "histogram facet on {} needs a positive bucket interval, got {}",
                field, interval
            )));
        }
        Ok(Self::Histogram { field, interval })
    }

    /// Key under which the result of this request is reported.
    pub fn name(&self) -> &'static str {
        match self {
            FacetRequest::Terms { field, .. } => field.name(),
            FacetRequest::Histogram { field, .. } => field.name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

/// Distinct values with counts, most frequent first, ties by term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsFacetResult {
    pub terms: Vec<TermCount>,
}

impl TermsFacetResult {
    /// Orders `counts` and keeps the `size` most frequent terms.
    pub fn top(counts: impl IntoIterator<Item = (String, u64)>, size: usize) -> Self {
        let mut terms: Vec<TermCount> = counts.into_iter().filter(|(_, count)| *count > 0).map(|(term, count)| TermCount { term, count }).collect();
        terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
        terms.truncate(size);
        Self { terms }
    }
}

/// Counts keyed by bucket start. Only non-empty buckets are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramFacetResult {
    pub entries: BTreeMap<i64, u64>,
}

impl HistogramFacetResult {
    /// Groups raw values into buckets of `interval` width.
    ///
    /// Fails on a non-positive interval.
    pub fn from_values(values: impl IntoIterator<Item = i64>, interval: i64) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for value in values {
            *entries.entry(bucket_key(value, interval)?).or_insert(0) += 1;
        }
        Ok(Self { entries })
    }
}

/// Start of the bucket `value` falls into. Floors toward negative infinity.
pub fn bucket_key(value: i64, interval: i64) -> Result<i64> {
    if interval <= 0 {
        return Err(Error::invalid(format!("bucket interval must be positive, got {}", interval)));
    }
    Ok(value.div_euclid(interval) * interval)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacetResult {
    Terms(TermsFacetResult),
    Histogram(HistogramFacetResult),
}

impl FacetResult {
    pub fn kind(&self) -> &'static str {
        match self {
            FacetResult::Terms(_) => "terms",
            FacetResult::Histogram(_) => "histogram",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_of_ratings() {
        let result = HistogramFacetResult::from_values([1, 1, 2, 3, 3, 3], 1).expect("histogram");
        let expected: BTreeMap<i64, u64> = [(1, 2), (2, 1), (3, 3)].into_iter().collect();
        assert_eq!(result.entries, expected);
    }

    #[test]
    fn wider_buckets_floor_to_bucket_start() {
        let result = HistogramFacetResult::from_values([0, 4, 5, 9, 10, -1], 5).expect("histogram");
        let expected: BTreeMap<i64, u64> = [(-5, 1), (0, 2), (5, 2), (10, 1)].into_iter().collect();
        assert_eq!(result.entries, expected);
    }

    #[test]
    fn non_positive_interval_is_rejected() {
        assert!(matches!(FacetRequest::histogram(NumericField::MichelinRating, 0), Err(Error::InvalidArgument(_))));
        assert!(matches!(FacetRequest::histogram(NumericField::MichelinRating, -2), Err(Error::InvalidArgument(_))));
        assert!(HistogramFacetResult::from_values([1], 0).is_err());
    }

    #[test]
    fn top_terms_sorted_and_truncated() {
        let counts = vec![("Italian".to_string(), 3), ("French".to_string(), 12), ("Thai".to_string(), 3), ("Nordic".to_string(), 1)];
        let result = TermsFacetResult::top(counts, 3);
        let terms: Vec<_> = result.terms.iter().map(|t| (t.term.as_str(), t.count)).collect();
        assert_eq!(terms, vec![("French", 12), ("Italian", 3), ("Thai", 3)]);
    }
}
