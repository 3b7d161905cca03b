//! Drill-down and removal links built from facet results.
//!
//! For every term or bucket a facet returns there is exactly one apply link,
//! and for every active filter exactly one removal link. A link target only
//! ever changes the dimension it concerns; the free text and all other
//! active filters are carried over as they are.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::facet::FacetResult;
use crate::params::{Dimension, FilterValue, SearchParams, ValueKind};
use crate::query::SearchResults;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetLink {
    pub text: String,
    pub css_class: Option<String>,
    /// Matches behind the link; 0 for removal links.
    pub count: u64,
    pub url: String,
    /// The link's value is already the active filter on its dimension.
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetGroup {
    pub name: String,
    pub dimension: Dimension,
    pub links: Vec<FacetLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetNavigation {
    pub groups: Vec<FacetGroup>,
    pub removals: Vec<FacetLink>,
}

/// Visual class for a rating bucket, e.g. `stars-2`.
pub fn rating_css_class(key: i64) -> String {
    format!("stars-{}", key)
}

fn label(dimension: Dimension, value: &FilterValue) -> (String, Option<String>) {
    match (dimension.value_kind(), value) {
        (ValueKind::Bucket, FilterValue::Bucket(key)) => (String::new(), Some(rating_css_class(*key))),
        _ => (value.to_string(), None),
    }
}

fn is_active(params: &SearchParams, dimension: Dimension, value: &FilterValue) -> bool {
    match (params.value(dimension), value) {
        (Some(FilterValue::Term(current)), FilterValue::Term(term)) => current.to_lowercase() == term.to_lowercase(),
        (Some(current), value) => current == value,
        (None, _) => false,
    }
}

fn apply_link(params: &SearchParams, dimension: Dimension, value: FilterValue, count: u64, base_path: &str) -> Result<FacetLink> {
    let (text, css_class) = label(dimension, &value);
    let active = is_active(params, dimension, &value);
    let url = params.with_value(dimension, value)?.target(base_path);
    Ok(FacetLink { text, css_class, count, url, active })
}

fn group<H>(results: &SearchResults<H>, params: &SearchParams, dimension: Dimension, base_path: &str) -> Result<FacetGroup> {
    let name = dimension.facet_name();
    let links = match (dimension.value_kind(), results.facet(name)?) {
        (ValueKind::Term, FacetResult::Terms(terms)) => terms
            .terms
            .iter()
            .map(|t| apply_link(params, dimension, FilterValue::Term(t.term.clone()), t.count, base_path))
            .collect::<Result<Vec<_>>>()?,
        (ValueKind::Bucket, FacetResult::Histogram(histogram)) => histogram
            .entries
            .iter()
            .map(|(key, count)| apply_link(params, dimension, FilterValue::Bucket(*key), *count, base_path))
            .collect::<Result<Vec<_>>>()?,
        (_, other) => {
            return Err(Error::InvariantViolated(format!(
                "facet '{}' for {} came back as a {} facet",
                name,
                dimension.param(),
                other.kind()
            )))
        }
    };
    Ok(FacetGroup { name: dimension.title().to_string(), dimension, links })
}

/// Builds one link group per dimension plus one removal link per active filter.
///
/// Fails with `InvariantViolated` when a dimension's facet is missing from
/// `results` or has the wrong kind.
pub fn build_navigation<H>(results: &SearchResults<H>, params: &SearchParams, base_path: &str) -> Result<FacetNavigation> {
    let groups = Dimension::ALL.into_iter().map(|d| group(results, params, d, base_path)).collect::<Result<Vec<_>>>()?;
    let removals = params
        .active()
        .map(|(dimension, value)| {
            let (text, css_class) = label(dimension, value);
            FacetLink { text, css_class, count: 0, url: params.without(dimension).target(base_path), active: true }
        })
        .collect();
    Ok(FacetNavigation { groups, removals })
}
