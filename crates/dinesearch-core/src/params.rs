//! Request parameters of the faceted search page.
//!
//! Free text and every filter dimension travel as independent
//! `application/x-www-form-urlencoded` parameters: `q`, `cuisine`, `country`,
//! `rating` and the page number `p`. A missing parameter means "no filter on
//! that dimension"; blank filter values are treated as missing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::facet::FacetRequest;
use crate::filter::Filter;
use crate::types::{KeywordField, NumericField};

pub const TEXT_PARAM: &str = "q";
pub const PAGE_PARAM: &str = "p";

/// Bucket width of the rating histogram.
pub const RATING_INTERVAL: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Cuisine,
    Country,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Term,
    Bucket,
}

impl Dimension {
    /// Every dimension, in the order groups and parameters are emitted.
    pub const ALL: [Dimension; 3] = [Dimension::Cuisine, Dimension::Country, Dimension::Rating];

    pub fn param(self) -> &'static str {
        match self {
            Dimension::Cuisine => "cuisine",
            Dimension::Country => "country",
            Dimension::Rating => "rating",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Cuisine => "Cuisines",
            Dimension::Country => "Countries",
            Dimension::Rating => "Guide Michelin Rating",
        }
    }

    pub fn value_kind(self) -> ValueKind {
        match self {
            Dimension::Cuisine | Dimension::Country => ValueKind::Term,
            Dimension::Rating => ValueKind::Bucket,
        }
    }

    /// Facet request backing this dimension's link group.
    pub fn facet(self, terms_size: usize) -> Result<FacetRequest> {
        match self {
            Dimension::Cuisine => FacetRequest::terms(KeywordField::Cuisine, terms_size),
            Dimension::Country => FacetRequest::terms(KeywordField::Country, terms_size),
            Dimension::Rating => FacetRequest::histogram(NumericField::MichelinRating, RATING_INTERVAL),
        }
    }

    pub fn facet_name(self) -> &'static str {
        match self {
            Dimension::Cuisine => KeywordField::Cuisine.name(),
            Dimension::Country => KeywordField::Country.name(),
            Dimension::Rating => NumericField::MichelinRating.name(),
        }
    }

    /// Filter applied when this dimension is active with `value`.
    pub fn filter(self, value: &FilterValue) -> Result<Filter> {
        match (self, value) {
            (Dimension::Cuisine, FilterValue::Term(term)) => Ok(Filter::case_insensitive(KeywordField::Cuisine, term.clone())),
            (Dimension::Country, FilterValue::Term(term)) => Ok(Filter::case_insensitive(KeywordField::Country, term.clone())),
            (Dimension::Rating, FilterValue::Bucket(key)) => Ok(Filter::equals(NumericField::MichelinRating, *key)),
            (dimension, value) => Err(Error::invalid(format!("'{}' is not a valid {} value", value, dimension.param()))),
        }
    }

    fn parse_value(self, raw: &str) -> Result<Option<FilterValue>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match self.value_kind() {
            ValueKind::Term => Ok(Some(FilterValue::Term(raw.to_string()))),
            ValueKind::Bucket => raw
                .parse::<i64>()
                .map(|key| Some(FilterValue::Bucket(key)))
                .map_err(|e| Error::invalid(format!("{} must be an integer, got '{}': {}", self.param(), raw, e))),
        }
    }

    fn from_param(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.param() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Term(String),
    Bucket(i64),
}

impl FilterValue {
    fn kind(&self) -> ValueKind {
        match self {
            FilterValue::Term(_) => ValueKind::Term,
            FilterValue::Bucket(_) => ValueKind::Bucket,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Term(term) => f.write_str(term),
            FilterValue::Bucket(key) => write!(f, "{}", key),
        }
    }
}

/// Parsed state of one search page request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// `None` when no search has been submitted yet.
    pub text: Option<String>,
    active: BTreeMap<Dimension, FilterValue>,
    pub page: Option<usize>,
}

impl SearchParams {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), ..Self::default() }
    }

    /// Parses a query string, with or without a leading `?`.
    pub fn from_query_string(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Builds params from decoded name/value pairs. The first occurrence of a
    /// parameter wins; unknown parameters are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();
        let mut seen_page = false;
        for (name, value) in pairs {
            let (name, value) = (name.as_ref(), value.as_ref());
            if name == TEXT_PARAM {
                if params.text.is_none() {
                    params.text = Some(value.to_string());
                }
            } else if name == PAGE_PARAM {
                if !seen_page {
                    seen_page = true;
                    params.page = parse_page(value)?;
                }
            } else if let Some(dimension) = Dimension::from_param(name) {
                if params.active.contains_key(&dimension) {
                    continue;
                }
                if let Some(parsed) = dimension.parse_value(value)? {
                    params.active.insert(dimension, parsed);
                }
            }
        }
        Ok(params)
    }

    pub fn value(&self, dimension: Dimension) -> Option<&FilterValue> {
        self.active.get(&dimension)
    }

    /// Active filter values, in dimension order.
    pub fn active(&self) -> impl Iterator<Item = (Dimension, &FilterValue)> {
        self.active.iter().map(|(d, v)| (*d, v))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Same state with `dimension` set to `value`, starting over at the first page.
    pub fn with_value(&self, dimension: Dimension, value: FilterValue) -> Result<Self> {
        if value.kind() != dimension.value_kind() {
            return Err(Error::invalid(format!("'{}' is not a valid {} value", value, dimension.param())));
        }
        let mut next = self.clone();
        next.active.insert(dimension, value);
        next.page = None;
        Ok(next)
    }

    /// Same state with the filter on `dimension` cleared, starting over at the first page.
    #[must_use]
    pub fn without(&self, dimension: Dimension) -> Self {
        let mut next = self.clone();
        next.active.remove(&dimension);
        next.page = None;
        next
    }

    #[must_use]
    pub fn with_page(&self, page: usize) -> Self {
        Self { page: Some(page), ..self.clone() }
    }

    /// Filters for every active dimension, each exactly once.
    pub fn filters(&self) -> Result<Vec<Filter>> {
        Dimension::ALL.into_iter().filter_map(|d| self.value(d).map(|v| d.filter(v))).collect()
    }

    /// Encodes the state; cleared parameters are omitted, never sent empty.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if let Some(text) = &self.text {
            serializer.append_pair(TEXT_PARAM, text);
        }
        for (dimension, value) in self.active() {
            serializer.append_pair(dimension.param(), &value.to_string());
        }
        if let Some(page) = self.page {
            serializer.append_pair(PAGE_PARAM, &page.to_string());
        }
        serializer.finish()
    }

    /// Link target for this state under `base_path`.
    pub fn target(&self, base_path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            base_path.to_string()
        } else {
            format!("{}?{}", base_path, query)
        }
    }
}

fn parse_page(raw: &str) -> Result<Option<usize>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let page = raw.parse::<usize>().map_err(|e| Error::invalid(format!("page must be a positive integer, got '{}': {}", raw, e)))?;
    if page < 1 {
        return Err(Error::invalid("page must be at least 1"));
    }
    Ok(Some(page))
}
