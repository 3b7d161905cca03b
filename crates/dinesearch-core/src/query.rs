//! Immutable, chainable search queries.
//!
//! A [`Query`] pairs a plain-data [`SearchRequest`] with a projection that
//! turns engine hits into the caller's display type. Every `with_*` method
//! borrows the query and returns a new one, so a query can be shared across
//! threads and refined independently by each request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Error, Result};
use crate::facet::{FacetRequest, FacetResult, HistogramFacetResult, TermsFacetResult, DEFAULT_TERMS_SIZE};
use crate::filter::{Filter, FilterSet};
use crate::pagination::Paging;
use crate::traits::SearchClient;
use crate::types::{KeywordField, Language, NumericField, RawHit, TextField};

pub type Projection<H> = Arc<dyn Fn(&RawHit) -> H + Send + Sync>;

/// How to cut highlighted fragments out of a field.
///
/// `fragment_size: None` highlights the whole field as a single fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpec {
    pub fragment_size: Option<usize>,
    pub number_of_fragments: usize,
}

impl HighlightSpec {
    pub fn whole_field() -> Self {
        Self { fragment_size: None, number_of_fragments: 1 }
    }

    pub fn fragments(fragment_size: usize, number_of_fragments: usize) -> Result<Self> {
        if fragment_size == 0 {
            return Err(Error::invalid("highlight fragment size must be positive"));
        }
        if number_of_fragments == 0 {
            return Err(Error::invalid("highlight must ask for at least one fragment"));
        }
        Ok(Self { fragment_size: Some(fragment_size), number_of_fragments })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRequest {
    pub field: TextField,
    pub spec: HighlightSpec,
}

/// Everything an engine needs to run a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub language: Language,
    /// Free text; `None` matches every document.
    pub text: Option<String>,
    pub filters: FilterSet,
    pub facets: Vec<FacetRequest>,
    pub paging: Paging,
    pub highlights: Vec<HighlightRequest>,
}

impl SearchRequest {
    pub fn new(language: Language) -> Self {
        Self { language, text: None, filters: FilterSet::new(), facets: Vec::new(), paging: Paging::default(), highlights: Vec::new() }
    }

    pub fn highlight_for(&self, field: TextField) -> Option<HighlightSpec> {
        self.highlights.iter().find(|h| h.field == field).map(|h| h.spec)
    }
}

pub struct Query<H> {
    request: SearchRequest,
    projection: Projection<H>,
}

impl<H> Clone for Query<H> {
    fn clone(&self) -> Self {
        Self { request: self.request.clone(), projection: Arc::clone(&self.projection) }
    }
}

impl<H> fmt::Debug for Query<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query").field("request", &self.request).finish_non_exhaustive()
    }
}

impl Query<RawHit> {
    /// Match-all query that yields engine hits unchanged.
    pub fn new(language: Language) -> Self {
        Self { request: SearchRequest::new(language), projection: Arc::new(|hit: &RawHit| hit.clone()) }
    }
}

impl<H> Query<H> {
    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    fn map_request(&self, f: impl FnOnce(&mut SearchRequest)) -> Self {
        let mut request = self.request.clone();
        f(&mut request);
        Self { request, projection: Arc::clone(&self.projection) }
    }

    /// Replaces the free text. A blank term matches all documents.
    #[must_use]
    pub fn with_text(&self, text: &str) -> Self {
        let text = text.trim();
        let text = (!text.is_empty()).then(|| text.to_string());
        self.map_request(|r| r.text = text)
    }

    #[must_use]
    pub fn with_filter(&self, filter: Filter) -> Self {
        self.map_request(|r| r.filters = r.filters.with(filter))
    }

    /// Adds a facet request, replacing an earlier one reported under the same name.
    #[must_use]
    pub fn with_facet(&self, facet: FacetRequest) -> Self {
        self.map_request(|r| match r.facets.iter_mut().find(|f| f.name() == facet.name()) {
            Some(existing) => *existing = facet,
            None => r.facets.push(facet),
        })
    }

    #[must_use]
    pub fn with_terms_facet(&self, field: KeywordField) -> Self {
        self.with_facet(FacetRequest::Terms { field, size: DEFAULT_TERMS_SIZE })
    }

    pub fn with_histogram_facet(&self, field: NumericField, interval: i64) -> Result<Self> {
        Ok(self.with_facet(FacetRequest::histogram(field, interval)?))
    }

    /// Selects the 1-based `page_number` with `page_size` hits per page.
    pub fn with_page(&self, page_number: usize, page_size: usize) -> Result<Self> {
        let paging = Paging::for_page(page_number, page_size)?;
        Ok(self.map_request(|r| r.paging = paging))
    }

    #[must_use]
    pub fn with_highlight(&self, field: TextField, spec: HighlightSpec) -> Self {
        self.map_request(|r| {
            r.highlights.retain(|h| h.field != field);
            r.highlights.push(HighlightRequest { field, spec });
        })
    }

    #[must_use]
    pub fn with_projection<U, F>(&self, projection: F) -> Query<U>
    where
        F: Fn(&RawHit) -> U + Send + Sync + 'static,
    {
        Query { request: self.request.clone(), projection: Arc::new(projection) }
    }

    /// Runs the query once against `client`. Errors from the client are not retried.
    pub fn execute<C>(&self, client: &C) -> Result<SearchResults<H>>
    where
        C: SearchClient + ?Sized,
    {
        let request = &self.request;
        debug!(
            text = ?request.text,
            filters = request.filters.len(),
            facets = request.facets.len(),
            offset = request.paging.offset,
            limit = request.paging.limit,
            "executing search"
        );
        let raw = client.execute(request).map_err(Error::SearchExecutionFailed)?;
        if raw.total_matching < raw.hits.len() as u64 {
            return Err(Error::InvariantViolated(format!(
                "engine reported {} total matches but returned {} hits",
                raw.total_matching,
                raw.hits.len()
            )));
        }
        let hits = raw.hits.iter().map(|hit| (self.projection)(hit)).collect();
        debug!(total = raw.total_matching, "search complete");
        Ok(SearchResults { hits, total_matching: raw.total_matching, facets: raw.facets })
    }
}

/// Projected hits of one page plus match count and facets for the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults<H> {
    pub hits: Vec<H>,
    pub total_matching: u64,
    pub facets: BTreeMap<String, FacetResult>,
}

impl<H> SearchResults<H> {
    pub fn facet(&self, name: &str) -> Result<&FacetResult> {
        self.facets
            .get(name)
            .ok_or_else(|| Error::InvariantViolated(format!("facet '{}' missing from search results", name)))
    }

    pub fn terms_facet(&self, name: &str) -> Result<&TermsFacetResult> {
        match self.facet(name)? {
            FacetResult::Terms(terms) => Ok(terms),
            other => Err(Error::InvariantViolated(format!("facet '{}' is a {} facet, expected terms", name, other.kind()))),
        }
    }

    pub fn histogram_facet(&self, name: &str) -> Result<&HistogramFacetResult> {
        match self.facet(name)? {
            FacetResult::Histogram(histogram) => Ok(histogram),
            other => Err(Error::InvariantViolated(format!("facet '{}' is a {} facet, expected histogram", name, other.kind()))),
        }
    }
}
