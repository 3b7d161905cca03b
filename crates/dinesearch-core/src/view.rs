//! View models handed to the rendering layer.

use serde::Serialize;

use crate::error::Result;
use crate::navigation::{FacetGroup, FacetLink, FacetNavigation};
use crate::pagination::compute_total_pages;
use crate::query::SearchResults;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultView<H> {
    pub results: SearchResults<H>,
    /// Free text exactly as submitted.
    pub query: String,
    pub current_page: usize,
    pub total_pages: u64,
    pub facets: Vec<FacetGroup>,
    /// Links that each clear one active filter.
    pub filters: Vec<FacetLink>,
}

impl<H> SearchResultView<H> {
    pub fn new(results: SearchResults<H>, query: impl Into<String>, current_page: usize, page_size: usize) -> Result<Self> {
        let total_pages = compute_total_pages(results.total_matching, page_size)?;
        Ok(Self { results, query: query.into(), current_page, total_pages, facets: Vec::new(), filters: Vec::new() })
    }

    #[must_use]
    pub fn with_navigation(mut self, navigation: FacetNavigation) -> Self {
        self.facets = navigation.groups;
        self.filters = navigation.removals;
        self
    }
}

/// What a search action renders: a blank form or a result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchPage<H> {
    /// No query text was submitted; the search client was not called.
    Empty,
    Results(SearchResultView<H>),
}

impl<H> SearchPage<H> {
    pub fn view(&self) -> Option<&SearchResultView<H>> {
        match self {
            SearchPage::Empty => None,
            SearchPage::Results(view) => Some(view),
        }
    }
}
