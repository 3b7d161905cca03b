//! Request orchestration for the search pages.
//!
//! Each action turns request parameters into one query, runs it once and
//! assembles a [`SearchPage`]. Without free text an action renders the blank
//! form and never touches the search client.

use tracing::{debug, info};

use crate::config::SearchSettings;
use crate::error::Result;
use crate::navigation::build_navigation;
use crate::params::{Dimension, SearchParams};
use crate::projection::{project_hit, ProjectionOptions, SearchHit};
use crate::query::{HighlightSpec, Query};
use crate::traits::SearchClient;
use crate::types::{Language, RawHit, TextField};
use crate::view::{SearchPage, SearchResultView};

/// Which search page is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Basic,
    Paging,
    Highlighting,
    Facets,
}

pub struct SearchController<C> {
    client: C,
    language: Language,
    settings: SearchSettings,
}

impl<C: SearchClient> SearchController<C> {
    pub fn new(client: C, language: Language, settings: SearchSettings) -> Self {
        Self { client, language, settings }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn handle(&self, mode: SearchMode, params: &SearchParams) -> Result<SearchPage<SearchHit>> {
        match mode {
            SearchMode::Basic => self.basic(params),
            SearchMode::Paging => self.paging(params),
            SearchMode::Highlighting => self.highlighting(params),
            SearchMode::Facets => self.facets(params),
        }
    }

    /// Plain text search, first window of hits.
    pub fn basic(&self, params: &SearchParams) -> Result<SearchPage<SearchHit>> {
        let Some(text) = params.text.as_deref() else { return Ok(SearchPage::Empty) };
        let query = self.base_query(text).with_projection(|hit| project_hit(hit, ProjectionOptions::default()));
        self.run(&query, text, 1).map(SearchPage::Results)
    }

    /// Text search over numbered pages of `page_size` hits.
    pub fn paging(&self, params: &SearchParams) -> Result<SearchPage<SearchHit>> {
        let Some(text) = params.text.as_deref() else { return Ok(SearchPage::Empty) };
        let page = params.page.unwrap_or(1);
        let query = self
            .base_query(text)
            .with_page(page, self.settings.page_size)?
            .with_projection(|hit| project_hit(hit, ProjectionOptions::default()));
        self.run(&query, text, page).map(SearchPage::Results)
    }

    /// Text search with a highlighted title and a Wikipedia excerpt per hit.
    pub fn highlighting(&self, params: &SearchParams) -> Result<SearchPage<SearchHit>> {
        let Some(text) = params.text.as_deref() else { return Ok(SearchPage::Empty) };
        let excerpt = HighlightSpec::fragments(self.settings.excerpt_fragment_size, self.settings.excerpt_fragments)?;
        let query = self
            .base_query(text)
            .with_highlight(TextField::Name, HighlightSpec::whole_field())
            .with_highlight(TextField::WikipediaText, excerpt)
            .with_projection(|hit| project_hit(hit, ProjectionOptions { with_excerpt: true }));
        self.run(&query, text, 1).map(SearchPage::Results)
    }

    /// Text search narrowed by the active facet filters, with drill-down links.
    pub fn facets(&self, params: &SearchParams) -> Result<SearchPage<SearchHit>> {
        let Some(text) = params.text.as_deref() else { return Ok(SearchPage::Empty) };
        let page = params.page.unwrap_or(1);
        let mut query = self.base_query(text).with_highlight(TextField::Name, HighlightSpec::whole_field());
        for dimension in Dimension::ALL {
            query = query.with_facet(dimension.facet(self.settings.facet_size)?);
        }
        for filter in params.filters()? {
            query = query.with_filter(filter);
        }
        let query = query
            .with_page(page, self.settings.page_size)?
            .with_projection(|hit| project_hit(hit, ProjectionOptions::default()));

        let view = self.run(&query, text, page)?;
        let navigation = build_navigation(&view.results, params, &self.settings.nav_path)?;
        debug!(groups = navigation.groups.len(), removals = navigation.removals.len(), "facet navigation built");
        Ok(SearchPage::Results(view.with_navigation(navigation)))
    }

    fn base_query(&self, text: &str) -> Query<RawHit> {
        self.client.search(self.language).with_text(text)
    }

    fn run(&self, query: &Query<SearchHit>, text: &str, page: usize) -> Result<SearchResultView<SearchHit>> {
        let results = query.execute(&self.client)?;
        info!(query = text, total = results.total_matching, page, "search rendered");
        SearchResultView::new(results, text, page, query.request().paging.limit)
    }
}
