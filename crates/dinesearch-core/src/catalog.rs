//! Listing and record maintenance around the search index.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::query::SearchResults;
use crate::traits::SearchClient;
use crate::types::{Language, Restaurant};

pub struct Catalog<C> {
    client: C,
    language: Language,
}

impl<C: SearchClient> Catalog<C> {
    pub fn new(client: C, language: Language) -> Self {
        Self { client, language }
    }

    /// One page of every restaurant, in index order.
    pub fn list(&self, page: usize, page_size: usize) -> Result<SearchResults<Restaurant>> {
        self.client
            .search(self.language)
            .with_page(page, page_size)?
            .with_projection(|hit| hit.document.clone())
            .execute(&self.client)
    }

    pub fn get(&self, key: &str) -> Result<Restaurant> {
        self.get_for_edit(key)?.ok_or_else(|| Error::NotFound(format!("no restaurant with key '{}'", key)))
    }

    /// Record to prefill an edit form with; `None` renders the empty state.
    pub fn get_for_edit(&self, key: &str) -> Result<Option<Restaurant>> {
        let found = self.client.get(key).map_err(Error::SearchExecutionFailed)?;
        if found.is_none() {
            warn!(key, "restaurant not found");
        }
        Ok(found)
    }

    /// Validates and upserts `restaurant` under its key.
    pub fn save(&self, restaurant: &Restaurant) -> Result<()> {
        restaurant.validate()?;
        self.client.index(restaurant).map_err(Error::IndexingFailed)?;
        info!(key = %restaurant.key, name = %restaurant.name, "restaurant saved");
        Ok(())
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        if self.client.delete(key).map_err(Error::IndexingFailed)? {
            info!(key, "restaurant deleted");
            Ok(())
        } else {
            Err(Error::NotFound(format!("no restaurant with key '{}'", key)))
        }
    }
}
