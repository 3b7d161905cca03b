use crate::query::{Query, SearchRequest};
use crate::types::{Language, RawHit, RawSearchResults, Restaurant};

/// The full-text search service this crate presents results from.
///
/// Implementations own matching, scoring, tokenization, facet aggregation
/// and highlighting. Facets must be computed over the filtered candidate set,
/// not the whole corpus.
pub trait SearchClient: Send + Sync {
    /// Starts a match-all query for restaurants in `language`.
    fn search(&self, language: Language) -> Query<RawHit> {
        Query::new(language)
    }

    fn execute(&self, request: &SearchRequest) -> anyhow::Result<RawSearchResults>;

    fn get(&self, key: &str) -> anyhow::Result<Option<Restaurant>>;

    /// Inserts `document`, replacing any document with the same key.
    fn index(&self, document: &Restaurant) -> anyhow::Result<()>;

    /// Removes the document with `key`. Returns whether one existed.
    fn delete(&self, key: &str) -> anyhow::Result<bool>;
}

impl<T: SearchClient + ?Sized> SearchClient for &T {
    fn search(&self, language: Language) -> Query<RawHit> {
        (**self).search(language)
    }

    fn execute(&self, request: &SearchRequest) -> anyhow::Result<RawSearchResults> {
        (**self).execute(request)
    }

    fn get(&self, key: &str) -> anyhow::Result<Option<Restaurant>> {
        (**self).get(key)
    }

    fn index(&self, document: &Restaurant) -> anyhow::Result<()> {
        (**self).index(document)
    }

    fn delete(&self, key: &str) -> anyhow::Result<bool> {
        (**self).delete(key)
    }
}
