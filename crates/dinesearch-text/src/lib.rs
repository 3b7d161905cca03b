//! dinesearch-text
//!
//! Tantivy-backed [`dinesearch_core::traits::SearchClient`]: schema and
//! tokenizers in `tantivy_utils`, a fast-field collector for histograms in
//! `collector`, writes in `index`, query execution with
//! facets and highlighting in `search`.
pub mod tantivy_utils;
pub mod collector;
pub mod index;
pub mod search;

pub use index::{TantivyClient, DEFAULT_WRITER_MEMORY};
