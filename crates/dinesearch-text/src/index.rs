use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tantivy::schema::Facet;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::{debug, info, warn};

use dinesearch_core::types::{KeywordField, Language, Restaurant};

use crate::tantivy_utils::{build_schema, language_of, register_tokenizers, Fields};

pub const DEFAULT_WRITER_MEMORY: usize = 50_000_000;

/// Restaurant index backed by tantivy.
///
/// Writes go through a single shared writer and are committed immediately;
/// the reader is reloaded after every commit so searches see them.
pub struct TantivyClient {
	pub(crate) index: Index,
	pub(crate) reader: IndexReader,
	writer: Mutex<IndexWriter>,
	pub(crate) fields: Fields,
	pub(crate) language: Language,
}

impl TantivyClient {
	/// Fresh index in `index_dir`, removing whatever was there.
	pub fn create(index_dir: &Path, language: Language, writer_memory: usize) -> Result<Self> {
		if index_dir.exists() { std::fs::remove_dir_all(index_dir)?; }
		std::fs::create_dir_all(index_dir)?;
		let index = Index::create_in_dir(index_dir, build_schema(language))?;
		info!(dir = %index_dir.display(), ?language, "created index");
		Self::from_index(index, language, writer_memory)
	}

	/// Opens the index in `index_dir`, creating it when the directory holds none.
	///
	/// An existing index keeps the language it was built with.
	pub fn open_or_create(index_dir: &Path, language: Language, writer_memory: usize) -> Result<Self> {
		if !index_dir.join("meta.json").exists() {
			std::fs::create_dir_all(index_dir)?;
			let index = Index::create_in_dir(index_dir, build_schema(language))?;
			info!(dir = %index_dir.display(), ?language, "created index");
			return Self::from_index(index, language, writer_memory);
		}
		let index = Index::open_in_dir(index_dir)?;
		let built_with = language_of(&index.schema()).ok_or_else(|| anyhow!("{} does not hold a restaurant index", index_dir.display()))?;
		if built_with != language { warn!(configured = ?language, index = ?built_with, "index was built for another language, using the index's"); }
		Self::from_index(index, built_with, writer_memory)
	}

	pub fn in_memory(language: Language) -> Result<Self> {
		Self::from_index(Index::create_in_ram(build_schema(language)), language, DEFAULT_WRITER_MEMORY)
	}

	fn from_index(index: Index, language: Language, writer_memory: usize) -> Result<Self> {
		register_tokenizers(&index);
		let fields = Fields::resolve(&index.schema())?;
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		let writer = index.writer(writer_memory)?;
		Ok(Self { index, reader, writer: Mutex::new(writer), fields, language })
	}

	pub fn language(&self) -> Language { self.language }

	fn writer(&self) -> Result<MutexGuard<'_, IndexWriter>> {
		self.writer.lock().map_err(|_| anyhow!("index writer lock poisoned"))
	}

	fn document(&self, restaurant: &Restaurant) -> Result<TantivyDocument> {
		let f = &self.fields;
		let mut doc = TantivyDocument::default();
		doc.add_text(f.key, &restaurant.key);
		doc.add_text(f.source, serde_json::to_string(restaurant)?);
		doc.add_text(f.name, &restaurant.name);
		if let Some(text) = restaurant.wikipedia_text.as_deref() { doc.add_text(f.wikipedia_text, text); }
		for field in KeywordField::ALL {
			let Some(value) = restaurant.keyword(field).map(str::trim).filter(|v| !v.is_empty()) else { continue };
			let handles = f.keyword(field);
			doc.add_text(handles.raw, value);
			doc.add_text(handles.lowercase, value.to_lowercase());
			doc.add_facet(handles.facet, Facet::from_path([value]));
		}
		if let Some(rating) = restaurant.michelin_rating { doc.add_i64(f.michelin_rating, rating); }
		Ok(doc)
	}

	fn commit(&self, writer: &mut IndexWriter) -> Result<()> {
		writer.commit()?;
		self.reader.reload()?;
		Ok(())
	}

	/// Upserts every restaurant under its key with a single commit.
	pub fn index_all(&self, restaurants: &[Restaurant]) -> Result<usize> {
		let mut writer = self.writer()?;
		for restaurant in restaurants {
			writer.delete_term(Term::from_field_text(self.fields.key, &restaurant.key));
			writer.add_document(self.document(restaurant)?)?;
		}
		self.commit(&mut writer)?;
		debug!(count = restaurants.len(), "indexed restaurants");
		Ok(restaurants.len())
	}

	pub(crate) fn remove(&self, key: &str) -> Result<bool> {
		if !self.contains(key)? { return Ok(false); }
		let mut writer = self.writer()?;
		writer.delete_term(Term::from_field_text(self.fields.key, key));
		self.commit(&mut writer)?;
		debug!(key, "removed restaurant");
		Ok(true)
	}
}
