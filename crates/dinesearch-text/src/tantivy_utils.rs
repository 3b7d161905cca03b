use tantivy::schema::{FacetOptions, Field, FieldType, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, FAST, INDEXED, STORED, STRING};
use tantivy::tokenizer::{Language as StemLanguage, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter, TextAnalyzer};
use tantivy::Index;

use dinesearch_core::types::{KeywordField, Language, NumericField, TextField};

pub const ENGLISH_TOKENIZER: &str = "restaurant_en";
pub const STANDARD_TOKENIZER: &str = "restaurant_std";

const KEY: &str = "key";
const SOURCE: &str = "source";
const NAME: &str = "name";
const WIKIPEDIA_TEXT: &str = "wikipedia_text";
const MICHELIN_RATING: &str = "michelin_rating";

pub fn tokenizer_name(language: Language) -> &'static str {
	match language { Language::English => ENGLISH_TOKENIZER, Language::Standard => STANDARD_TOKENIZER }
}

fn keyword_name(field: KeywordField) -> &'static str {
	match field { KeywordField::Cuisine => "cuisine", KeywordField::Country => "country", KeywordField::City => "city" }
}

/// Each keyword is stored raw, indexed lowercased for case-insensitive
/// filters, and added as a one-level facet for term counts.
pub fn build_schema(language: Language) -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_text_field(KEY, STRING | STORED);
	schema_builder.add_text_field(SOURCE, STORED);
	let text_field_indexing = TextFieldIndexing::default().set_tokenizer(tokenizer_name(language)).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	let text_options = TextOptions::default().set_indexing_options(text_field_indexing).set_stored();
	schema_builder.add_text_field(NAME, text_options.clone());
	schema_builder.add_text_field(WIKIPEDIA_TEXT, text_options);
	for field in KeywordField::ALL {
		let name = keyword_name(field);
		schema_builder.add_text_field(name, STRING | STORED);
		schema_builder.add_text_field(&format!("{}_lc", name), STRING);
		schema_builder.add_facet_field(&format!("{}_facet", name), FacetOptions::default());
	}
	schema_builder.add_i64_field(MICHELIN_RATING, INDEXED | STORED | FAST);
	schema_builder.build()
}

pub fn register_tokenizers(index: &Index) {
	let stop_words = vec![
		"a","an","and","are","as","at","be","by","for","from","has","in","is","it","its","of","on","that","the","to","was","will","with","or","but","not","this","these","they","their","there","than","so","if","which","who",
	];
	let english = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(RemoveLongFilter::limit(40))
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(stop_words.into_iter().map(|s| s.to_string())))
		.filter(Stemmer::new(StemLanguage::English))
		.build();
	index.tokenizers().register(ENGLISH_TOKENIZER, english);
	let standard = TextAnalyzer::builder(SimpleTokenizer::default()).filter(RemoveLongFilter::limit(40)).filter(LowerCaser).build();
	index.tokenizers().register(STANDARD_TOKENIZER, standard);
}

/// Language an existing index was built for, read back from its name field's tokenizer.
pub fn language_of(schema: &Schema) -> Option<Language> {
	let field = schema.get_field(NAME).ok()?;
	let FieldType::Str(options) = schema.get_field_entry(field).field_type() else { return None };
	match options.get_indexing_options()?.tokenizer() {
		ENGLISH_TOKENIZER => Some(Language::English),
		STANDARD_TOKENIZER => Some(Language::Standard),
		_ => None,
	}
}

#[derive(Debug, Clone, Copy)]
pub struct KeywordFields {
	pub raw: Field,
	pub lowercase: Field,
	pub facet: Field,
}

/// Resolved field handles of the restaurant schema.
#[derive(Debug, Clone)]
pub struct Fields {
	pub key: Field,
	pub source: Field,
	pub name: Field,
	pub wikipedia_text: Field,
	pub cuisine: KeywordFields,
	pub country: KeywordFields,
	pub city: KeywordFields,
	pub michelin_rating: Field,
}

impl Fields {
	pub fn resolve(schema: &Schema) -> anyhow::Result<Self> {
		let keyword = |field: KeywordField| -> anyhow::Result<KeywordFields> {
			let name = keyword_name(field);
			Ok(KeywordFields { raw: schema.get_field(name)?, lowercase: schema.get_field(&format!("{}_lc", name))?, facet: schema.get_field(&format!("{}_facet", name))? })
		};
		Ok(Self {
			key: schema.get_field(KEY)?,
			source: schema.get_field(SOURCE)?,
			name: schema.get_field(NAME)?,
			wikipedia_text: schema.get_field(WIKIPEDIA_TEXT)?,
			cuisine: keyword(KeywordField::Cuisine)?,
			country: keyword(KeywordField::Country)?,
			city: keyword(KeywordField::City)?,
			michelin_rating: schema.get_field(MICHELIN_RATING)?,
		})
	}

	pub fn keyword(&self, field: KeywordField) -> KeywordFields {
		match field { KeywordField::Cuisine => self.cuisine, KeywordField::Country => self.country, KeywordField::City => self.city }
	}

	pub fn text(&self, field: TextField) -> Field {
		match field { TextField::Name => self.name, TextField::WikipediaText => self.wikipedia_text }
	}

	pub fn numeric(&self, field: NumericField) -> Field {
		match field { NumericField::MichelinRating => self.michelin_rating }
	}

	pub fn numeric_field_name(field: NumericField) -> &'static str {
		match field { NumericField::MichelinRating => MICHELIN_RATING }
	}

	/// Name the facet collector addresses a keyword's facet field by.
	pub fn facet_field_name(field: KeywordField) -> String {
		format!("{}_facet", keyword_name(field))
	}
}
