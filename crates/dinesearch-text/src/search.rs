use anyhow::{bail, Result};
use std::collections::BTreeMap;
use std::ops::Bound;
use tantivy::collector::{Count, FacetCollector, TopDocs};
use tantivy::query::{AllQuery, BooleanQuery, Occur, Query, QueryParser, RangeQuery, TermQuery};
use tantivy::schema::{Facet, IndexRecordOption, Value};
use tantivy::snippet::SnippetGenerator;
use tantivy::{Searcher, TantivyDocument, Term};
use tracing::{debug, warn};

use dinesearch_core::facet::{FacetRequest, FacetResult, HistogramFacetResult, TermsFacetResult};
use dinesearch_core::filter::Filter;
use dinesearch_core::query::{HighlightSpec, SearchRequest};
use dinesearch_core::traits::SearchClient;
use dinesearch_core::types::{RawHit, RawSearchResults, Restaurant, TextField};

use crate::collector::NumericValues;
use crate::index::TantivyClient;
use crate::tantivy_utils::Fields;

impl TantivyClient {
	/// Free text over name and Wikipedia text, ANDed with every filter.
	fn compile(&self, request: &SearchRequest) -> Box<dyn Query> {
		let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
		match request.text.as_deref() {
			Some(text) => {
				let query_parser = QueryParser::for_index(&self.index, vec![self.fields.name, self.fields.wikipedia_text]);
				let (parsed, errors) = query_parser.parse_query_lenient(text);
				if !errors.is_empty() { debug!(text, ?errors, "ignored unparseable parts of the search text"); }
				clauses.push((Occur::Must, parsed));
			}
			None => clauses.push((Occur::Must, Box::new(AllQuery))),
		}
		for filter in request.filters.iter() { clauses.push((Occur::Must, self.filter_query(filter))); }
		Box::new(BooleanQuery::new(clauses))
	}

	fn filter_query(&self, filter: &Filter) -> Box<dyn Query> {
		match filter {
			Filter::Exact { field, value } => {
				Box::new(TermQuery::new(Term::from_field_text(self.fields.keyword(*field).raw, value), IndexRecordOption::Basic))
			}
			Filter::CaseInsensitive { field, value } => {
				Box::new(TermQuery::new(Term::from_field_text(self.fields.keyword(*field).lowercase, &value.to_lowercase()), IndexRecordOption::Basic))
			}
			Filter::Equals { field, value } => {
				Box::new(TermQuery::new(Term::from_field_i64(self.fields.numeric(*field), *value), IndexRecordOption::Basic))
			}
			Filter::Range { field, from, to } => {
				let numeric = self.fields.numeric(*field);
				let lower = from.map_or(Bound::Unbounded, |v| Bound::Included(Term::from_field_i64(numeric, v)));
				let upper = to.map_or(Bound::Unbounded, |v| Bound::Excluded(Term::from_field_i64(numeric, v)));
				Box::new(RangeQuery::new(lower, upper))
			}
		}
	}

	fn facet(&self, searcher: &Searcher, query: &dyn Query, request: &FacetRequest) -> Result<FacetResult> {
		match request {
			FacetRequest::Terms { field, size } => {
				let mut facet_collector = FacetCollector::for_field(Fields::facet_field_name(*field));
				facet_collector.add_facet(Facet::root());
				let facet_counts = searcher.search(query, &facet_collector)?;
				let counts = facet_counts.get("/").filter_map(|(facet, count)| facet.to_path().last().map(|term| (term.to_string(), count)));
				Ok(FacetResult::Terms(TermsFacetResult::top(counts, *size)))
			}
			FacetRequest::Histogram { field, interval } => {
				let values = searcher.search(query, &NumericValues::for_field(Fields::numeric_field_name(*field)))?;
				Ok(FacetResult::Histogram(HistogramFacetResult::from_values(values, *interval)?))
			}
		}
	}

	/// Highlighted fragments of `text`, best first, at most `spec.number_of_fragments`.
	fn fragments(generator: &mut SnippetGenerator, text: &str, spec: HighlightSpec) -> Vec<String> {
		generator.set_max_num_chars(spec.fragment_size.unwrap_or(text.len()).max(1));
		let mut fragments = Vec::new();
		let mut rest = text;
		while fragments.len() < spec.number_of_fragments && !rest.is_empty() {
			let snippet = generator.snippet(rest);
			if snippet.is_empty() { break; }
			fragments.push(snippet.to_html());
			let Some(start) = rest.find(snippet.fragment()) else { break };
			rest = &rest[start + snippet.fragment().len()..];
		}
		fragments
	}

	fn highlights(&self, searcher: &Searcher, query: &dyn Query, request: &SearchRequest) -> Result<Vec<(TextField, HighlightSpec, SnippetGenerator)>> {
		let mut generators = Vec::new();
		for highlight in &request.highlights {
			let generator = SnippetGenerator::create(searcher, query, self.fields.text(highlight.field))?;
			generators.push((highlight.field, highlight.spec, generator));
		}
		Ok(generators)
	}

	fn restaurant(&self, doc: &TantivyDocument) -> Result<Restaurant> {
		let Some(source) = doc.get_first(self.fields.source).and_then(|v| v.as_str()) else { bail!("stored document has no source") };
		Ok(serde_json::from_str(source)?)
	}

	pub(crate) fn contains(&self, key: &str) -> Result<bool> {
		let query = TermQuery::new(Term::from_field_text(self.fields.key, key), IndexRecordOption::Basic);
		Ok(self.reader.searcher().search(&query, &Count)? > 0)
	}
}

impl SearchClient for TantivyClient {
	fn execute(&self, request: &SearchRequest) -> Result<RawSearchResults> {
		if request.language != self.language { warn!(requested = ?request.language, index = ?self.language, "search language differs from the index language"); }
		if request.paging.limit == 0 { bail!("search window must hold at least one hit"); }
		let searcher = self.reader.searcher();
		let query = self.compile(request);
		let total = searcher.search(&*query, &Count)?;
		let offset = request.paging.offset;
		let top = if offset >= total { Vec::new() } else {
			let limit = request.paging.limit.min(total - offset);
			searcher.search(&*query, &TopDocs::with_limit(limit).and_offset(offset))?
		};

		let mut generators = self.highlights(&searcher, &*query, request)?;
		let mut hits = Vec::with_capacity(top.len());
		for (score, address) in top {
			let doc: TantivyDocument = searcher.doc(address)?;
			let mut hit = RawHit::new(self.restaurant(&doc)?, score);
			for (field, spec, generator) in generators.iter_mut() {
				let text = hit.document.text(*field).unwrap_or_default().to_string();
				hit.highlights.insert(*field, Self::fragments(generator, &text, *spec));
			}
			hits.push(hit);
		}

		let mut facets = BTreeMap::new();
		for facet in &request.facets { facets.insert(facet.name().to_string(), self.facet(&searcher, &*query, facet)?); }
		debug!(total, hits = hits.len(), facets = facets.len(), "tantivy search");
		Ok(RawSearchResults { hits, total_matching: total as u64, facets })
	}

	fn get(&self, key: &str) -> Result<Option<Restaurant>> {
		let searcher = self.reader.searcher();
		let query = TermQuery::new(Term::from_field_text(self.fields.key, key), IndexRecordOption::Basic);
		let Some((_, address)) = searcher.search(&query, &TopDocs::with_limit(1))?.into_iter().next() else { return Ok(None) };
		let doc: TantivyDocument = searcher.doc(address)?;
		Ok(Some(self.restaurant(&doc)?))
	}

	fn index(&self, document: &Restaurant) -> Result<()> {
		self.index_all(std::slice::from_ref(document)).map(|_| ())
	}

	fn delete(&self, key: &str) -> Result<bool> {
		self.remove(key)
	}
}
