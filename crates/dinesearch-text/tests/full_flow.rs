use std::collections::BTreeMap;
use tempfile::TempDir;

use dinesearch_core::filter::Filter;
use dinesearch_core::query::{HighlightSpec, Query};
use dinesearch_core::traits::SearchClient;
use dinesearch_core::types::{KeywordField, Language, NumericField, RawHit, Restaurant, TextField};
use dinesearch_text::{TantivyClient, DEFAULT_WRITER_MEMORY};

fn restaurant(key: &str, name: &str, cuisine: &str, city: &str, country: &str, rating: Option<i64>, text: &str) -> Restaurant {
    Restaurant {
        key: key.to_string(),
        name: name.to_string(),
        cuisine: Some(cuisine.to_string()),
        city: Some(city.to_string()),
        country: Some(country.to_string()),
        wikipedia_url: Some(format!("https://en.wikipedia.org/wiki/{}", key)),
        wikipedia_text: Some(text.to_string()),
        michelin_rating: rating,
        ..Restaurant::default()
    }
}

fn sample() -> Vec<Restaurant> {
    vec![
        restaurant("le_bistrot", "Le Bistrot", "French", "Paris", "France", Some(1), "Le Bistrot is a small bistro near the Seine in Paris serving classic French cooking."),
        restaurant("chez_marie", "Chez Marie", "French", "Lyon", "France", Some(1), "Chez Marie is a Lyon bouchon known for quenelles and a long wine list."),
        restaurant("noma", "Noma", "Nordic", "Copenhagen", "Denmark", Some(2), "Noma reinvented Nordic cuisine with foraged ingredients and fermentation."),
        restaurant("jiro", "Sukiyabashi Jiro", "Sushi", "Tokyo", "Japan", Some(3), "Sukiyabashi Jiro is a sushi counter in a Tokyo subway station."),
        restaurant("francescana", "Osteria Francescana", "Italian", "Modena", "Italy", Some(3), "Osteria Francescana serves modern Italian cooking in Modena."),
        restaurant("can_roca", "El Celler de Can Roca", "Catalan", "Girona", "Spain", Some(3), "El Celler de Can Roca is run by three brothers in Girona."),
        restaurant("da_enzo", "Trattoria da Enzo", "Italian", "Rome", "Italy", None, "Trattoria da Enzo is a family trattoria in Trastevere, Rome."),
    ]
}

fn client() -> TantivyClient {
    let client = TantivyClient::in_memory(Language::English).expect("index");
    client.index_all(&sample()).expect("index sample");
    client
}

fn keys(hits: &[RawHit]) -> Vec<String> {
    let mut keys: Vec<String> = hits.iter().map(|h| h.document.key.clone()).collect();
    keys.sort();
    keys
}

#[test]
fn match_all_counts_every_document() {
    let client = client();
    let results = client.search(Language::English).with_page(1, 20).unwrap().execute(&client).unwrap();
    assert_eq!(results.total_matching, 7);
    assert_eq!(results.hits.len(), 7);
}

#[test]
fn paging_returns_the_requested_window() {
    let client = client();
    let query = client.search(Language::English);
    let first = query.with_page(1, 3).unwrap().execute(&client).unwrap();
    let third = query.with_page(3, 3).unwrap().execute(&client).unwrap();
    assert_eq!(first.hits.len(), 3);
    assert_eq!(third.hits.len(), 1);
    assert_eq!(third.total_matching, 7);
}

#[test]
fn repeating_a_filter_changes_nothing() {
    let client = client();
    let once = client.search(Language::English).with_filter(Filter::exact(KeywordField::Country, "France"));
    let twice = once.with_filter(Filter::exact(KeywordField::Country, "France"));
    let a = once.execute(&client).unwrap();
    let b = twice.execute(&client).unwrap();
    assert_eq!(a.total_matching, 2);
    assert_eq!(keys(&a.hits), keys(&b.hits));
}

#[test]
fn case_insensitive_filter_ignores_letter_case() {
    let client = client();
    let query = client.search(Language::English);
    let exact = query.with_filter(Filter::exact(KeywordField::Country, "france")).execute(&client).unwrap();
    let folded = query.with_filter(Filter::case_insensitive(KeywordField::Country, "france")).execute(&client).unwrap();
    assert_eq!(exact.total_matching, 0);
    assert_eq!(keys(&folded.hits), vec!["chez_marie", "le_bistrot"]);
}

#[test]
fn rating_histogram_counts_each_bucket() {
    let client = client();
    let results = client
        .search(Language::English)
        .with_histogram_facet(NumericField::MichelinRating, 1)
        .unwrap()
        .execute(&client)
        .unwrap();
    let histogram = results.histogram_facet("MichelinRating").unwrap();
    let expected: BTreeMap<i64, u64> = [(1, 2), (2, 1), (3, 3)].into_iter().collect();
    assert_eq!(histogram.entries, expected);
}

#[test]
fn facets_are_computed_over_filtered_documents() {
    let client = client();
    let results = client
        .search(Language::English)
        .with_terms_facet(KeywordField::Cuisine)
        .with_terms_facet(KeywordField::Country)
        .with_filter(Filter::case_insensitive(KeywordField::Country, "Italy"))
        .execute(&client)
        .unwrap();
    let cuisines = results.terms_facet("Cuisine").unwrap();
    assert_eq!(cuisines.terms.len(), 1);
    assert_eq!(cuisines.terms[0].term, "Italian");
    assert_eq!(cuisines.terms[0].count, 2);
    let countries = results.terms_facet("Country").unwrap();
    assert_eq!(countries.terms.iter().map(|t| t.term.as_str()).collect::<Vec<_>>(), vec!["Italy"]);
}

#[test]
fn terms_facet_orders_by_count() {
    let client = client();
    let results = client.search(Language::English).with_terms_facet(KeywordField::Cuisine).execute(&client).unwrap();
    let cuisines = results.terms_facet("Cuisine").unwrap();
    assert_eq!(cuisines.terms[0].term, "French");
    assert_eq!(cuisines.terms[1].term, "Italian");
    assert_eq!(cuisines.terms.len(), 5);
}

#[test]
fn range_filter_is_half_open() {
    let client = client();
    let filter = Filter::range(NumericField::MichelinRating, Some(2), Some(3)).unwrap();
    let results = client.search(Language::English).with_filter(filter).execute(&client).unwrap();
    assert_eq!(keys(&results.hits), vec!["noma"]);
}

#[test]
fn free_text_matches_stemmed_terms() {
    let client = client();
    let results = client.search(Language::English).with_text("sushi counters").execute(&client).unwrap();
    assert!(results.hits.iter().any(|h| h.document.key == "jiro"));
}

#[test]
fn highlights_name_and_excerpt() {
    let client = client();
    let results = client
        .search(Language::English)
        .with_text("bistrot")
        .with_highlight(TextField::Name, HighlightSpec::whole_field())
        .with_highlight(TextField::WikipediaText, HighlightSpec::fragments(200, 2).unwrap())
        .execute(&client)
        .unwrap();
    let hit = &results.hits[0];
    assert_eq!(hit.document.key, "le_bistrot");
    assert_eq!(hit.highlighted(TextField::Name), Some("Le <b>Bistrot</b>"));
    let excerpt = hit.fragments(TextField::WikipediaText);
    assert!(!excerpt.is_empty() && excerpt.len() <= 2);
    assert!(excerpt[0].contains("<b>Bistrot</b>"));
}

#[test]
fn unmatched_name_has_no_highlight() {
    let client = client();
    let results = client
        .search(Language::English)
        .with_text("quenelles")
        .with_highlight(TextField::Name, HighlightSpec::whole_field())
        .execute(&client)
        .unwrap();
    assert_eq!(results.hits[0].document.key, "chez_marie");
    assert_eq!(results.hits[0].highlighted(TextField::Name), None);
}

#[test]
fn punctuated_text_is_searched_not_rejected() {
    let client = client();
    for text in ["l'arpege", "Restaurant: Noma", "\"le bistrot", "bistrot (paris", "bistrot)", "-", "nosuchfield:sushi"] {
        let results = client.search(Language::English).with_text(text).execute(&client);
        assert!(results.is_ok(), "search for {:?} failed: {:?}", text, results.err());
    }
    let results = client.search(Language::English).with_text("bistrot (paris").execute(&client).unwrap();
    assert!(results.hits.iter().any(|h| h.document.key == "le_bistrot"));
}

#[test]
fn page_past_the_end_is_empty() {
    let client = client();
    let results = client.search(Language::English).with_page(1_000_000_000, 10).unwrap().execute(&client).unwrap();
    assert!(results.hits.is_empty());
    assert_eq!(results.total_matching, 7);
}

#[test]
fn oversized_page_returns_what_exists() {
    let client = client();
    let results = client.search(Language::English).with_page(1, 1_000_000_000).unwrap().execute(&client).unwrap();
    assert_eq!(results.hits.len(), 7);
}

#[test]
fn city_filter_and_facet() {
    let client = client();
    let italy = client
        .search(Language::English)
        .with_terms_facet(KeywordField::City)
        .with_filter(Filter::exact(KeywordField::Country, "Italy"))
        .execute(&client)
        .unwrap();
    let cities = italy.terms_facet("City").unwrap();
    assert_eq!(cities.terms.iter().map(|t| (t.term.as_str(), t.count)).collect::<Vec<_>>(), vec![("Modena", 1), ("Rome", 1)]);

    let rome = client.search(Language::English).with_filter(Filter::case_insensitive(KeywordField::City, "ROME")).execute(&client).unwrap();
    assert_eq!(keys(&rome.hits), vec!["da_enzo"]);
}

#[test]
fn histogram_skips_deleted_and_unrated_documents() {
    let client = client();
    assert!(client.delete("noma").unwrap());
    client.index(&restaurant("septime", "Septime", "French", "Paris", "France", Some(1), "Septime is a bistro in Paris.")).unwrap();
    let results = client
        .search(Language::English)
        .with_histogram_facet(NumericField::MichelinRating, 2)
        .unwrap()
        .execute(&client)
        .unwrap();
    let expected: BTreeMap<i64, u64> = [(0, 3), (2, 3)].into_iter().collect();
    assert_eq!(results.histogram_facet("MichelinRating").unwrap().entries, expected);
}

#[test]
fn upsert_get_and_delete() {
    let client = client();
    assert_eq!(client.get("missing").unwrap(), None);

    let mut noma = client.get("noma").unwrap().expect("noma indexed");
    noma.michelin_rating = Some(3);
    client.index(&noma).unwrap();
    assert_eq!(client.get("noma").unwrap(), Some(noma));
    let all = client.search(Language::English).with_page(1, 20).unwrap().execute(&client).unwrap();
    assert_eq!(all.total_matching, 7);

    assert!(client.delete("noma").unwrap());
    assert!(!client.delete("noma").unwrap());
    assert_eq!(client.get("noma").unwrap(), None);
}

#[test]
fn reopened_index_keeps_documents_and_language() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("index");
    {
        let client = TantivyClient::open_or_create(&dir, Language::Standard, DEFAULT_WRITER_MEMORY).unwrap();
        client.index_all(&sample()).unwrap();
    }
    let client = TantivyClient::open_or_create(&dir, Language::English, DEFAULT_WRITER_MEMORY).unwrap();
    assert_eq!(client.language(), Language::Standard);
    let results = Query::new(Language::Standard).with_text("noma").execute(&client).unwrap();
    assert_eq!(results.total_matching, 1);
}
