use std::path::PathBuf;

use dinesearch_cli::ingest::load_restaurants;
use dinesearch_core::config::SearchSettings;
use dinesearch_core::controller::{SearchController, SearchMode};
use dinesearch_core::params::{Dimension, SearchParams};
use dinesearch_core::types::Language;
use dinesearch_text::TantivyClient;

fn data_dir() -> PathBuf {
    // apps/dinesearch-cli -> apps -> repo root
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap().join("test_data/restaurants")
}

fn indexed() -> TantivyClient {
    let (restaurants, skipped) = load_restaurants(&data_dir()).expect("load sample data");
    assert_eq!(skipped, 0);
    let client = TantivyClient::in_memory(Language::English).expect("index");
    assert_eq!(client.index_all(&restaurants).expect("index sample"), 5);
    client
}

#[test]
fn facet_page_over_sample_data() {
    let client = indexed();
    let controller = SearchController::new(&client, Language::English, SearchSettings::default());
    let params = SearchParams::from_query_string("q=paris&country=France").unwrap();

    let page = controller.handle(SearchMode::Facets, &params).unwrap();
    let view = page.view().expect("results");
    assert_eq!(view.results.total_matching, 2);
    assert_eq!(view.total_pages, 1);

    let cuisines = view.facets.iter().find(|g| g.dimension == Dimension::Cuisine).unwrap();
    assert_eq!(cuisines.links.len(), 1);
    assert_eq!(cuisines.links[0].text, "French");
    assert_eq!(cuisines.links[0].count, 2);
    assert_eq!(cuisines.links[0].url, "/search/facets?q=paris&cuisine=French&country=France");

    let ratings = view.facets.iter().find(|g| g.dimension == Dimension::Rating).unwrap();
    assert_eq!(ratings.links.len(), 1);
    assert_eq!(ratings.links[0].css_class.as_deref(), Some("stars-1"));

    assert_eq!(view.filters.len(), 1);
    assert_eq!(view.filters[0].url, "/search/facets?q=paris");
}

#[test]
fn highlighting_page_over_sample_data() {
    let client = indexed();
    let controller = SearchController::new(&client, Language::English, SearchSettings::default());
    let page = controller.handle(SearchMode::Highlighting, &SearchParams::with_text("sushi")).unwrap();
    let hit = &page.view().expect("results").results.hits[0];
    assert_eq!(hit.title, "Sukiyabashi Jiro");
    assert_eq!(hit.location, "Tsukamoto Sogyo Building, Ginza 4-2-15, Tokyo, Japan");
    assert_eq!(hit.michelin_rating, 3);
    assert!(hit.text.as_deref().unwrap().contains("<b>sushi</b>"));
}
