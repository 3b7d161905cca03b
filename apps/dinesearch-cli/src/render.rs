use dinesearch_core::navigation::FacetLink;
use dinesearch_core::projection::SearchHit;
use dinesearch_core::query::SearchResults;
use dinesearch_core::types::Restaurant;
use dinesearch_core::view::SearchPage;

fn stars(rating: i64) -> String {
    "*".repeat(usize::try_from(rating).unwrap_or(0))
}

fn link_label(link: &FacetLink) -> String {
    match &link.css_class {
        Some(class) if link.text.is_empty() => class.clone(),
        _ => link.text.clone(),
    }
}

pub fn print_page(page: &SearchPage<SearchHit>) {
    let Some(view) = page.view() else {
        println!("Enter a search term with q=...");
        return;
    };
    println!("Results for '{}': {} matches, page {} of {}", view.query, view.results.total_matching, view.current_page, view.total_pages);
    for hit in &view.results.hits {
        println!("\n{} {}", hit.title, stars(hit.michelin_rating));
        if !hit.location.is_empty() { println!("  {}", hit.location); }
        if let Some(url) = &hit.url { println!("  {}", url); }
        if let Some(text) = &hit.text { println!("  {}", text); }
    }
    for group in &view.facets {
        println!("\n{}", group.name);
        for link in &group.links {
            let marker = if link.active { ">" } else { " " };
            println!(" {} {} ({})  {}", marker, link_label(link), link.count, link.url);
        }
    }
    if !view.filters.is_empty() {
        println!("\nActive filters");
        for link in &view.filters { println!("  x {}  {}", link_label(link), link.url); }
    }
}

pub fn print_listing(results: &SearchResults<Restaurant>, page: usize, total_pages: u64) {
    println!("{} restaurants, page {} of {}", results.total_matching, page, total_pages);
    for restaurant in &results.hits {
        println!("  {:<32} {:<40} {}", restaurant.key, restaurant.name, stars(restaurant.michelin_rating.unwrap_or(0)));
    }
}

pub fn print_restaurant(restaurant: &Restaurant) {
    let fields = [
        ("Key", Some(restaurant.key.as_str())),
        ("Name", Some(restaurant.name.as_str())),
        ("Cuisine", restaurant.cuisine.as_deref()),
        ("Address", restaurant.street_address.as_deref()),
        ("City", restaurant.city.as_deref()),
        ("Country", restaurant.country.as_deref()),
        ("Website", restaurant.website.as_deref()),
        ("Wikipedia", restaurant.wikipedia_url.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value { println!("{:<10} {}", label, value); }
    }
    if let Some(rating) = restaurant.michelin_rating { println!("{:<10} {}", "Michelin", stars(rating)); }
    if let Some(text) = &restaurant.wikipedia_text { println!("\n{}", text); }
}
