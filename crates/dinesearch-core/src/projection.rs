//! Turns engine hits into display hits.

use serde::{Deserialize, Serialize};

use crate::types::{RawHit, TextField};

pub const LOCATION_SEPARATOR: &str = ", ";
pub const FRAGMENT_SEPARATOR: &str = " ... ";

pub const EXCERPT_FRAGMENT_SIZE: usize = 200;
pub const EXCERPT_FRAGMENTS: usize = 2;

/// A restaurant as shown in a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: Option<String>,
    pub location: String,
    pub michelin_rating: i64,
    /// Highlighted excerpt, present only when one was asked for and matched.
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionOptions {
    pub with_excerpt: bool,
}

pub fn project_hit(hit: &RawHit, options: ProjectionOptions) -> SearchHit {
    let doc = &hit.document;
    let title = hit.highlighted(TextField::Name).map_or_else(|| doc.name.clone(), str::to_string);
    let url = non_blank(doc.website.as_deref()).or_else(|| non_blank(doc.wikipedia_url.as_deref())).map(str::to_string);
    let location = join_non_empty([doc.street_address.as_deref(), doc.city.as_deref(), doc.country.as_deref()], LOCATION_SEPARATOR);
    let text = if options.with_excerpt { excerpt(hit.fragments(TextField::WikipediaText)) } else { None };
    SearchHit { title, url, location, michelin_rating: doc.michelin_rating.unwrap_or(0), text }
}

fn excerpt(fragments: &[String]) -> Option<String> {
    let parts: Vec<&str> = fragments.iter().map(|f| f.trim()).filter(|f| !f.is_empty()).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(FRAGMENT_SEPARATOR))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn join_non_empty<'a>(parts: impl IntoIterator<Item = Option<&'a str>>, separator: &str) -> String {
    parts.into_iter().filter_map(non_blank).map(str::trim).collect::<Vec<_>>().join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Restaurant;

    fn noma() -> Restaurant {
        Restaurant {
            key: "https://en.wikipedia.org/wiki/Noma_(restaurant)".into(),
            name: "Noma".into(),
            cuisine: Some("Nordic".into()),
            street_address: Some("Refshalevej 96".into()),
            city: Some("Copenhagen".into()),
            country: Some("Denmark".into()),
            website: None,
            wikipedia_url: Some("https://en.wikipedia.org/wiki/Noma_(restaurant)".into()),
            wikipedia_text: Some("Noma is a two-Michelin-star restaurant".into()),
            michelin_rating: Some(2),
        }
    }

    #[test]
    fn empty_highlight_falls_back_to_raw_name() {
        let mut hit = RawHit::new(noma(), 1.0);
        hit.highlights.insert(TextField::Name, vec![String::new()]);
        let projected = project_hit(&hit, ProjectionOptions::default());
        assert_eq!(projected.title, "Noma");
    }

    #[test]
    fn highlighted_name_wins() {
        let mut hit = RawHit::new(noma(), 1.0);
        hit.highlights.insert(TextField::Name, vec!["<b>Noma</b>".into()]);
        assert_eq!(project_hit(&hit, ProjectionOptions::default()).title, "<b>Noma</b>");
    }

    #[test]
    fn website_preferred_over_wikipedia() {
        let mut doc = noma();
        let hit = RawHit::new(doc.clone(), 1.0);
        assert_eq!(project_hit(&hit, ProjectionOptions::default()).url.as_deref(), Some("https://en.wikipedia.org/wiki/Noma_(restaurant)"));
        doc.website = Some("https://noma.dk".into());
        let hit = RawHit::new(doc, 1.0);
        assert_eq!(project_hit(&hit, ProjectionOptions::default()).url.as_deref(), Some("https://noma.dk"));
    }

    #[test]
    fn location_skips_missing_parts_and_rating_defaults_to_zero() {
        let mut doc = noma();
        doc.street_address = None;
        doc.city = Some("  ".into());
        doc.michelin_rating = None;
        let projected = project_hit(&RawHit::new(doc, 1.0), ProjectionOptions::default());
        assert_eq!(projected.location, "Denmark");
        assert_eq!(projected.michelin_rating, 0);
        assert_eq!(project_hit(&RawHit::new(noma(), 1.0), ProjectionOptions::default()).location, "Refshalevej 96, Copenhagen, Denmark");
    }

    #[test]
    fn excerpt_joins_fragments_only_when_asked() {
        let mut hit = RawHit::new(noma(), 1.0);
        hit.highlights.insert(TextField::WikipediaText, vec!["a <b>two</b>-star".into(), "in <b>Copenhagen</b>".into()]);
        assert_eq!(project_hit(&hit, ProjectionOptions::default()).text, None);
        let projected = project_hit(&hit, ProjectionOptions { with_excerpt: true });
        assert_eq!(projected.text.as_deref(), Some("a <b>two</b>-star ... in <b>Copenhagen</b>"));
    }

    #[test]
    fn excerpt_skipped_without_fragments() {
        let hit = RawHit::new(noma(), 1.0);
        assert_eq!(project_hit(&hit, ProjectionOptions { with_excerpt: true }).text, None);
    }
}
