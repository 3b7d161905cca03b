//! Domain types shared by the query layer and search engines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

pub type DocumentKey = String;

/// A restaurant record as stored in the search index.
///
/// - `key`: stable identity used for get/upsert/delete (the Wikipedia URL in the sample data)
/// - `cuisine`/`country`: keyword fields, faceted and filterable
/// - `michelin_rating`: star count, faceted as a histogram
/// - `wikipedia_text`: long-form text, the source for highlighted excerpts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Restaurant {
    pub key: DocumentKey,
    pub name: String,
    pub cuisine: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub wikipedia_url: Option<String>,
    pub wikipedia_text: Option<String>,
    pub michelin_rating: Option<i64>,
}

impl Restaurant {
    pub const MIN_RATING: i64 = 1;
    pub const MAX_RATING: i64 = 3;

    /// Checks the record before it is sent to the index.
    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(Error::invalid("restaurant key must not be blank"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::invalid(format!("restaurant '{}' has a blank name", self.key)));
        }
        if let Some(rating) = self.michelin_rating {
            if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&rating) {
                return Err(Error::invalid(format!(
                    "michelin rating {} of '{}' is outside {}..={}",
                    rating,
                    self.key,
                    Self::MIN_RATING,
                    Self::MAX_RATING
                )));
            }
        }
        Ok(())
    }

    pub fn keyword(&self, field: KeywordField) -> Option<&str> {
        match field {
            KeywordField::Cuisine => self.cuisine.as_deref(),
            KeywordField::Country => self.country.as_deref(),
            KeywordField::City => self.city.as_deref(),
        }
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Name => Some(self.name.as_str()),
            TextField::WikipediaText => self.wikipedia_text.as_deref(),
        }
    }
}

/// Content language of a search; drives tokenization inside the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Standard,
}

/// Exact-valued string fields that can be filtered and faceted by term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeywordField {
    Cuisine,
    Country,
    City,
}

impl KeywordField {
    pub const ALL: [KeywordField; 3] = [KeywordField::Cuisine, KeywordField::Country, KeywordField::City];

    pub fn name(self) -> &'static str {
        match self {
            KeywordField::Cuisine => "Cuisine",
            KeywordField::Country => "Country",
            KeywordField::City => "City",
        }
    }
}

/// Integer fields that can be filtered by value/range and faceted as a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericField {
    MichelinRating,
}

impl NumericField {
    pub fn name(self) -> &'static str {
        match self {
            NumericField::MichelinRating => "MichelinRating",
        }
    }
}

/// Tokenized fields that take part in free-text matching and highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TextField {
    Name,
    WikipediaText,
}

impl fmt::Display for KeywordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A matched document as returned by an engine, before projection.
///
/// `highlights` holds the fragments produced for every field the query
/// asked to highlight. A requested field with no match-relevant content is
/// either absent or maps to an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    pub document: Restaurant,
    pub score: f32,
    #[serde(default)]
    pub highlights: BTreeMap<TextField, Vec<String>>,
}

impl RawHit {
    pub fn new(document: Restaurant, score: f32) -> Self {
        Self { document, score, highlights: BTreeMap::new() }
    }

    pub fn fragments(&self, field: TextField) -> &[String] {
        self.highlights.get(&field).map_or(&[], Vec::as_slice)
    }

    /// First non-empty fragment for `field`, if any.
    pub fn highlighted(&self, field: TextField) -> Option<&str> {
        self.fragments(field).iter().map(String::as_str).find(|f| !f.is_empty())
    }
}

/// What an engine returns for one executed request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSearchResults {
    pub hits: Vec<RawHit>,
    pub total_matching: u64,
    #[serde(default)]
    pub facets: BTreeMap<String, crate::facet::FacetResult>,
}
