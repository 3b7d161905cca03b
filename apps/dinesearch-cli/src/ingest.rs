use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

use dinesearch_core::types::Restaurant;

/// A data file holds either one restaurant or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum RestaurantFile {
    Many(Vec<Restaurant>),
    One(Box<Restaurant>),
}

/// Reads every `*.json` file under `data_dir`, sorted by path.
///
/// Returns the valid restaurants and the number of records that failed validation.
pub fn load_restaurants(data_dir: &Path) -> Result<(Vec<Restaurant>, usize)> {
    let mut restaurants = Vec::new();
    let mut skipped = 0;
    for entry in walkdir::WalkDir::new(data_dir).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
        if !(entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "json")) { continue; }
        let content = std::fs::read_to_string(entry.path()).with_context(|| format!("reading {}", entry.path().display()))?;
        let parsed: RestaurantFile = serde_json::from_str(&content).with_context(|| format!("parsing {}", entry.path().display()))?;
        let records = match parsed { RestaurantFile::Many(many) => many, RestaurantFile::One(one) => vec![*one] };
        debug!(file = %entry.path().display(), records = records.len(), "loaded data file");
        for restaurant in records {
            match restaurant.validate() {
                Ok(()) => restaurants.push(restaurant),
                Err(e) => { warn!(file = %entry.path().display(), error = %e, "skipping record"); skipped += 1; }
            }
        }
    }
    Ok((restaurants, skipped))
}
