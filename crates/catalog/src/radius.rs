//! Radius search over the catalog.
//!
//! The spatial query runs on the backend; attribute and rating filters are
//! applied afterwards, mirroring the serverless endpoint contract.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Query parameters for the radius endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusQuery {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<String>,
    #[serde(default = "default_max_price")]
    pub max_price: f64,
    #[serde(default)]
    pub min_rating: f64,
}

/// `?language=` means no language filter.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

fn default_radius() -> f64 {
    50.0
}

fn default_max_price() -> f64 {
    1000.0
}

impl Default for RadiusQuery {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lng: 0.0,
            radius: default_radius(),
            language: None,
            category: None,
            max_price: default_max_price(),
            min_rating: 0.0,
        }
    }
}

/// Row returned by the spatial query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyTalent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub language_name: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub accent: String,
    pub hourly_rate: f64,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub voice_talent_id: String,
    pub rating: f64,
}

/// Average rating per talent id.
pub fn average_ratings(reviews: &[Review]) -> HashMap<&str, f64> {
    let mut acc: HashMap<&str, (f64, u32)> = HashMap::new();
    for r in reviews {
        let e = acc.entry(r.voice_talent_id.as_str()).or_insert((0.0, 0));
        e.0 += r.rating;
        e.1 += 1;
    }
    acc.into_iter()
        .map(|(id, (sum, count))| (id, sum / count as f64))
        .collect()
}

/// Applies the attribute filters to spatial results.
///
/// A zero `max_price` or `min_rating` disables that filter. When `reviews` is
/// `None` (the ratings lookup failed) the rating filter is skipped; otherwise a
/// talent without any review fails a positive `min_rating`.
pub fn apply_filters(
    hits: Vec<NearbyTalent>,
    query: &RadiusQuery,
    reviews: Option<&[Review]>,
) -> Vec<NearbyTalent> {
    let mut out: Vec<NearbyTalent> = hits
        .into_iter()
        .filter(|t| {
            query
                .language
                .as_deref()
                .is_none_or(|lang| t.language_name == lang)
        })
        .filter(|t| {
            query
                .category
                .as_deref()
                .is_none_or(|cat| t.category_name == cat)
        })
        .filter(|t| query.max_price == 0.0 || t.hourly_rate <= query.max_price)
        .collect();

    if query.min_rating > 0.0
        && let Some(reviews) = reviews
    {
        let ratings = average_ratings(reviews);
        out.retain(|t| {
            ratings
                .get(t.id.as_str())
                .is_some_and(|avg| *avg >= query.min_rating)
        });
    }
    out
}
