//! Filter state and the visibility predicate.
//!
//! Within a dimension the selected values are OR-ed; across dimensions they
//! are AND-ed. An empty selection leaves its dimension unrestricted.

use std::collections::BTreeSet;

use catalog::{RadiusQuery, Talent};
use foundation::GeoPoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Patterns,
    Emotions,
    Regions,
    Times,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 4] = [
        FilterDimension::Patterns,
        FilterDimension::Emotions,
        FilterDimension::Regions,
        FilterDimension::Times,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterDimension::Patterns => "Voice Patterns",
            FilterDimension::Emotions => "Emotions",
            FilterDimension::Regions => "Regions",
            FilterDimension::Times => "Time Slots",
        }
    }

    /// The talent attribute this dimension filters on.
    pub fn value_of(self, talent: &Talent) -> &str {
        match self {
            FilterDimension::Patterns => &talent.pattern,
            FilterDimension::Emotions => &talent.emotion,
            FilterDimension::Regions => &talent.region,
            FilterDimension::Times => &talent.time_slot,
        }
    }
}

/// Wholesale replacement of one dimension's selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterUpdate {
    #[serde(rename = "type")]
    pub dimension: FilterDimension,
    pub value: BTreeSet<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    selected_patterns: BTreeSet<String>,
    selected_emotions: BTreeSet<String>,
    selected_regions: BTreeSet<String>,
    selected_times: BTreeSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the named dimension's selection. Labels are not validated.
    pub fn apply_update(&mut self, dimension: FilterDimension, value: BTreeSet<String>) {
        *self.slot_mut(dimension) = value;
    }

    pub fn apply(&mut self, update: FilterUpdate) {
        self.apply_update(update.dimension, update.value);
    }

    /// Adds `value` if absent, removes it if present, then applies the new set.
    pub fn toggle(&mut self, dimension: FilterDimension, value: &str) {
        let mut next = self.selected(dimension).clone();
        if !next.remove(value) {
            next.insert(value.to_string());
        }
        self.apply_update(dimension, next);
    }

    pub fn selected(&self, dimension: FilterDimension) -> &BTreeSet<String> {
        match dimension {
            FilterDimension::Patterns => &self.selected_patterns,
            FilterDimension::Emotions => &self.selected_emotions,
            FilterDimension::Regions => &self.selected_regions,
            FilterDimension::Times => &self.selected_times,
        }
    }

    fn slot_mut(&mut self, dimension: FilterDimension) -> &mut BTreeSet<String> {
        match dimension {
            FilterDimension::Patterns => &mut self.selected_patterns,
            FilterDimension::Emotions => &mut self.selected_emotions,
            FilterDimension::Regions => &mut self.selected_regions,
            FilterDimension::Times => &mut self.selected_times,
        }
    }

    pub fn matches_dimension(&self, dimension: FilterDimension, talent: &Talent) -> bool {
        let set = self.selected(dimension);
        set.is_empty() || set.contains(dimension.value_of(talent))
    }

    pub fn matches(&self, talent: &Talent) -> bool {
        FilterDimension::ALL
            .iter()
            .all(|d| self.matches_dimension(*d, talent))
    }

    pub fn is_unrestricted(&self) -> bool {
        FilterDimension::ALL
            .iter()
            .all(|d| self.selected(*d).is_empty())
    }

    /// Number of selected values across all dimensions.
    pub fn active_count(&self) -> usize {
        FilterDimension::ALL
            .iter()
            .map(|d| self.selected(*d).len())
            .sum()
    }

    /// Non-empty selections in display order.
    pub fn active_filters(&self) -> Vec<(FilterDimension, Vec<&str>)> {
        FilterDimension::ALL
            .iter()
            .filter(|d| !self.selected(**d).is_empty())
            .map(|d| (*d, self.selected(*d).iter().map(String::as_str).collect()))
            .collect()
    }
}

/// A talent that passed the visibility predicate, with its validated position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisibleTalent<'a> {
    pub talent: &'a Talent,
    pub position: GeoPoint,
}

/// Talents with a displayable position that match `filters`, in input order.
pub fn visible_talents<'a>(talents: &'a [Talent], filters: &FilterState) -> Vec<VisibleTalent<'a>> {
    talents
        .iter()
        .filter(|t| filters.matches(t))
        .filter_map(|t| {
            Some(VisibleTalent {
                talent: t,
                position: t.position()?,
            })
        })
        .collect()
}

/// Catalog-side filters from the globe controls.
///
/// These are not part of the visibility predicate; they parameterize the
/// catalog radius query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyFilters {
    pub languages: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub price_range: (f64, f64),
    pub rating: f64,
}

impl Default for LegacyFilters {
    fn default() -> Self {
        Self {
            languages: BTreeSet::new(),
            categories: BTreeSet::new(),
            price_range: (0.0, 500.0),
            rating: 0.0,
        }
    }
}

impl LegacyFilters {
    /// `rating` is the talent's average review score, if known. An unknown
    /// rating only passes when no minimum is set.
    pub fn matches(&self, talent: &Talent, rating: Option<f64>) -> bool {
        let lang_ok = self.languages.is_empty()
            || talent
                .language_name()
                .is_some_and(|l| self.languages.contains(l));
        let cat_ok = self.categories.is_empty()
            || talent
                .category_name()
                .is_some_and(|c| self.categories.contains(c));
        let (lo, hi) = self.price_range;
        let price_ok = talent.hourly_rate >= lo && talent.hourly_rate <= hi;
        let rating_ok = self.rating <= 0.0 || rating.is_some_and(|r| r >= self.rating);
        lang_ok && cat_ok && price_ok && rating_ok
    }

    /// Radius query parameters. The endpoint takes a single language and
    /// category, so multi-value selections are left unrestricted.
    pub fn to_radius_query(&self, center: GeoPoint, radius_km: f64) -> RadiusQuery {
        let single = |set: &BTreeSet<String>| {
            if set.len() == 1 {
                set.iter().next().cloned()
            } else {
                None
            }
        };
        RadiusQuery {
            lat: center.lat,
            lng: center.lng,
            radius: radius_km,
            language: single(&self.languages),
            category: single(&self.categories),
            max_price: self.price_range.1,
            min_rating: self.rating,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use catalog::Language;

    pub(crate) fn talent(
        id: &str,
        lang: &str,
        rate: f64,
        lat: f64,
        lng: f64,
        tags: [&str; 4],
    ) -> Talent {
        Talent {
            id: id.into(),
            name: format!("Talent {id}"),
            language_id: format!("lang-{lang}"),
            category_id: String::new(),
            accent: String::new(),
            description: String::new(),
            sample_url: String::new(),
            hourly_rate: rate,
            lat: Some(lat),
            lng: Some(lng),
            created_at: String::new(),
            updated_at: String::new(),
            pattern: tags[0].into(),
            emotion: tags[1].into(),
            region: tags[2].into(),
            time_slot: tags[3].into(),
            language: (!lang.is_empty()).then(|| Language {
                id: format!("lang-{lang}"),
                name: lang.into(),
                code: String::new(),
                created_at: String::new(),
            }),
            category: None,
        }
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample() -> Vec<Talent> {
        vec![
            talent("a", "English", 100.0, 10.0, 10.0, ["Calm", "Happy", "Europe", "Morning"]),
            talent("b", "French", 120.0, 20.0, 20.0, ["Calm", "Serious", "Asia", "Night"]),
            talent("c", "German", 90.0, 30.0, 30.0, ["Energetic", "Happy", "Europe", "Night"]),
            talent("d", "Russian", 80.0, 40.0, 40.0, ["Professional", "Neutral", "Africa", "Evening"]),
        ]
    }

    #[test]
    fn or_within_and_across_dimensions() {
        let talents = sample();
        let mut f = FilterState::new();
        f.apply_update(FilterDimension::Patterns, set(&["Calm", "Energetic"]));
        f.apply_update(FilterDimension::Emotions, set(&["Happy"]));
        let ids: Vec<_> = visible_talents(&talents, &f)
            .iter()
            .map(|v| v.talent.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn empty_selection_admits_every_observed_value() {
        let talents = sample();
        let f = FilterState::new();
        for d in FilterDimension::ALL {
            for t in &talents {
                assert!(f.matches_dimension(d, t));
            }
        }
        assert_eq!(visible_talents(&talents, &f).len(), talents.len());
    }

    #[test]
    fn widening_a_selection_never_shrinks_visibility() {
        let talents = sample();
        let values = ["Calm", "Energetic", "Professional", "Unknown"];
        // Every subset chain of the pattern dimension, combined with a fixed region filter.
        for mask in 0u32..(1 << values.len()) {
            let narrow: Vec<&str> = values
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, v)| *v)
                .collect();
            for extra in values {
                let mut wide = narrow.clone();
                wide.push(extra);

                let mut fa = FilterState::new();
                fa.apply_update(FilterDimension::Regions, set(&["Europe", "Asia"]));
                fa.apply_update(FilterDimension::Patterns, set(&narrow));
                let mut fb = fa.clone();
                fb.apply_update(FilterDimension::Patterns, set(&wide));

                let a = visible_talents(&talents, &fa).len();
                let b = visible_talents(&talents, &fb).len();
                // An empty narrow set is unrestricted, which is the widest possible.
                if !narrow.is_empty() {
                    assert!(b >= a, "narrow={narrow:?} wide={wide:?}");
                }
            }
        }
    }

    #[test]
    fn invalid_positions_are_never_visible() {
        let mut talents = sample();
        talents[0].lat = None;
        talents[1].lng = Some(500.0);
        let v = visible_talents(&talents, &FilterState::new());
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].talent.id, "c");
    }

    #[test]
    fn unknown_labels_are_accepted_and_match_nothing() {
        let talents = sample();
        let mut f = FilterState::new();
        f.apply_update(FilterDimension::Times, set(&["Lunchtime"]));
        assert!(visible_talents(&talents, &f).is_empty());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut f = FilterState::new();
        f.toggle(FilterDimension::Regions, "Europe");
        assert_eq!(f.selected(FilterDimension::Regions), &set(&["Europe"]));
        assert_eq!(f.active_count(), 1);
        f.toggle(FilterDimension::Regions, "Europe");
        assert!(f.is_unrestricted());
    }

    #[test]
    fn update_parses_wire_shape() {
        let u: FilterUpdate =
            serde_json::from_str(r#"{"type":"emotions","value":["Happy","Calm"]}"#).unwrap();
        let mut f = FilterState::new();
        f.apply(u);
        assert_eq!(
            f.active_filters(),
            vec![(FilterDimension::Emotions, vec!["Calm", "Happy"])]
        );
    }

    #[test]
    fn legacy_filters_follow_empty_means_unrestricted() {
        let t = talent("a", "English", 150.0, 0.0, 0.0, ["", "", "", ""]);
        let mut lf = LegacyFilters::default();
        assert!(lf.matches(&t, None));
        lf.languages = set(&["French"]);
        assert!(!lf.matches(&t, None));
        lf.languages = set(&["French", "English"]);
        assert!(lf.matches(&t, None));
        lf.rating = 4.0;
        assert!(!lf.matches(&t, None));
        assert!(lf.matches(&t, Some(4.5)));
        lf.price_range = (0.0, 100.0);
        assert!(!lf.matches(&t, Some(4.5)));
    }

    #[test]
    fn legacy_filters_build_radius_query() {
        let mut lf = LegacyFilters::default();
        lf.languages = set(&["English"]);
        lf.categories = set(&["Commercial", "IVR"]);
        lf.rating = 3.0;
        let q = lf.to_radius_query(GeoPoint::new(1.0, 2.0).unwrap(), 75.0);
        assert_eq!(q.language.as_deref(), Some("English"));
        assert_eq!(q.category, None);
        assert_eq!(q.max_price, 500.0);
        assert_eq!(q.min_rating, 3.0);
        assert_eq!(q.radius, 75.0);
    }
}
