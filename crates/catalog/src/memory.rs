use foundation::math::haversine_km;
use foundation::{GeoPoint, Timestamp};
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::model::{Language, Talent, VoiceCategory};
use crate::radius::{NearbyTalent, Review};
use crate::seed;
use crate::source::{BoxFuture, CatalogBackend, CatalogError, CatalogSource, NewTalent};

#[derive(Debug, Default)]
struct State {
    languages: Vec<Language>,
    categories: Vec<VoiceCategory>,
    talents: Vec<Talent>,
    reviews: Vec<Review>,
}

/// Process-local catalog used for development and tests.
///
/// Language names are unique, so running the bootstrap twice fails the same
/// way a second insert into the hosted tables does.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<State>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog that has already been bootstrapped.
    pub fn seeded() -> Self {
        let catalog = Self::new();
        if let Err(err) = catalog.seed() {
            warn!(error = %err, "seeding a fresh catalog failed");
        }
        catalog
    }

    pub fn with_talents(talents: Vec<Talent>) -> Self {
        let catalog = Self::new();
        catalog.state.write().talents = talents;
        catalog
    }

    pub fn add_review(&self, review: Review) {
        self.state.write().reviews.push(review);
    }

    pub fn talent_count(&self) -> usize {
        self.state.read().talents.len()
    }

    fn seed(&self) -> Result<(), CatalogError> {
        let mut state = self.state.write();
        if let Some(dup) = seed::LANGUAGES
            .iter()
            .find(|l| state.languages.iter().any(|have| have.name == l.name))
        {
            return Err(CatalogError::Bootstrap(format!(
                "duplicate language {}",
                dup.name
            )));
        }

        let now = Timestamp::now().0.to_string();
        for l in seed::LANGUAGES {
            state.languages.push(Language {
                id: uuid::Uuid::new_v4().to_string(),
                name: l.name.to_string(),
                code: l.code.to_string(),
                created_at: now.clone(),
            });
        }
        for c in seed::CATEGORIES {
            state.categories.push(VoiceCategory {
                id: uuid::Uuid::new_v4().to_string(),
                name: c.name.to_string(),
                description: c.description.to_string(),
                created_at: now.clone(),
            });
        }

        for t in seed::TALENTS {
            let language = state.languages.iter().find(|l| l.name == t.language).cloned();
            let category = state.categories.iter().find(|c| c.name == t.category).cloned();
            let talent = Talent {
                id: uuid::Uuid::new_v4().to_string(),
                name: t.name.to_string(),
                language_id: language.as_ref().map(|l| l.id.clone()).unwrap_or_default(),
                category_id: category.as_ref().map(|c| c.id.clone()).unwrap_or_default(),
                accent: t.accent.to_string(),
                description: t.description.to_string(),
                sample_url: t.sample_url.to_string(),
                hourly_rate: t.hourly_rate,
                lat: Some(t.lat),
                lng: Some(t.lng),
                created_at: now.clone(),
                updated_at: now.clone(),
                pattern: t.pattern.to_string(),
                emotion: t.emotion.to_string(),
                region: t.region.to_string(),
                time_slot: t.time_slot.to_string(),
                language,
                category,
            };
            state.talents.push(talent);
        }
        info!(
            languages = state.languages.len(),
            talents = state.talents.len(),
            "seeded in-memory catalog"
        );
        Ok(())
    }

    fn create(&self, new: NewTalent) -> Talent {
        let mut state = self.state.write();
        let language = state.languages.iter().find(|l| l.id == new.language_id).cloned();
        let category = state.categories.iter().find(|c| c.id == new.category_id).cloned();
        let now = Timestamp::now().0.to_string();
        let talent = Talent {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            language_id: new.language_id,
            category_id: new.category_id,
            accent: new.accent,
            description: new.description,
            sample_url: new.sample_url,
            hourly_rate: new.hourly_rate,
            lat: Some(new.lat),
            lng: Some(new.lng),
            created_at: now.clone(),
            updated_at: now,
            pattern: new.pattern,
            emotion: new.emotion,
            region: new.region,
            time_slot: new.time_slot,
            language,
            category,
        };
        state.talents.push(talent.clone());
        talent
    }

    fn nearby(&self, center: GeoPoint, radius_km: f64) -> Vec<NearbyTalent> {
        let state = self.state.read();
        let mut out: Vec<NearbyTalent> = state
            .talents
            .iter()
            .filter_map(|t| {
                let distance_km = haversine_km(center, t.position()?);
                (distance_km <= radius_km).then(|| NearbyTalent {
                    id: t.id.clone(),
                    name: t.name.clone(),
                    language_name: t.language_name().unwrap_or_default().to_string(),
                    category_name: t.category_name().unwrap_or_default().to_string(),
                    accent: t.accent.clone(),
                    hourly_rate: t.hourly_rate,
                    distance_km,
                })
            })
            .collect();
        out.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        out
    }

    /// Newest first, matching the hosted query's `created_at desc` ordering.
    fn listed(&self) -> Vec<Talent> {
        self.state.read().talents.iter().rev().cloned().collect()
    }
}

impl CatalogSource for InMemoryCatalog {
    fn fetch_talents(&self) -> BoxFuture<'_, Result<Vec<Talent>, CatalogError>> {
        Box::pin(async move { Ok(self.listed()) })
    }
}

impl CatalogBackend for InMemoryCatalog {
    fn list_talents(&self) -> BoxFuture<'_, Result<Vec<Talent>, CatalogError>> {
        Box::pin(async move { Ok(self.listed()) })
    }

    fn talent_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Talent, CatalogError>> {
        Box::pin(async move {
            self.state
                .read()
                .talents
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or(CatalogError::NotFound)
        })
    }

    fn create_talent(&self, talent: NewTalent) -> BoxFuture<'_, Result<Talent, CatalogError>> {
        Box::pin(async move { Ok(self.create(talent)) })
    }

    fn initialize(&self) -> BoxFuture<'_, Result<(), CatalogError>> {
        Box::pin(async move { self.seed() })
    }

    fn talents_within_radius(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> BoxFuture<'_, Result<Vec<NearbyTalent>, CatalogError>> {
        Box::pin(async move { Ok(self.nearby(center, radius_km)) })
    }

    fn reviews(&self) -> BoxFuture<'_, Result<Vec<Review>, CatalogError>> {
        Box::pin(async move { Ok(self.state.read().reviews.clone()) })
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryCatalog;
    use crate::source::{CatalogBackend, CatalogError, CatalogSource, NewTalent};
    use foundation::GeoPoint;

    #[tokio::test]
    async fn bootstrap_seeds_joined_talents() {
        let catalog = InMemoryCatalog::new();
        assert!(catalog.list_talents().await.unwrap().is_empty());
        catalog.initialize().await.unwrap();

        let talents = catalog.fetch_talents().await.unwrap();
        assert_eq!(talents.len(), 3);
        let sarah = talents.iter().find(|t| t.name == "Sarah Johnson").unwrap();
        assert_eq!(sarah.language_name(), Some("English"));
        assert_eq!(sarah.category_name(), Some("Commercial"));
        assert_eq!(sarah.language_id, sarah.language.as_ref().unwrap().id);
    }

    #[tokio::test]
    async fn seeded_catalog_holds_the_bootstrap_data() {
        let catalog = InMemoryCatalog::seeded();
        assert_eq!(catalog.talent_count(), 3);
        let talents = catalog.list_talents().await.unwrap();
        assert!(talents.iter().all(|t| t.language.is_some()));
    }

    #[tokio::test]
    async fn second_bootstrap_is_rejected() {
        let catalog = InMemoryCatalog::seeded();
        let err = catalog.initialize().await.unwrap_err();
        assert!(matches!(err, CatalogError::Bootstrap(_)));
        assert_eq!(catalog.talent_count(), 3);
    }

    #[tokio::test]
    async fn radius_query_is_nearest_first() {
        let catalog = InMemoryCatalog::seeded();
        let paris = GeoPoint::new(48.85, 2.35).unwrap();
        let near = catalog.talents_within_radius(paris, 50.0).await.unwrap();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].name, "Jean Dupont");
        assert_eq!(near[0].language_name, "French");

        let all = catalog.talents_within_radius(paris, 20_000.0).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[tokio::test]
    async fn created_talent_is_listed_first() {
        let catalog = InMemoryCatalog::seeded();
        let lang = catalog.list_talents().await.unwrap()[0].language_id.clone();
        let created = catalog
            .create_talent(NewTalent {
                name: "Ana".into(),
                language_id: lang,
                category_id: String::new(),
                accent: String::new(),
                description: String::new(),
                sample_url: String::new(),
                hourly_rate: 90.0,
                lat: -23.55,
                lng: -46.63,
                pattern: String::new(),
                emotion: String::new(),
                region: "South America".into(),
                time_slot: String::new(),
            })
            .await
            .unwrap();
        assert!(created.language.is_some());
        let listed = catalog.list_talents().await.unwrap();
        assert_eq!(listed[0].id, created.id);
        assert_eq!(catalog.talent_by_id(&created.id).await.unwrap().name, "Ana");
        assert!(matches!(
            catalog.talent_by_id("missing").await,
            Err(CatalogError::NotFound)
        ));
    }
}
