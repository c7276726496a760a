use std::future::Future;
use std::pin::Pin;

use foundation::GeoPoint;
use thiserror::Error;

use crate::model::Talent;
use crate::radius::{NearbyTalent, Review};

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog transport error: {0}")]
    Transport(String),
    #[error("catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("catalog payload could not be decoded: {0}")]
    Decode(String),
    #[error("catalog bootstrap failed: {0}")]
    Bootstrap(String),
    #[error("catalog entry not found")]
    NotFound,
}

/// Read side of the talent catalog, as seen by the globe.
///
/// Methods return boxed futures for dyn-compatibility.
pub trait CatalogSource: Send + Sync {
    fn fetch_talents(&self) -> BoxFuture<'_, Result<Vec<Talent>, CatalogError>>;
}

/// Fields accepted when creating a talent.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NewTalent {
    pub name: String,
    pub language_id: String,
    pub category_id: String,
    #[serde(default)]
    pub accent: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sample_url: String,
    pub hourly_rate: f64,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, rename = "timeSlot")]
    pub time_slot: String,
}

/// Full catalog backend used by the API server.
pub trait CatalogBackend: Send + Sync {
    /// All talents with joined language and category, newest first.
    fn list_talents(&self) -> BoxFuture<'_, Result<Vec<Talent>, CatalogError>>;

    fn talent_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Talent, CatalogError>>;

    fn create_talent(&self, talent: NewTalent) -> BoxFuture<'_, Result<Talent, CatalogError>>;

    /// Seeds languages, categories and sample talents. Not idempotent.
    fn initialize(&self) -> BoxFuture<'_, Result<(), CatalogError>>;

    /// Spatial query: talents within `radius_km` of `center`, nearest first.
    fn talents_within_radius(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> BoxFuture<'_, Result<Vec<NearbyTalent>, CatalogError>>;

    fn reviews(&self) -> BoxFuture<'_, Result<Vec<Review>, CatalogError>>;
}
