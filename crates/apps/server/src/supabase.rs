//! Talent catalog backed by a hosted PostgREST API.

use std::time::Duration;

use catalog::seed;
use catalog::{
    BoxFuture, CatalogBackend, CatalogError, Language, NearbyTalent, NewTalent, Review, Talent,
    VoiceCategory,
};
use foundation::GeoPoint;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

const TALENT_SELECT: &str = "*,language:languages(*),category:voice_categories(*)";

pub struct SupabaseCatalog {
    base_url: String,
    anon_key: String,
    service_key: String,
    http: reqwest::Client,
}

impl SupabaseCatalog {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        service_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            service_key: service_key.into(),
            http: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    fn public(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    fn admin(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let req = self.public(self.http.get(self.rest_url(table)).query(query));
        send(req).await
    }

    async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        rows: &B,
        admin: bool,
    ) -> Result<T, CatalogError> {
        let req = self
            .http
            .post(self.rest_url(table))
            .query(&[("select", select)])
            .header("Prefer", "return=representation")
            .json(rows);
        let req = if admin { self.admin(req) } else { self.public(req) };
        send(req).await
    }

    async fn list(&self) -> Result<Vec<Talent>, CatalogError> {
        self.select(
            "voice_talents",
            &[("select", TALENT_SELECT), ("order", "created_at.desc")],
        )
        .await
    }

    async fn bootstrap(&self) -> Result<(), CatalogError> {
        let languages: Vec<_> = seed::LANGUAGES
            .iter()
            .map(|l| json!({"name": l.name, "code": l.code}))
            .collect();
        let languages: Vec<Language> = self
            .insert("languages", "*", &languages, true)
            .await
            .map_err(bootstrap_err("languages"))?;

        let categories: Vec<_> = seed::CATEGORIES
            .iter()
            .map(|c| json!({"name": c.name, "description": c.description}))
            .collect();
        let categories: Vec<VoiceCategory> = self
            .insert("voice_categories", "*", &categories, true)
            .await
            .map_err(bootstrap_err("voice_categories"))?;

        let talents: Vec<_> = seed::TALENTS
            .iter()
            .map(|t| {
                let language_id = languages.iter().find(|l| l.name == t.language).map(|l| &l.id);
                let category_id = categories.iter().find(|c| c.name == t.category).map(|c| &c.id);
                json!({
                    "name": t.name,
                    "language_id": language_id,
                    "category_id": category_id,
                    "accent": t.accent,
                    "description": t.description,
                    "sample_url": t.sample_url,
                    "hourly_rate": t.hourly_rate,
                    "lat": t.lat,
                    "lng": t.lng,
                    "pattern": t.pattern,
                    "emotion": t.emotion,
                    "region": t.region,
                    "timeSlot": t.time_slot,
                })
            })
            .collect();
        let inserted: Vec<Talent> = self
            .insert("voice_talents", TALENT_SELECT, &talents, true)
            .await
            .map_err(bootstrap_err("voice_talents"))?;
        info!(talents = inserted.len(), "catalog bootstrapped");
        Ok(())
    }
}

fn bootstrap_err(table: &'static str) -> impl Fn(CatalogError) -> CatalogError {
    move |err| CatalogError::Bootstrap(format!("{table}: {err}"))
}

async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, CatalogError> {
    let resp = req
        .send()
        .await
        .map_err(|e| CatalogError::Transport(e.to_string()))?;
    let status = resp.status();
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| CatalogError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(CatalogError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    serde_json::from_slice(&bytes).map_err(|e| CatalogError::Decode(e.to_string()))
}

impl CatalogBackend for SupabaseCatalog {
    fn list_talents(&self) -> BoxFuture<'_, Result<Vec<Talent>, CatalogError>> {
        Box::pin(self.list())
    }

    fn talent_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Talent, CatalogError>> {
        Box::pin(async move {
            let filter = format!("eq.{id}");
            let rows: Vec<Talent> = self
                .select(
                    "voice_talents",
                    &[("select", TALENT_SELECT), ("id", filter.as_str())],
                )
                .await?;
            rows.into_iter().next().ok_or(CatalogError::NotFound)
        })
    }

    fn create_talent(&self, talent: NewTalent) -> BoxFuture<'_, Result<Talent, CatalogError>> {
        Box::pin(async move {
            let rows: Vec<Talent> = self.insert("voice_talents", TALENT_SELECT, &talent, false).await?;
            rows.into_iter()
                .next()
                .ok_or_else(|| CatalogError::Decode("insert returned no rows".into()))
        })
    }

    fn initialize(&self) -> BoxFuture<'_, Result<(), CatalogError>> {
        Box::pin(self.bootstrap())
    }

    fn talents_within_radius(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> BoxFuture<'_, Result<Vec<NearbyTalent>, CatalogError>> {
        Box::pin(async move {
            debug!(?center, radius_km, "radius query");
            let req = self
                .http
                .post(self.rest_url("rpc/find_voice_talents_within_radius"))
                .json(&json!({
                    "center_lat": center.lat,
                    "center_lng": center.lng,
                    "radius_km": radius_km,
                }));
            send(self.public(req)).await
        })
    }

    fn reviews(&self) -> BoxFuture<'_, Result<Vec<Review>, CatalogError>> {
        Box::pin(self.select("reviews", &[("select", "voice_talent_id,rating")]))
    }
}
