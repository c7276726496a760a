//! HTTP access to the talent API.

use std::time::Duration;

use catalog::{BoxFuture, CatalogError, CatalogSource, Talent};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON client bound to one API base URL. Every request carries a timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let resp = self.http.get(&url).send().await?;
        decode(resp).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        let resp = self.http.post(&url).json(body).send().await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Talent catalog read over `GET {base}/voice-talents`.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: ApiClient,
}

impl HttpCatalog {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl CatalogSource for HttpCatalog {
    fn fetch_talents(&self) -> BoxFuture<'_, Result<Vec<Talent>, CatalogError>> {
        Box::pin(async move {
            self.client
                .get_json::<Vec<Talent>>("voice-talents")
                .await
                .map_err(CatalogError::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn url_joins_without_double_slashes() {
        let c = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(c.url("/voice-talents"), "http://localhost:8080/voice-talents");
    }

    #[tokio::test]
    async fn fetches_talent_list() {
        let app = Router::new().route(
            "/voice-talents",
            get(|| async {
                axum::Json(serde_json::json!([
                    {"id": "t1", "name": "A", "hourly_rate": 10.0, "lat": 1.0, "lng": 2.0, "timeSlot": "Night"}
                ]))
            }),
        );
        let base = serve(app).await;
        let catalog = HttpCatalog::new(ApiClient::new(base).unwrap());
        let talents = catalog.fetch_talents().await.unwrap();
        assert_eq!(talents.len(), 1);
        assert_eq!(talents[0].time_slot, "Night");
    }

    #[tokio::test]
    async fn error_status_maps_to_catalog_error() {
        let app = Router::new().route(
            "/voice-talents",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "nope") }),
        );
        let base = serve(app).await;
        let catalog = HttpCatalog::new(ApiClient::new(base).unwrap());
        let err = catalog.fetch_talents().await.unwrap_err();
        assert_eq!(
            err,
            CatalogError::Status {
                status: 500,
                body: "nope".into()
            }
        );
    }
}
