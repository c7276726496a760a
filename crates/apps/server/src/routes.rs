use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use catalog::{
    apply_filters, CatalogBackend, CatalogError, ChangeEvent, ChangeKind, NewTalent, RadiusQuery,
};
use foundation::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::changes::{serve_socket, ChangeHub};
use crate::payments::PaymentGateway;

const CURRENCY: &str = "usd";

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogBackend>,
    pub payments: Arc<dyn PaymentGateway>,
    pub changes: ChangeHub,
    pub publishable_key: Option<String>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/voice-talents", get(list_talents).post(create_talent))
        .route("/voice-talents/changes", get(change_socket))
        .route("/voice-talents/:id", get(get_talent))
        .route("/functions/v1/voice-talents", get(talents_within_radius))
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/init-data", post(init_data))
        .route("/payment-config", get(payment_config))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn error_json(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

/// Lists talents, bootstrapping an empty catalog once. A failed bootstrap
/// still answers with the (empty) list.
async fn list_talents(State(state): State<AppState>) -> Response {
    match list_or_bootstrap(&state).await {
        Ok(talents) => Json(talents).into_response(),
        Err(err) => {
            error!("failed to list talents: {err}");
            error_json(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching voice talents")
        }
    }
}

async fn list_or_bootstrap(state: &AppState) -> Result<Vec<catalog::Talent>, CatalogError> {
    let talents = state.catalog.list_talents().await?;
    if !talents.is_empty() {
        return Ok(talents);
    }
    info!("catalog empty, bootstrapping");
    if let Err(err) = state.catalog.initialize().await {
        warn!("bootstrap of empty catalog failed: {err}");
        return Ok(talents);
    }
    state
        .changes
        .publish(ChangeEvent::talents(ChangeKind::Insert, None));
    state.catalog.list_talents().await
}

async fn get_talent(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.catalog.talent_by_id(&id).await {
        Ok(talent) => Json(talent).into_response(),
        Err(CatalogError::NotFound) => error_json(StatusCode::NOT_FOUND, "Voice talent not found"),
        Err(err) => {
            error!(%id, "failed to fetch talent: {err}");
            error_json(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching voice talent")
        }
    }
}

async fn create_talent(State(state): State<AppState>, Json(new): Json<NewTalent>) -> Response {
    if GeoPoint::new(new.lat, new.lng).is_none() {
        return error_json(StatusCode::BAD_REQUEST, "Invalid coordinates");
    }
    if !new.hourly_rate.is_finite() || new.hourly_rate < 0.0 {
        return error_json(StatusCode::BAD_REQUEST, "Invalid hourly rate");
    }
    match state.catalog.create_talent(new).await {
        Ok(talent) => {
            state.changes.publish(ChangeEvent::talents(
                ChangeKind::Insert,
                Some(talent.id.clone()),
            ));
            (StatusCode::CREATED, Json(talent)).into_response()
        }
        Err(err) => {
            error!("failed to create talent: {err}");
            error_json(StatusCode::INTERNAL_SERVER_ERROR, "Error creating voice talent")
        }
    }
}

async fn talents_within_radius(
    State(state): State<AppState>,
    Query(query): Query<RadiusQuery>,
) -> Response {
    let center = match GeoPoint::new(query.lat, query.lng) {
        Some(c) => c,
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "invalid center" })),
            )
                .into_response()
        }
    };

    let hits = match state.catalog.talents_within_radius(center, query.radius).await {
        Ok(hits) => hits,
        Err(err) => {
            error!("radius query failed: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": err.to_string() })),
            )
                .into_response();
        }
    };

    let reviews = if query.min_rating > 0.0 {
        match state.catalog.reviews().await {
            Ok(reviews) => Some(reviews),
            Err(err) => {
                warn!("reviews unavailable, skipping rating filter: {err}");
                None
            }
        }
    } else {
        None
    };

    let data = apply_filters(hits, &query, reviews.as_deref());
    let mut resp = Json(json!({ "success": true, "data": data })).into_response();
    resp.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=60"),
    );
    resp
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntentBody {
    amount: u64,
    listing_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IntentReply {
    client_secret: String,
    payment_intent_id: String,
}

async fn create_payment_intent(
    State(state): State<AppState>,
    body: Result<Json<IntentBody>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!("bad payment intent request: {rejection}");
            return error_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create payment intent",
            );
        }
    };
    match state
        .payments
        .create_intent(body.amount, CURRENCY, &body.listing_id)
        .await
    {
        Ok(intent) => {
            info!(listing = %body.listing_id, intent = %intent.id, "payment intent created");
            Json(IntentReply {
                client_secret: intent.client_secret,
                payment_intent_id: intent.id,
            })
            .into_response()
        }
        Err(err) => {
            error!(listing = %body.listing_id, "payment intent failed: {err}");
            error_json(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create payment intent")
        }
    }
}

async fn init_data(State(state): State<AppState>) -> Response {
    match state.catalog.initialize().await {
        Ok(()) => {
            state
                .changes
                .publish(ChangeEvent::talents(ChangeKind::Insert, None));
            Json(json!({ "message": "Database initialized successfully" })).into_response()
        }
        Err(err) => {
            error!("bootstrap failed: {err}");
            error_json(StatusCode::INTERNAL_SERVER_ERROR, "Failed to initialize database")
        }
    }
}

async fn payment_config(State(state): State<AppState>) -> Response {
    Json(json!({ "publishableKey": state.publishable_key })).into_response()
}

async fn change_socket(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let events = state.changes.subscribe();
    debug!(subscribers = state.changes.subscriber_count(), "change socket requested");
    ws.on_upgrade(move |socket| serve_socket(socket, events))
}
