//! HTTP routes.
//!
//! | Method | Path | Answer |
//! |---|---|---|
//! | GET | `{prefix}/names` | names from the direct load-balanced call; errors become 502/503 |
//! | GET | `{prefix}/feign-names` | names from the declarative client; falls back to `["This","is","fallback"]` |

use crate::client::ReservationsClient;
use crate::model::{Reservation, Resources};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use reservation_client_core::ClientError;
use reservation_client_discovery::LoadBalancedClient;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Everything a request handler needs, built once at startup and shared read-only.
#[derive(Clone)]
pub struct AppState {
    rest: LoadBalancedClient,
    reservations_uri: String,
    client: Arc<dyn ReservationsClient>,
}

impl AppState {
    /// `reservations_uri` is the logical URI `names` calls, e.g.
    /// `http://reservationservice/reservations`.
    pub fn new(
        rest: LoadBalancedClient,
        reservations_uri: impl Into<String>,
        client: Arc<dyn ReservationsClient>,
    ) -> Self {
        Self {
            rest,
            reservations_uri: reservations_uri.into(),
            client,
        }
    }
}

/// Builds the route table, with both endpoints under `prefix` (may be empty).
pub fn router(state: AppState, prefix: &str) -> Router {
    let prefix = normalize_prefix(prefix);

    Router::new()
        .route(&format!("{}/names", prefix), get(names))
        .route(&format!("{}/feign-names", prefix), get(feign_names))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `""`, `"/"` map to no prefix; `"client/"` maps to `"/client"`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

async fn names(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    tracing::info!("Calling names...");

    // An absent or null body is answered with an empty list rather than an error.
    let reservations = state
        .rest
        .get_json::<Resources<Reservation>>(&state.reservations_uri)
        .await?
        .unwrap_or_default();

    Ok(Json(reservations.names()))
}

async fn feign_names(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    tracing::info!("Calling feign-names...");

    let reservations = state.client.find_all().await?;
    Ok(Json(reservations.names()))
}

/// A [`ClientError`] that ended a request.
#[derive(Debug)]
pub struct ApiError(pub ClientError);

impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        tracing::error!(error = %self.0, status = status.as_u16(), "request failed");

        (
            status,
            Json(serde_json::json!({
                "error": self.0.to_string(),
                "kind": self.0.kind(),
            })),
        )
            .into_response()
    }
}
