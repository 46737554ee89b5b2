//! Activity event ingest

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::signature::verify_signature;
use crate::state::AppState;
use common::models::Tier;
use engine::ActivityEvent;

#[derive(Deserialize)]
pub struct EventRequest {
    pub organization_id: Uuid,
    #[serde(flatten)]
    pub event: ActivityEvent,
}

#[derive(Serialize)]
pub struct EventResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Tier>,
}

/// Ingest one signed activity event from the commerce platform
///
/// The body is read raw so the HMAC covers exactly the delivered bytes.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<EventResponse>> {
    if let Some(secret) = &state.config.event_secret {
        let signature = headers
            .get("x-signature-256")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        if !verify_signature(signature, secret, &body) {
            return Err(ApiError::Unauthorized);
        }
    }

    let request: EventRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    let change = engine::handle_event(
        &state.pool,
        &state.notifier,
        request.organization_id,
        request.event,
        state.local_today(),
    )
    .await?;

    Ok(Json(EventResponse {
        status: change.status(),
        from: change.from_tier(),
        to: change.to_tier(),
    }))
}
