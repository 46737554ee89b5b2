//! Participation registry routes

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;
use common::models::{ParticipationSetting, ParticipationUpdate};

/// Get an owner's participation setting, defaulting to all-false without
/// creating a row
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(owner_user_id): Path<Uuid>,
) -> ApiResult<Json<ParticipationSetting>> {
    let setting = db::participation::get(&state.pool, owner_user_id).await?;
    Ok(Json(setting))
}

/// Update an owner's participation setting
///
/// Opting out forces both visibility flags off in the same write.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(owner_user_id): Path<Uuid>,
    Json(update): Json<ParticipationUpdate>,
) -> ApiResult<Json<ParticipationSetting>> {
    let setting = db::participation::set(&state.pool, owner_user_id, &update).await?;
    Ok(Json(setting))
}
