//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::RoomSummaryDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms with their occupants
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let occupancies = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = occupancies
        .into_iter()
        .map(|occupancy| RoomSummaryDto {
            room: occupancy.room.as_str().to_string(),
            users: occupancy
                .users
                .iter()
                .map(|name| name.as_str().to_string())
                .collect(),
        })
        .collect();

    Json(room_summaries)
}
