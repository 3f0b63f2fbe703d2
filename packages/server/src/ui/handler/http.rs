//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tsudoi_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{ConversationId, Timestamp},
    infrastructure::dto::http::{
        HealthDto, MemberDetailDto, RoomDetailDto, RoomSummaryDto, UserSummaryDto,
    },
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

fn rfc3339(timestamp: Timestamp) -> String {
    timestamp_to_rfc3339(timestamp.value()).unwrap_or_default()
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto::ok())
}

/// Get list of rooms
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomSummaryDto>>, StatusCode> {
    let rooms = state.get_rooms_usecase.execute().await.map_err(|e| {
        tracing::error!("Failed to get rooms: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    // Domain Model から DTO への変換
    let summaries = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            id: room.id.as_str().to_string(),
            members: room
                .members
                .iter()
                .map(|m| m.user_id.as_str().to_string())
                .collect(),
            message_count: room.message_count,
            created_at: rfc3339(room.created_at),
        })
        .collect();

    Ok(Json(summaries))
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let conversation_id =
        ConversationId::new(conversation_id).map_err(|_| StatusCode::NOT_FOUND)?;

    match state.get_room_detail_usecase.execute(conversation_id).await {
        Ok(room) => {
            // Domain Model から DTO への変換
            let detail = RoomDetailDto {
                id: room.id.as_str().to_string(),
                members: room
                    .members
                    .iter()
                    .map(|m| MemberDetailDto {
                        user_id: m.user_id.as_str().to_string(),
                        user_name: m.display.user_name.clone(),
                        joined_at: rfc3339(m.joined_at),
                    })
                    .collect(),
                message_count: room.message_count,
                created_at: rfc3339(room.created_at),
            };
            Ok(Json(detail))
        }
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(GetRoomDetailError::Repository(e)) => {
            tracing::error!("Failed to get room detail: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get every registered user
pub async fn get_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserSummaryDto>>, StatusCode> {
    let users = state
        .user_directory_usecase
        .all_users()
        .await
        .map_err(|e| {
            tracing::error!("Failed to get users: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(
        users
            .into_iter()
            .map(|user| UserSummaryDto {
                id: user.id.as_str().to_string(),
                name: user.name,
                status: user.status.as_str().to_string(),
                last_seen: rfc3339(user.last_seen),
            })
            .collect(),
    ))
}
