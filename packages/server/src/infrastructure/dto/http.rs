//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Response of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

impl HealthDto {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Room summary for list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    /// User ids of the current members
    pub members: Vec<String>,
    pub message_count: usize,
    pub created_at: String, // RFC 3339 (UTC)
}

/// Room detail for detail endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<MemberDetailDto>,
    pub message_count: usize,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDetailDto {
    pub user_id: String,
    pub user_name: String,
    pub joined_at: String,
}

/// Registered user for `GET /api/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummaryDto {
    pub id: String,
    pub name: String,
    pub status: String,
    pub last_seen: String,
}
