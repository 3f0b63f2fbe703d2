//! UseCase: Room の参照（HTTP API 用）

use std::sync::Arc;

use crate::domain::{ConversationId, Room, RoomMembership, RoomRepository, Timestamp};

use super::error::{GetRoomDetailError, GetRoomsError};

/// Room の読み取り専用スナップショット
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub id: ConversationId,
    pub created_at: Timestamp,
    pub members: Vec<RoomMembership>,
    pub message_count: usize,
}

impl From<&Room> for RoomSnapshot {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            created_at: room.created_at,
            members: room.members(),
            message_count: room.history().len(),
        }
    }
}

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    room_repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(room_repository: Arc<dyn RoomRepository>) -> Self {
        Self { room_repository }
    }

    /// 全ての Room を ID 順で取得
    pub async fn execute(&self) -> Result<Vec<RoomSnapshot>, GetRoomsError> {
        let rooms = self.room_repository.all().await?;
        let mut snapshots = Vec::with_capacity(rooms.len());
        for shared in rooms {
            let room = shared.lock().await;
            snapshots.push(RoomSnapshot::from(&*room));
        }
        Ok(snapshots)
    }
}

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    room_repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(room_repository: Arc<dyn RoomRepository>) -> Self {
        Self { room_repository }
    }

    pub async fn execute(
        &self,
        conversation_id: ConversationId,
    ) -> Result<RoomSnapshot, GetRoomDetailError> {
        let shared = self
            .room_repository
            .find(&conversation_id)
            .await?
            .ok_or(GetRoomDetailError::RoomNotFound)?;
        let room = shared.lock().await;
        Ok(RoomSnapshot::from(&*room))
    }
}
