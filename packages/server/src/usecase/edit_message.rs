//! UseCase: メッセージ編集
//!
//! 本文と `edited` だけを書き換える。存在しない ID への編集は何もしない。

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{EditRequest, MessagePusher, Notification, RoomRepository, Timestamp};

use super::{UpdateOutcome, error::RoomEventError, log_push_failure};

/// メッセージ編集のユースケース
pub struct EditMessageUseCase {
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl EditMessageUseCase {
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            room_repository,
            message_pusher,
            clock,
        }
    }

    pub async fn execute(&self, request: EditRequest) -> Result<UpdateOutcome, RoomEventError> {
        let Some(shared) = self.room_repository.find(&request.conversation_id).await? else {
            tracing::debug!(
                "Edit of message '{}' in unknown room '{}' ignored",
                request.message_id,
                request.conversation_id
            );
            return Ok(UpdateOutcome::NotFound);
        };
        let mut room = shared.lock().await;

        let edited = room
            .history_mut()
            .edit_content(&request.message_id, request.content)
            .map(|message| message.content.clone());
        let Some(content) = edited else {
            tracing::debug!(
                "Edit of unknown message '{}' in room '{}' ignored",
                request.message_id,
                room.id
            );
            return Ok(UpdateOutcome::NotFound);
        };

        let result = self
            .message_pusher
            .broadcast(
                room.connections(),
                &Notification::MessageEdited {
                    conversation_id: room.id.clone(),
                    message_id: request.message_id,
                    content,
                    timestamp: Timestamp::new(self.clock.now_millis()),
                },
            )
            .await;
        log_push_failure(result, "message_edited");

        Ok(UpdateOutcome::Applied)
    }
}
