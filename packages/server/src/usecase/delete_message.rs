//! UseCase: メッセージ削除

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{DeleteRequest, MessagePusher, Notification, RoomRepository, Timestamp};

use super::{UpdateOutcome, error::RoomEventError, log_push_failure};

/// メッセージ削除のユースケース
pub struct DeleteMessageUseCase {
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DeleteMessageUseCase {
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

    /// 履歴からメッセージを削除し、Room 全体に通知する（存在しなければ何もしない）
    pub async fn execute(&self, request: DeleteRequest) -> Result<UpdateOutcome, RoomEventError> {
        let Some(shared) = self.room_repository.find(&request.conversation_id).await? else {
            return Ok(UpdateOutcome::NotFound);
        };
        let mut room = shared.lock().await;

        if room.history_mut().delete(&request.message_id).is_none() {
            tracing::debug!(
                "Delete of unknown message '{}' in room '{}' ignored",
                request.message_id,
                room.id
            );
            return Ok(UpdateOutcome::NotFound);
        }

        let result = self
            .message_pusher
            .broadcast(
                room.connections(),
                &Notification::MessageDeleted {
                    conversation_id: room.id.clone(),
                    message_id: request.message_id,
                    timestamp: Timestamp::new(self.clock.now_millis()),
                },
            )
            .await;
        log_push_failure(result, "message_deleted");

        Ok(UpdateOutcome::Applied)
    }
}
