//! UseCase: 入力中通知

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Notification, RoomRepository, TypingEvent};

use super::{UpdateOutcome, error::RoomEventError, log_push_failure};

/// 入力中通知のユースケース
pub struct NotifyTypingUseCase {
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl NotifyTypingUseCase {
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            room_repository,
            message_pusher,
        }
    }

    /// 入力中の状態を、入力している接続以外の Room メンバーに配信する
    pub async fn execute(
        &self,
        from: ConnectionId,
        event: TypingEvent,
    ) -> Result<UpdateOutcome, RoomEventError> {
        let Some(shared) = self.room_repository.find(&event.conversation_id).await? else {
            return Ok(UpdateOutcome::NotFound);
        };
        let room = shared.lock().await;

        let result = self
            .message_pusher
            .broadcast(room.connections_except(from), &Notification::Typing(event))
            .await;
        log_push_failure(result, "user_typing");

        Ok(UpdateOutcome::Applied)
    }
}
