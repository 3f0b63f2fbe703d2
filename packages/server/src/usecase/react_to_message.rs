//! UseCase: リアクション
//!
//! リアクションはライブ配信のみで、履歴のメッセージには反映しない。
//! そのため参加後のリプレイにはリアクションが含まれない。

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{
    MessagePusher, Notification, ReactionEvent, ReactionRequest, RoomRepository, Timestamp,
};

use super::{UpdateOutcome, error::RoomEventError, log_push_failure};

/// リアクションのユースケース
pub struct ReactToMessageUseCase {
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ReactToMessageUseCase {
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

    /// リアクションを Room 全体に配信する
    ///
    /// 対象のメッセージが履歴にあるかどうかは確認しない。Room が存在しなければ何もしない。
    pub async fn execute(
        &self,
        request: ReactionRequest,
    ) -> Result<UpdateOutcome, RoomEventError> {
        let Some(shared) = self.room_repository.find(&request.conversation_id).await? else {
            tracing::debug!(
                "Reaction in unknown room '{}' ignored",
                request.conversation_id
            );
            return Ok(UpdateOutcome::NotFound);
        };
        let room = shared.lock().await;

        let event = ReactionEvent {
            conversation_id: request.conversation_id,
            message_id: request.message_id,
            emoji: request.emoji,
            user_id: request.user_id,
            user_name: request.user_name,
            timestamp: Timestamp::new(self.clock.now_millis()),
        };
        tracing::debug!(
            "User '{}' reacted {} to message '{}' in room '{}'",
            event.user_id,
            event.emoji,
            event.message_id,
            room.id
        );
        let result = self
            .message_pusher
            .broadcast(room.connections(), &Notification::ReactionApplied(event))
            .await;
        log_push_failure(result, "message_reaction");

        Ok(UpdateOutcome::Applied)
    }
}
