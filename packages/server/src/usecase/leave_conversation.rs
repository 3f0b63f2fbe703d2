//! UseCase: Room からの退出

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConversationId, MessagePusher, Notification, Room, RoomRepository, Timestamp,
    UserId,
};

use super::{error::RoomEventError, log_push_failure};

/// 退出の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left,
    /// 参加していない（または別の接続に引き継がれている）
    NotMember,
}

/// Room 退出のユースケース
pub struct LeaveConversationUseCase {
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl LeaveConversationUseCase {
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

    /// `connection_id` が持つ `user_id` のメンバーシップを外し、残りのメンバーに通知する
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> Result<LeaveOutcome, RoomEventError> {
        let Some(shared) = self.room_repository.find(&conversation_id).await? else {
            tracing::debug!("Leave of unknown room '{}' ignored", conversation_id);
            return Ok(LeaveOutcome::NotMember);
        };
        let mut room = shared.lock().await;
        let now = Timestamp::new(self.clock.now_millis());

        if leave_room(
            &mut room,
            self.message_pusher.as_ref(),
            connection_id,
            &user_id,
            now,
        )
        .await
        {
            Ok(LeaveOutcome::Left)
        } else {
            tracing::debug!(
                "User '{}' is not a member of room '{}' on connection '{}'",
                user_id,
                conversation_id,
                connection_id
            );
            Ok(LeaveOutcome::NotMember)
        }
    }
}

/// Room のロックを保持した状態でメンバーシップを外し、`user_left` を通知する
///
/// メンバーシップが `connection_id` に紐付いていなければ何もしない。
/// 切断処理と共有しているため、二重に呼ばれても通知は 1 回だけになる。
pub(super) async fn leave_room(
    room: &mut Room,
    message_pusher: &dyn MessagePusher,
    connection_id: ConnectionId,
    user_id: &UserId,
    now: Timestamp,
) -> bool {
    if room.leave(user_id, connection_id).is_none() {
        return false;
    }
    tracing::info!("User '{}' left room '{}'", user_id, room.id);

    let result = message_pusher
        .broadcast(
            room.connections(),
            &Notification::MemberLeft {
                conversation_id: room.id.clone(),
                user_id: user_id.clone(),
                timestamp: now,
            },
        )
        .await;
    log_push_failure(result, "user_left");
    true
}
