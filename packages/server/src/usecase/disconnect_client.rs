//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - プレゼンスのオフライン化と、参加中の全 Room からの退出
//!
//! ### なぜこのテストが必要か
//! - 切断処理は二重に実行されても安全でなければならない
//! - 残りのメンバーには `user_left` がちょうど 1 回だけ届くこと
//! - 別の接続で再登録したユーザーを古い接続の切断でオフラインにしないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 つの Room に参加中の接続の切断
//! - エッジケース：同じ接続の二重切断
//! - エッジケース：新しい接続に引き継がれた後の古い接続の切断

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConversationId, MessagePusher, Notification, RoomRepository, Timestamp, UserId,
    UserRepository,
};

use super::{error::DisconnectError, leave_conversation::leave_room, log_push_failure};

/// 切断処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectOutcome {
    /// この切断でオフラインになったユーザー
    pub went_offline: Option<UserId>,
    /// メンバーシップを外した Room
    pub left_rooms: Vec<ConversationId>,
}

/// 切断処理のユースケース
pub struct DisconnectClientUseCase {
    user_repository: Arc<dyn UserRepository>,
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectClientUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            room_repository,
            message_pusher,
            clock,
        }
    }

    /// 切断処理を実行
    ///
    /// 1. MessagePusher から接続の登録を解除
    /// 2. 接続が代表しているユーザーをオフラインにし、全員に通知
    /// 3. 参加中の Room から 1 つずつ退出し、残りのメンバーに通知
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 切断された接続
    /// * `joined` - 接続が参加していた Room と、その Room でのユーザー
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        joined: Vec<(ConversationId, UserId)>,
    ) -> Result<DisconnectOutcome, DisconnectError> {
        self.message_pusher.unregister_client(&connection_id).await;
        let now = Timestamp::new(self.clock.now_millis());

        // 1. プレゼンス（レジストリのロックは Room のロックと同時に持たない）
        let offline = self.user_repository.mark_offline(connection_id, now).await?;
        if let Some(user) = &offline {
            tracing::info!("User '{}' is now offline", user.id);
            let result = self
                .message_pusher
                .broadcast_all(&Notification::UserStatusChanged {
                    user_id: user.id.clone(),
                    status: user.status,
                    last_seen: user.last_seen,
                })
                .await;
            log_push_failure(result, "user_status_update");
        }

        // 2. メンバーシップ
        let mut left_rooms = Vec::new();
        for (conversation_id, user_id) in joined {
            let Some(shared) = self.room_repository.find(&conversation_id).await? else {
                continue;
            };
            let mut room = shared.lock().await;
            if leave_room(
                &mut room,
                self.message_pusher.as_ref(),
                connection_id,
                &user_id,
                now,
            )
            .await
            {
                left_rooms.push(conversation_id);
            }
        }

        tracing::info!(
            "Connection '{}' closed (left {} room(s))",
            connection_id,
            left_rooms.len()
        );

        Ok(DisconnectOutcome {
            went_offline: offline.map(|user| user.id),
            left_rooms,
        })
    }
}
