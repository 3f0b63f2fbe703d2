//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 履歴への追加と Room 全体（送信者を含む）へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信されたメッセージは必ず `sent` として配信される
//! - 同じ ID の再送は履歴を増やさずに置き換える
//! - 異なる Room 同士は互いに影響しない
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人の Room での送信
//! - エッジケース：同じ ID の再送
//! - エッジケース：別の Room のメンバーには届かない

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{
    AppendOutcome, ConnectionId, Message, MessageDraft, MessagePusher, Notification,
    RoomRepository, Timestamp,
};

use super::{error::SendMessageError, log_push_failure};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    room_repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
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

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信元の接続
    /// * `draft` - クライアントから受け取ったメッセージ
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 履歴に保存され配信されたメッセージ（status は `sent`）
    /// * `Err(SendMessageError)` - 送信失敗
    pub async fn execute(
        &self,
        from: ConnectionId,
        draft: MessageDraft,
    ) -> Result<Message, SendMessageError> {
        let message = draft.into_message(Timestamp::new(self.clock.now_millis()));

        let shared = self
            .room_repository
            .get_or_create(&message.conversation_id)
            .await?;
        let mut room = shared.lock().await;

        // 1. 履歴に追加
        match room.history_mut().append(message.clone()) {
            AppendOutcome::Replaced => tracing::debug!(
                "Message '{}' re-delivered to room '{}', replaced in place",
                message.id,
                room.id
            ),
            AppendOutcome::Appended { evicted } if evicted > 0 => tracing::debug!(
                "Room '{}' history full, evicted {} oldest message(s)",
                room.id,
                evicted
            ),
            AppendOutcome::Appended { .. } => {}
        }

        // 2. 送信者を含む Room 全体にブロードキャスト
        let targets = room.connections();
        tracing::debug!(
            "Message '{}' from connection '{}' fanned out to {} connection(s) in room '{}'",
            message.id,
            from,
            targets.len(),
            room.id
        );
        let result = self
            .message_pusher
            .broadcast(targets, &Notification::MessageReceived(message.clone()))
            .await;
        log_push_failure(result, "receive_message");

        Ok(message)
    }
}
