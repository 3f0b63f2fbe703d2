//! UseCase: Room への参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinConversationUseCase::execute() メソッド
//! - メンバーシップの追加、履歴のリプレイ、参加通知
//!
//! ### なぜこのテストが必要か
//! - 履歴のリプレイは参加者本人にだけ届き、既存メンバーには参加通知だけが届くこと
//! - 参加者一覧には生存している接続だけが含まれること
//!
//! ### どのような状況を想定しているか
//! - 正常系：5 件の履歴がある Room への参加
//! - エッジケース：同じユーザーの再参加（重複しない）
//! - エッジケース：切断済みの接続が残っている Room への参加

use std::{collections::HashSet, sync::Arc};

use tsudoi_shared::time::Clock;

use crate::domain::{
    ConnectionId, JoinRequest, MessagePusher, Notification, RoomMembership, RoomRepository,
    Timestamp,
};

use super::{error::JoinConversationError, log_push_failure};

/// 参加の結果
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// 参加後のメンバー一覧（参加者本人を含む）
    pub members: Vec<RoomMembership>,
    /// リプレイしたメッセージ数
    pub replayed: usize,
    /// 切断済みとして除去したメンバー数
    pub pruned: usize,
}

/// Room 参加のユースケース
pub struct JoinConversationUseCase {
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    /// 参加時にリプレイする最大件数
    replay_limit: usize,
}

impl JoinConversationUseCase {
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        replay_limit: usize,
    ) -> Self {
        Self {
            room_repository,
            message_pusher,
            clock,
            replay_limit,
        }
    }

    /// Room に参加する（Room が無ければ作成）
    ///
    /// 1. メンバーシップを追加（同じユーザーなら上書き）
    /// 2. MessagePusher に登録されていない接続のメンバーシップを除去
    /// 3. 参加者本人に `active_users` と `conversation_history` を返す
    /// 4. 他のメンバーに `user_joined` を通知
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        request: JoinRequest,
    ) -> Result<JoinOutcome, JoinConversationError> {
        let now = Timestamp::new(self.clock.now_millis());
        let shared = self
            .room_repository
            .get_or_create(&request.conversation_id)
            .await?;
        let mut room = shared.lock().await;

        let membership = RoomMembership {
            conversation_id: request.conversation_id.clone(),
            user_id: request.user_id.clone(),
            display: request.display,
            socket_id: connection_id,
            joined_at: now,
        };
        if let Some(previous) = room.join(membership.clone()) {
            tracing::debug!(
                "User '{}' rejoined room '{}' (previous connection '{}')",
                membership.user_id,
                room.id,
                previous.socket_id
            );
        }

        // 2. 生存している接続だけを残す
        let mut live = HashSet::new();
        for connection in room.connections() {
            if self.message_pusher.is_registered(&connection).await {
                live.insert(connection);
            }
        }
        let pruned = room.prune_members(|member| live.contains(&member.socket_id));
        for stale in &pruned {
            tracing::debug!(
                "Pruned stale member '{}' from room '{}'",
                stale.user_id,
                room.id
            );
            let result = self
                .message_pusher
                .broadcast(
                    room.connections_except(connection_id),
                    &Notification::MemberLeft {
                        conversation_id: room.id.clone(),
                        user_id: stale.user_id.clone(),
                        timestamp: now,
                    },
                )
                .await;
            log_push_failure(result, "user_left");
        }

        // 3. 参加者本人への返信
        let members = room.members();
        let result = self
            .message_pusher
            .push_to(
                &connection_id,
                &Notification::ActiveUsers {
                    conversation_id: room.id.clone(),
                    members: members.clone(),
                },
            )
            .await;
        log_push_failure(result, "active_users");

        let messages = room.history().replay_tail(self.replay_limit);
        let replayed = messages.len();
        let result = self
            .message_pusher
            .push_to(
                &connection_id,
                &Notification::ConversationHistory {
                    conversation_id: room.id.clone(),
                    messages,
                },
            )
            .await;
        log_push_failure(result, "conversation_history");

        // 4. 他のメンバーへの参加通知
        let result = self
            .message_pusher
            .broadcast(
                room.connections_except(connection_id),
                &Notification::MemberJoined(membership),
            )
            .await;
        log_push_failure(result, "user_joined");

        tracing::info!(
            "User '{}' joined room '{}' ({} members, {} messages replayed)",
            request.user_id,
            room.id,
            members.len(),
            replayed
        );

        Ok(JoinOutcome {
            members,
            replayed,
            pruned: pruned.len(),
        })
    }
}
