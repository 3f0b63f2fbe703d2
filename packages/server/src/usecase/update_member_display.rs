//! UseCase: メンバーの表示情報（フレーム・名前エフェクト）の更新
//!
//! 更新者自身の他のタブも揃うように、更新者を含む Room 全体に配信する。

use std::sync::Arc;

use crate::domain::{
    DecorationUpdate, DisplayUpdate, DisplayUpdateRequest, MessagePusher, Notification,
    RoomRepository,
};

use super::{UpdateOutcome, error::RoomEventError, log_push_failure};

/// 表示情報更新のユースケース
pub struct UpdateMemberDisplayUseCase {
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl UpdateMemberDisplayUseCase {
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            room_repository,
            message_pusher,
        }
    }

    /// メンバーシップの表示情報を更新する。参加していなければ何もしない。
    pub async fn execute(
        &self,
        request: DisplayUpdateRequest,
    ) -> Result<UpdateOutcome, RoomEventError> {
        let Some(shared) = self.room_repository.find(&request.conversation_id).await? else {
            return Ok(UpdateOutcome::NotFound);
        };
        let mut room = shared.lock().await;

        let update = DisplayUpdate::from(request.update.clone());
        let Some(member) = room.update_display(&request.user_id, &update) else {
            tracing::debug!(
                "Display update for non-member '{}' in room '{}' ignored",
                request.user_id,
                request.conversation_id
            );
            return Ok(UpdateOutcome::NotFound);
        };
        let user_name = request
            .user_name
            .unwrap_or_else(|| member.display.user_name.clone());

        let (notification, event) = match request.update {
            DecorationUpdate::Frame(frame_config) => (
                Notification::FrameUpdated {
                    conversation_id: request.conversation_id,
                    user_id: request.user_id,
                    user_name,
                    frame_config,
                },
                "user_frame_updated",
            ),
            DecorationUpdate::NameEffect(name_effect) => (
                Notification::NameEffectUpdated {
                    conversation_id: request.conversation_id,
                    user_id: request.user_id,
                    user_name,
                    name_effect,
                },
                "user_name_effect_updated",
            ),
        };

        let result = self
            .message_pusher
            .broadcast(room.connections(), &notification)
            .await;
        log_push_failure(result, event);

        Ok(UpdateOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::{dto::websocket::ServerEvent, message_pusher::WebSocketMessagePusher},
        usecase::{
            JoinConversationUseCase,
            test_support::{
                TestClient, clock, conversation_id, join_request, room_repository, user_id,
            },
        },
    };
    use serde_json::json;

    fn frame_update(user: &str) -> DisplayUpdateRequest {
        DisplayUpdateRequest {
            conversation_id: conversation_id("r1"),
            user_id: user_id(user),
            user_name: None,
            update: DecorationUpdate::Frame(json!({"style": "neon"})),
        }
    }

    #[tokio::test]
    async fn test_frame_update_reaches_whole_room() {
        // テスト項目: フレーム更新は保存され、更新者を含む Room 全体に届く
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let rooms = room_repository();
        let join = JoinConversationUseCase::new(rooms.clone(), pusher.clone(), clock(), 100);
        let usecase = UpdateMemberDisplayUseCase::new(rooms.clone(), pusher.clone());
        let mut alice = TestClient::connect(&pusher).await;
        let mut bob = TestClient::connect(&pusher).await;
        join.execute(alice.connection_id, join_request("r1", "alice"))
            .await
            .unwrap();
        join.execute(bob.connection_id, join_request("r1", "bob"))
            .await
            .unwrap();
        alice.drain();
        bob.drain();

        // when (操作):
        let outcome = usecase.execute(frame_update("alice")).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome, UpdateOutcome::Applied);
        for client in [&mut alice, &mut bob] {
            let events = client.drain();
            assert!(matches!(
                events.as_slice(),
                [ServerEvent::UserFrameUpdated(f)]
                    if f.user_id == "alice" && f.user_name == "alice" && f.frame_config == json!({"style": "neon"})
            ));
        }
        let shared = rooms.find(&conversation_id("r1")).await.unwrap().unwrap();
        let room = shared.lock().await;
        let member = room.member(&user_id("alice")).unwrap();
        assert_eq!(member.display.frame_config, Some(json!({"style": "neon"})));
    }

    #[tokio::test]
    async fn test_name_effect_update_is_always_broadcast() {
        // テスト項目: 名前エフェクトの更新は Applied なら必ず配信され、名前やアバターは変わらない
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let rooms = room_repository();
        let usecase = UpdateMemberDisplayUseCase::new(rooms.clone(), pusher.clone());
        let mut alice = TestClient::connect(&pusher).await;
        JoinConversationUseCase::new(rooms.clone(), pusher.clone(), clock(), 100)
            .execute(alice.connection_id, join_request("r1", "alice"))
            .await
            .unwrap();
        alice.drain();
        let mut request = frame_update("alice");
        request.user_name = Some("Alice*".to_string());
        request.update = DecorationUpdate::NameEffect(json!({"glow": true}));

        // when (操作):
        let outcome = usecase.execute(request).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome, UpdateOutcome::Applied);
        assert!(matches!(
            alice.drain().as_slice(),
            [ServerEvent::UserNameEffectUpdated(e)]
                if e.user_name == "Alice*" && e.name_effect == json!({"glow": true})
        ));
        let shared = rooms.find(&conversation_id("r1")).await.unwrap().unwrap();
        let room = shared.lock().await;
        let member = room.member(&user_id("alice")).unwrap();
        assert_eq!(member.display.name_effect, Some(json!({"glow": true})));
        assert_eq!(member.display.user_name, "alice");
    }

    #[tokio::test]
    async fn test_update_for_non_member_is_noop() {
        // テスト項目: 参加していないユーザーの更新は何も配信しない
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let rooms = room_repository();
        let usecase = UpdateMemberDisplayUseCase::new(rooms.clone(), pusher.clone());
        let mut alice = TestClient::connect(&pusher).await;
        JoinConversationUseCase::new(rooms.clone(), pusher.clone(), clock(), 100)
            .execute(alice.connection_id, join_request("r1", "alice"))
            .await
            .unwrap();
        alice.drain();
        let mut request = frame_update("stranger");
        request.update = DecorationUpdate::NameEffect(json!({"glow": true}));

        // when (操作):
        let outcome = usecase.execute(request).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome, UpdateOutcome::NotFound);
        assert!(alice.drain().is_empty());
    }
}
