//! ユースケースのテスト用ヘルパー

use std::sync::Arc;

use tokio::sync::mpsc;
use tsudoi_shared::time::{Clock, FixedClock};

use crate::{
    domain::{
        ConnectionId, ConversationId, DisplayMetadata, JoinRequest, MessageDraft, MessageId,
        MessagePusher, RoomRepository, UserId,
    },
    infrastructure::{
        dto::websocket::ServerEvent, message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
};

pub const NOW: i64 = 1_700_000_000_000;

pub fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(NOW))
}

pub fn room_repository() -> Arc<InMemoryRoomRepository> {
    Arc::new(InMemoryRoomRepository::new(1000, clock()))
}

pub fn user_id(value: &str) -> UserId {
    UserId::new(value.to_string()).unwrap()
}

pub fn conversation_id(value: &str) -> ConversationId {
    ConversationId::new(value.to_string()).unwrap()
}

pub fn message_id(value: &str) -> MessageId {
    MessageId::new(value.to_string()).unwrap()
}

pub fn join_request(room: &str, user: &str) -> JoinRequest {
    JoinRequest {
        conversation_id: conversation_id(room),
        user_id: user_id(user),
        display: DisplayMetadata {
            user_name: user.to_string(),
            ..Default::default()
        },
    }
}

pub fn draft(room: &str, id: &str, sender: &str, content: &str) -> MessageDraft {
    MessageDraft {
        id: message_id(id),
        conversation_id: conversation_id(room),
        sender_id: user_id(sender),
        sender_name: sender.to_string(),
        sender_avatar: String::new(),
        content: content.to_string(),
        timestamp: None,
        reply_to: None,
        reactions: Vec::new(),
        attachments: Vec::new(),
    }
}

/// 実際の WebSocketMessagePusher に登録されたテスト用クライアント
pub struct TestClient {
    pub connection_id: ConnectionId,
    receiver: mpsc::Receiver<String>,
}

impl TestClient {
    pub async fn connect(pusher: &Arc<WebSocketMessagePusher>) -> Self {
        let (tx, receiver) = mpsc::channel(64);
        let connection_id = ConnectionId::generate();
        pusher.register_client(connection_id, tx).await;
        Self {
            connection_id,
            receiver,
        }
    }

    /// 届いているイベントを全て取り出す
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(json) = self.receiver.try_recv() {
            events.push(serde_json::from_str(&json).unwrap());
        }
        events
    }
}

/// Room に現在のメッセージ件数を問い合わせる
pub async fn history_len(repository: &InMemoryRoomRepository, room: &str) -> usize {
    let shared = repository
        .find(&conversation_id(room))
        .await
        .unwrap()
        .unwrap();
    let room = shared.lock().await;
    room.history().len()
}
