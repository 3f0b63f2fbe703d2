//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（`PusherChannel`）を管理
//! - 通知を JSON にエンコードしてキューに積む（push_to, broadcast, broadcast_all）
//!
//! ## バックプレッシャー
//!
//! キューは容量付きで、送信は `try_send` で行うため送信側がブロックされることはない。
//! キューが溢れた接続は登録を解除する。送信側がいなくなると接続の書き込みタスクが
//! 終了し、通常の切断処理が走る（disconnect-on-overflow）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, Notification, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// 接続ごとの送信キューのデフォルト容量
pub const DEFAULT_OUTBOUND_BUFFER: usize = 256;

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(notification: &Notification) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(notification))
            .map_err(|e| MessagePushError::Encode(e.to_string()))
    }

    /// キューに積む。失敗した場合は登録を解除すべきかどうかをエラーで返す。
    fn enqueue(
        connection_id: &ConnectionId,
        sender: &PusherChannel,
        payload: String,
    ) -> Result<(), MessagePushError> {
        sender.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::QueueFull(connection_id.to_string()),
            TrySendError::Closed(_) => MessagePushError::Closed(connection_id.to_string()),
        })
    }

    fn drop_clients(
        clients: &mut HashMap<ConnectionId, PusherChannel>,
        failed: Vec<(ConnectionId, MessagePushError)>,
    ) {
        for (connection_id, error) in failed {
            tracing::warn!(
                "Dropping connection '{}' from MessagePusher: {}",
                connection_id,
                error
            );
            clients.remove(&connection_id);
        }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
        }
    }

    async fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        let clients = self.clients.lock().await;
        clients.contains_key(connection_id)
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let payload = Self::encode(notification)?;
        let mut clients = self.clients.lock().await;

        let Some(sender) = clients.get(connection_id) else {
            return Err(MessagePushError::ClientNotFound(connection_id.to_string()));
        };
        if let Err(e) = Self::enqueue(connection_id, sender, payload) {
            Self::drop_clients(&mut clients, vec![(*connection_id, e.clone())]);
            return Err(e);
        }
        tracing::debug!("Pushed notification to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        if targets.is_empty() {
            return Ok(());
        }
        let payload = Self::encode(notification)?;
        let mut clients = self.clients.lock().await;

        // ブロードキャストでは一部の送信失敗を許容
        let mut failed = Vec::new();
        for target in targets {
            match clients.get(&target) {
                Some(sender) => {
                    if let Err(e) = Self::enqueue(&target, sender, payload.clone()) {
                        failed.push((target, e));
                    }
                }
                None => {
                    tracing::debug!("Connection '{}' not found during broadcast, skipping", target);
                }
            }
        }
        Self::drop_clients(&mut clients, failed);
        Ok(())
    }

    async fn broadcast_all(&self, notification: &Notification) -> Result<(), MessagePushError> {
        let payload = Self::encode(notification)?;
        let mut clients = self.clients.lock().await;

        let failed: Vec<(ConnectionId, MessagePushError)> = clients
            .iter()
            .filter_map(|(id, sender)| {
                Self::enqueue(id, sender, payload.clone())
                    .err()
                    .map(|e| (*id, e))
            })
            .collect();
        Self::drop_clients(&mut clients, failed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Timestamp, UserId, UserStatus};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信
    // - broadcast / broadcast_all: 複数接続への送信
    // - キューが溢れた接続の登録解除（disconnect-on-overflow）
    // ========================================

    fn status_notification() -> Notification {
        Notification::UserStatusChanged {
            user_id: UserId::new("alice".to_string()).unwrap(),
            status: UserStatus::Online,
            last_seen: Timestamp::new(1000),
        }
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続に JSON エンコードされた通知が届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::channel(8);
        let connection = ConnectionId::generate();
        pusher.register_client(connection, tx).await;

        // when (操作):
        let result = pusher.push_to(&connection, &status_notification()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let received = rx.recv().await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&received).unwrap();
        assert_eq!(json["event"], "user_status_update");
        assert_eq!(json["data"]["userId"], "alice");
        assert_eq!(json["data"]["status"], "online");
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher
            .push_to(&ConnectionId::generate(), &status_notification())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_broadcast_partial_targets() {
        // テスト項目: 対象のうち登録済みの接続にだけ届き、未登録の接続は無視される
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::channel(8);
        let (tx2, mut rx2) = mpsc::channel(8);
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        pusher.register_client(alice, tx1).await;
        pusher.register_client(bob, tx2).await;

        // when (操作):
        let result = pusher
            .broadcast(vec![alice, ConnectionId::generate()], &status_notification())
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(rx1.recv().await.is_some());
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_all_reaches_everyone() {
        // テスト項目: broadcast_all は全接続に届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::channel(8);
        let (tx2, mut rx2) = mpsc::channel(8);
        pusher.register_client(ConnectionId::generate(), tx1).await;
        pusher.register_client(ConnectionId::generate(), tx2).await;

        // when (操作):
        pusher.broadcast_all(&status_notification()).await.unwrap();

        // then (期待する結果):
        assert!(rx1.recv().await.is_some());
        assert!(rx2.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_overflowing_client_is_dropped() {
        // テスト項目: キューが溢れた接続は登録解除され、送信側がブロックされない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (slow_tx, mut slow_rx) = mpsc::channel(1);
        let (fast_tx, mut fast_rx) = mpsc::channel(8);
        let slow = ConnectionId::generate();
        let fast = ConnectionId::generate();
        pusher.register_client(slow, slow_tx).await;
        pusher.register_client(fast, fast_tx).await;

        // when (操作): slow は受信しないまま 2 件送る
        pusher
            .broadcast(vec![slow, fast], &status_notification())
            .await
            .unwrap();
        pusher
            .broadcast(vec![slow, fast], &status_notification())
            .await
            .unwrap();

        // then (期待する結果):
        assert!(!pusher.is_registered(&slow).await);
        assert!(pusher.is_registered(&fast).await);
        assert!(fast_rx.recv().await.is_some());
        assert!(fast_rx.recv().await.is_some());
        // 積まれていた 1 件の後、キューは閉じられる
        assert!(slow_rx.recv().await.is_some());
        assert!(slow_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_unregister_client() {
        // テスト項目: 登録解除後は送信対象にならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::channel(8);
        let connection = ConnectionId::generate();
        pusher.register_client(connection, tx).await;

        // when (操作):
        pusher.unregister_client(&connection).await;
        pusher.unregister_client(&connection).await;

        // then (期待する結果):
        assert!(!pusher.is_registered(&connection).await);
        assert!(matches!(
            pusher.push_to(&connection, &status_notification()).await,
            Err(MessagePushError::ClientNotFound(_))
        ));
    }
}
