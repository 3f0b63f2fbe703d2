//! MessagePusher trait 定義
//!
//! ユースケースが接続中のクライアントへ通知を届けるためのインターフェース。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Notification};

/// 接続ごとの送信キュー（容量付き）
pub type PusherChannel = mpsc::Sender<String>;

/// 通知の送信を抽象化する trait
///
/// `push_to` / `broadcast` はブロックしない。送信キューが溢れた接続は
/// 切断扱いとなり、登録が解除される。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除（存在しなくてもエラーにしない）
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 接続が登録されているか
    async fn is_registered(&self, connection_id: &ConnectionId) -> bool;

    /// 特定の接続に通知を送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続に通知を送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 全ての接続に通知を送信
    async fn broadcast_all(&self, notification: &Notification) -> Result<(), MessagePushError>;
}
