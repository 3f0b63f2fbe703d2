//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    ConnectionId, ConversationId, PhoneNumber, RepositoryError, Room, Timestamp, User, UserId,
    UserRegistration,
};

/// Room ごとの直列化ポイント
///
/// 同じ Room への変更と通知はこのロックを保持したまま行う。
/// 異なる Room 同士は互いをブロックしない。
pub type SharedRoom = Arc<Mutex<Room>>;

/// Room Repository trait
///
/// Room は初回アクセス時に暗黙的に作成され、削除されない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を取得（存在しなければ作成）
    async fn get_or_create(&self, id: &ConversationId) -> Result<SharedRoom, RepositoryError>;

    /// Room を取得（存在しなければ None）
    async fn find(&self, id: &ConversationId) -> Result<Option<SharedRoom>, RepositoryError>;

    /// 全ての Room を ID 順で取得
    async fn all(&self) -> Result<Vec<SharedRoom>, RepositoryError>;
}

/// ユーザー登録の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    /// 登録後のユーザー
    pub user: User,
    /// 初めて登録されたユーザーか
    pub created: bool,
    /// 状態（オンライン/オフライン）が変化したか
    pub status_changed: bool,
    /// この接続が以前は別のユーザーを表していた場合、そのユーザー（オフライン化済み）
    pub released: Option<User>,
}

/// User Repository trait（接続レジストリ兼プレゼンス）
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを登録（既存なら上書き）し、オンラインにする
    async fn register(
        &self,
        registration: UserRegistration,
        connection: ConnectionId,
        now: Timestamp,
    ) -> Result<RegistrationOutcome, RepositoryError>;

    async fn find(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// 正規化済み電話番号で検索（同じ番号が複数あれば最後に登録されたもの）
    async fn find_by_phone_number(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Option<User>, RepositoryError>;

    /// 全ユーザーを ID 順で取得
    async fn all(&self) -> Result<Vec<User>, RepositoryError>;

    /// プロフィールを更新（存在しなければ None）
    async fn update_profile(
        &self,
        id: &UserId,
        name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<Option<User>, RepositoryError>;

    /// 接続を持つユーザーをオフラインにする
    ///
    /// オフラインに変化したユーザーを返す。該当なし・既にオフラインなら None。
    async fn mark_offline(
        &self,
        connection: ConnectionId,
        now: Timestamp,
    ) -> Result<Option<User>, RepositoryError>;
}
