//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RepositoryError;

/// ユーザー登録のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterUserError {
    #[error("user registry unavailable: {0}")]
    Repository(#[from] RepositoryError),
}

/// ユーザー検索・一覧のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserDirectoryError {
    #[error("user registry unavailable: {0}")]
    Repository(#[from] RepositoryError),
}

/// Room 参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinConversationError {
    #[error("room store unavailable: {0}")]
    Repository(#[from] RepositoryError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("room store unavailable: {0}")]
    Repository(#[from] RepositoryError),
}

/// Room 内のイベント（退出・編集・削除・リアクション・入力中・表示更新）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomEventError {
    #[error("room store unavailable: {0}")]
    Repository(#[from] RepositoryError),
}

/// プロフィール更新のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateProfileError {
    #[error("repository unavailable: {0}")]
    Repository(#[from] RepositoryError),
}

/// 切断処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    #[error("repository unavailable: {0}")]
    Repository(#[from] RepositoryError),
}

/// Room 詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,

    #[error("room store unavailable: {0}")]
    Repository(#[from] RepositoryError),
}

/// Room 一覧取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomsError {
    #[error("room store unavailable: {0}")]
    Repository(#[from] RepositoryError),
}
