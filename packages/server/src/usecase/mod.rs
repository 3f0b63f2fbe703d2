//! UseCase 層
//!
//! 受信イベントごとに 1 つのユースケースを持つ。
//! Room を対象とするユースケースは、Room のロックを保持したまま
//! 状態の変更と通知を行う（Room 単位の FIFO）。

mod connect_client;
mod delete_message;
mod disconnect_client;
mod edit_message;
mod error;
mod join_conversation;
mod leave_conversation;
mod notify_typing;
mod react_to_message;
mod register_user;
mod room_query;
mod send_message;
mod update_member_display;
mod update_profile;
mod user_directory;

#[cfg(test)]
mod test_support;

pub use connect_client::ConnectClientUseCase;
pub use delete_message::DeleteMessageUseCase;
pub use disconnect_client::{DisconnectClientUseCase, DisconnectOutcome};
pub use edit_message::EditMessageUseCase;
pub use error::{
    DisconnectError, GetRoomDetailError, GetRoomsError, JoinConversationError,
    RegisterUserError, RoomEventError, SendMessageError, UpdateProfileError, UserDirectoryError,
};
pub use join_conversation::{JoinConversationUseCase, JoinOutcome};
pub use leave_conversation::{LeaveConversationUseCase, LeaveOutcome};
pub use notify_typing::NotifyTypingUseCase;
pub use react_to_message::ReactToMessageUseCase;
pub use register_user::RegisterUserUseCase;
pub use room_query::{GetRoomDetailUseCase, GetRoomsUseCase, RoomSnapshot};
pub use send_message::SendMessageUseCase;
pub use update_member_display::UpdateMemberDisplayUseCase;
pub use update_profile::UpdateProfileUseCase;
pub use user_directory::UserDirectoryUseCase;

use crate::domain::MessagePushError;

/// 既存の対象に対する操作の結果
///
/// 対象が存在しない場合はエラーではなく何もしない（`NotFound`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    NotFound,
}

/// 送信失敗はユースケースの失敗にせず、ログに残すだけにする
fn log_push_failure(result: Result<(), MessagePushError>, event: &str) {
    if let Err(e) = result {
        tracing::warn!("Failed to push '{}': {}", event, e);
    }
}
