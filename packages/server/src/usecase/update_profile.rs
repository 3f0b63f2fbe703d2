//! UseCase: プロフィール更新
//!
//! 接続レジストリを更新してから（ロックを解放してから）、
//! その接続が参加している Room のメンバーシップを 1 つずつ更新する。

use std::sync::Arc;

use crate::domain::{
    ConversationId, DisplayUpdate, MessagePusher, Notification, ProfileUpdateRequest,
    RoomRepository, UserRepository,
};

use super::{UpdateOutcome, error::UpdateProfileError, log_push_failure};

/// プロフィール更新のユースケース
pub struct UpdateProfileUseCase {
    user_repository: Arc<dyn UserRepository>,
    room_repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl UpdateProfileUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            user_repository,
            room_repository,
            message_pusher,
        }
    }

    /// プロフィールを更新し、全員に `user_profile_updated` を通知する
    ///
    /// # Arguments
    ///
    /// * `request` - 更新内容（指定されたフィールドだけを上書き）
    /// * `joined` - 更新する接続が参加している Room
    pub async fn execute(
        &self,
        request: ProfileUpdateRequest,
        joined: Vec<ConversationId>,
    ) -> Result<UpdateOutcome, UpdateProfileError> {
        let Some(user) = self
            .user_repository
            .update_profile(&request.user_id, request.name.clone(), request.avatar.clone())
            .await?
        else {
            tracing::debug!("Profile update for unknown user '{}' ignored", request.user_id);
            return Ok(UpdateOutcome::NotFound);
        };

        let update = DisplayUpdate::Profile {
            name: request.name,
            avatar: request.avatar,
        };
        for conversation_id in joined {
            let Some(shared) = self.room_repository.find(&conversation_id).await? else {
                continue;
            };
            let mut room = shared.lock().await;
            room.update_display(&user.id, &update);
        }

        tracing::info!("User '{}' updated profile", user.id);
        let result = self
            .message_pusher
            .broadcast_all(&Notification::UserProfileUpdated {
                user_id: user.id,
                name: user.name,
                avatar_url: user.avatar_url,
            })
            .await;
        log_push_failure(result, "user_profile_updated");

        Ok(UpdateOutcome::Applied)
    }
}
