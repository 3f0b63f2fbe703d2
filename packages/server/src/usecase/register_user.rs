//! UseCase: ユーザー登録（接続レジストリ・プレゼンス）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterUserUseCase::execute() メソッド
//! - 登録・再登録時のグローバル通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：初回登録で `user_registered` と `user_status_update` が全員に届く
//! - エッジケース：オンラインのままの再登録では通知しない
//! - エッジケース：オフラインからの再登録で `user_status_update` のみ届く
//! - エッジケース：同じ接続で別ユーザーとして登録し直すと、元のユーザーのオフラインが届く

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, Notification, RegistrationOutcome, Timestamp, UserRegistration,
    UserRepository,
};

use super::{error::RegisterUserError, log_push_failure};

/// ユーザー登録のユースケース
pub struct RegisterUserUseCase {
    user_repository: Arc<dyn UserRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl RegisterUserUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            message_pusher,
            clock,
        }
    }

    /// ユーザーを登録（既存なら上書き）し、接続をそのユーザーに紐付ける
    ///
    /// # Returns
    ///
    /// * `Ok(RegistrationOutcome)` - 登録後のユーザーと状態変化の有無
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        registration: UserRegistration,
    ) -> Result<RegistrationOutcome, RegisterUserError> {
        let now = Timestamp::new(self.clock.now_millis());
        let outcome = self
            .user_repository
            .register(registration, connection_id, now)
            .await?;

        tracing::info!(
            "User '{}' registered on connection '{}'",
            outcome.user.id,
            connection_id
        );

        if let Some(released) = &outcome.released {
            tracing::info!(
                "Connection '{}' no longer represents user '{}'",
                connection_id,
                released.id
            );
            let result = self
                .message_pusher
                .broadcast_all(&Notification::UserStatusChanged {
                    user_id: released.id.clone(),
                    status: released.status,
                    last_seen: released.last_seen,
                })
                .await;
            log_push_failure(result, "user_status_update");
        }
        if outcome.created {
            let result = self
                .message_pusher
                .broadcast_all(&Notification::UserRegistered(outcome.user.clone()))
                .await;
            log_push_failure(result, "user_registered");
        }
        if outcome.status_changed {
            let result = self
                .message_pusher
                .broadcast_all(&Notification::UserStatusChanged {
                    user_id: outcome.user.id.clone(),
                    status: outcome.user.status,
                    last_seen: outcome.user.last_seen,
                })
                .await;
            log_push_failure(result, "user_status_update");
        }

        Ok(outcome)
    }
}
