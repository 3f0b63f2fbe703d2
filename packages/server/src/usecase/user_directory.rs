//! UseCase: ユーザー検索・一覧
//!
//! 結果は要求した接続にだけ返す（ブロードキャストしない）。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Notification, PhoneNumber, User, UserRepository};

use super::{error::UserDirectoryError, log_push_failure};

/// ユーザー検索・一覧のユースケース
pub struct UserDirectoryUseCase {
    user_repository: Arc<dyn UserRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl UserDirectoryUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            user_repository,
            message_pusher,
        }
    }

    /// 電話番号でユーザーを検索し、結果（見つからなければ null）を要求元に返す
    pub async fn search(
        &self,
        requester: ConnectionId,
        phone_number: PhoneNumber,
    ) -> Result<Option<User>, UserDirectoryError> {
        let user = self
            .user_repository
            .find_by_phone_number(&phone_number)
            .await?;
        tracing::debug!(
            "Phone number search from '{}': found={}",
            requester,
            user.is_some()
        );

        let result = self
            .message_pusher
            .push_to(&requester, &Notification::SearchUserResult(user.clone()))
            .await;
        log_push_failure(result, "search_user_result");
        Ok(user)
    }

    /// 全ユーザーを要求元に返す
    pub async fn list(&self, requester: ConnectionId) -> Result<usize, UserDirectoryError> {
        let users = self.user_repository.all().await?;
        let count = users.len();
        let result = self
            .message_pusher
            .push_to(&requester, &Notification::AllUsers(users))
            .await;
        log_push_failure(result, "all_users");
        Ok(count)
    }

    /// 全ユーザーを取得（HTTP API 用）
    pub async fn all_users(&self) -> Result<Vec<User>, UserDirectoryError> {
        Ok(self.user_repository.all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Timestamp, UserRegistration},
        infrastructure::{
            dto::websocket::ServerEvent, message_pusher::WebSocketMessagePusher,
            repository::InMemoryUserRepository,
        },
        usecase::test_support::{TestClient, user_id},
    };

    async fn seeded_users() -> Arc<InMemoryUserRepository> {
        let users = Arc::new(InMemoryUserRepository::new());
        for (id, phone) in [("bob", "+1 (555) 010-0200"), ("alice", "555-0100")] {
            users
                .register(
                    UserRegistration {
                        user_id: user_id(id),
                        phone_number: Some(PhoneNumber::new(phone.to_string()).unwrap()),
                        name: id.to_string(),
                        avatar_url: String::new(),
                    },
                    ConnectionId::generate(),
                    Timestamp::new(1),
                )
                .await
                .unwrap();
        }
        users
    }

    #[tokio::test]
    async fn test_search_replies_to_requester_only() {
        // テスト項目: 正規化した電話番号で検索でき、結果は要求元にだけ届く
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = UserDirectoryUseCase::new(seeded_users().await, pusher.clone());
        let mut requester = TestClient::connect(&pusher).await;
        let mut bystander = TestClient::connect(&pusher).await;

        // when (操作):
        let found = usecase
            .search(
                requester.connection_id,
                PhoneNumber::new("+15550100200".to_string()).unwrap(),
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(found.map(|u| u.id), Some(user_id("bob")));
        let events = requester.drain();
        assert!(matches!(
            events.as_slice(),
            [ServerEvent::SearchUserResult(r)] if r.user.as_ref().is_some_and(|u| u.id == "bob")
        ));
        assert!(bystander.drain().is_empty());
    }

    #[tokio::test]
    async fn test_search_miss_replies_null() {
        // テスト項目: 見つからない場合は user: null が返される
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = UserDirectoryUseCase::new(seeded_users().await, pusher.clone());
        let mut requester = TestClient::connect(&pusher).await;

        // when (操作):
        let found = usecase
            .search(
                requester.connection_id,
                PhoneNumber::new("000".to_string()).unwrap(),
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert!(found.is_none());
        assert!(matches!(
            requester.drain().as_slice(),
            [ServerEvent::SearchUserResult(r)] if r.user.is_none()
        ));
    }

    #[tokio::test]
    async fn test_list_returns_all_users_sorted() {
        // テスト項目: 全ユーザーが ID 順で要求元に返される
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = UserDirectoryUseCase::new(seeded_users().await, pusher.clone());
        let mut requester = TestClient::connect(&pusher).await;

        // when (操作):
        let count = usecase.list(requester.connection_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(count, 2);
        let events = requester.drain();
        let [ServerEvent::AllUsers(users)] = events.as_slice() else {
            panic!("unexpected events: {events:?}");
        };
        let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "bob"]);
    }
}
