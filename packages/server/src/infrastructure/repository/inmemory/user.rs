//! InMemory User Repository 実装
//!
//! 接続レジストリとプレゼンスを兼ねる。ユーザーは削除されず、
//! 切断時にオフラインになるだけです。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, PhoneNumber, RegistrationOutcome, RepositoryError, Timestamp, User, UserId,
    UserRegistration, UserRepository,
};

#[derive(Default)]
struct Registry {
    users: HashMap<UserId, User>,
    /// 正規化済み電話番号 → 最後にその番号で登録したユーザー
    by_phone: HashMap<PhoneNumber, UserId>,
    /// 接続 → その接続で登録したユーザー
    by_connection: HashMap<ConnectionId, UserId>,
}

/// インメモリ User Repository 実装
#[derive(Default)]
pub struct InMemoryUserRepository {
    registry: Mutex<Registry>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn register(
        &self,
        registration: UserRegistration,
        connection: ConnectionId,
        now: Timestamp,
    ) -> Result<RegistrationOutcome, RepositoryError> {
        let mut registry = self.registry.lock().await;
        let user_id = registration.user_id.clone();

        // 接続が別のユーザーに付け替えられる場合、元のユーザーはこの接続を失う
        let previous = registry.by_connection.get(&connection).cloned();
        let released = match previous {
            Some(previous) if previous != user_id => registry
                .users
                .get_mut(&previous)
                .filter(|user| user.connection == Some(connection))
                .map(|user| {
                    user.disconnect(connection, now);
                    user.clone()
                }),
            _ => None,
        };

        let (user, created, status_changed) = match registry.users.get_mut(&user_id) {
            Some(user) => {
                let status_changed = user.reregister(registration, connection, now);
                (user.clone(), false, status_changed)
            }
            None => {
                let user = User::register(registration, connection, now);
                registry.users.insert(user_id.clone(), user.clone());
                (user, true, true)
            }
        };

        if let Some(phone) = &user.phone_number {
            registry.by_phone.insert(phone.clone(), user_id.clone());
        }
        registry.by_connection.insert(connection, user_id);

        Ok(RegistrationOutcome {
            user,
            created,
            status_changed,
            released,
        })
    }

    async fn find(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let registry = self.registry.lock().await;
        Ok(registry.users.get(id).cloned())
    }

    async fn find_by_phone_number(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Option<User>, RepositoryError> {
        let registry = self.registry.lock().await;
        let user = registry
            .by_phone
            .get(phone_number)
            .and_then(|id| registry.users.get(id))
            // the indexed user may have re-registered with another number since
            .filter(|user| user.phone_number.as_ref() == Some(phone_number))
            .cloned();
        Ok(user)
    }

    async fn all(&self) -> Result<Vec<User>, RepositoryError> {
        let registry = self.registry.lock().await;
        let mut users: Vec<User> = registry.users.values().cloned().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(users)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<Option<User>, RepositoryError> {
        let mut registry = self.registry.lock().await;
        Ok(registry.users.get_mut(id).map(|user| {
            user.update_profile(name, avatar_url);
            user.clone()
        }))
    }

    async fn mark_offline(
        &self,
        connection: ConnectionId,
        now: Timestamp,
    ) -> Result<Option<User>, RepositoryError> {
        let mut registry = self.registry.lock().await;
        let Some(user_id) = registry.by_connection.remove(&connection) else {
            return Ok(None);
        };
        let Some(user) = registry.users.get_mut(&user_id) else {
            return Ok(None);
        };
        if user.disconnect(connection, now) {
            Ok(Some(user.clone()))
        } else {
            Ok(None)
        }
    }
}
