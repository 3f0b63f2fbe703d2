//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロックの粒度
//!
//! `rooms` のロックは Room の検索・作成の間だけ保持します。
//! Room の中身の変更は Room ごとのロック（`SharedRoom`）で直列化されるため、
//! 異なる Room への操作は互いをブロックしません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tsudoi_shared::time::Clock;

use crate::domain::{ConversationId, RepositoryError, Room, RoomRepository, SharedRoom, Timestamp};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// ConversationId → Room
    rooms: Mutex<HashMap<ConversationId, SharedRoom>>,
    /// 新しい Room の履歴上限
    history_limit: usize,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(history_limit: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            history_limit,
            clock,
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn get_or_create(&self, id: &ConversationId) -> Result<SharedRoom, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.entry(id.clone()).or_insert_with(|| {
            tracing::info!("Room '{}' created", id);
            Arc::new(Mutex::new(Room::new(
                id.clone(),
                Timestamp::new(self.clock.now_millis()),
                self.history_limit,
            )))
        });
        Ok(Arc::clone(room))
    }

    async fn find(&self, id: &ConversationId) -> Result<Option<SharedRoom>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(id).cloned())
    }

    async fn all(&self) -> Result<Vec<SharedRoom>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        let mut entries: Vec<(&ConversationId, &SharedRoom)> = rooms.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Ok(entries.into_iter().map(|(_, room)| Arc::clone(room)).collect())
    }
}
