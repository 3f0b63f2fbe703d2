//! Room aggregate: membership table and history of one conversation.

use std::collections::HashMap;

use super::{
    entity::{DisplayUpdate, RoomMembership},
    history::ConversationHistory,
    value_object::{ConnectionId, ConversationId, Timestamp, UserId},
};

/// A conversation room.
///
/// Rooms are created lazily on first use and never torn down; history is
/// retained even when the last member leaves.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: ConversationId,
    pub created_at: Timestamp,
    members: HashMap<UserId, RoomMembership>,
    history: ConversationHistory,
}

impl Room {
    pub fn new(id: ConversationId, created_at: Timestamp, history_limit: usize) -> Self {
        Self {
            id,
            created_at,
            members: HashMap::new(),
            history: ConversationHistory::with_limit(history_limit),
        }
    }

    /// Insert or overwrite the membership of `membership.user_id`.
    ///
    /// Returns the membership that was replaced, if any. At most one
    /// connection is bound to a user per room.
    pub fn join(&mut self, membership: RoomMembership) -> Option<RoomMembership> {
        self.members.insert(membership.user_id.clone(), membership)
    }

    /// Remove the membership of `user_id` if it is still bound to `socket_id`.
    ///
    /// A membership taken over by a newer connection is left alone.
    pub fn leave(&mut self, user_id: &UserId, socket_id: ConnectionId) -> Option<RoomMembership> {
        let bound = self
            .members
            .get(user_id)
            .is_some_and(|member| member.socket_id == socket_id);
        if bound {
            self.members.remove(user_id)
        } else {
            None
        }
    }

    /// Drop every membership for which `is_live` returns `false`.
    pub fn prune_members(
        &mut self,
        mut is_live: impl FnMut(&RoomMembership) -> bool,
    ) -> Vec<RoomMembership> {
        let stale: Vec<UserId> = self
            .members
            .values()
            .filter(|m| !is_live(m))
            .map(|m| m.user_id.clone())
            .collect();
        stale
            .iter()
            .filter_map(|user_id| self.members.remove(user_id))
            .collect()
    }

    pub fn member(&self, user_id: &UserId) -> Option<&RoomMembership> {
        self.members.get(user_id)
    }

    /// Apply a display update to an existing member.
    pub fn update_display(
        &mut self,
        user_id: &UserId,
        update: &DisplayUpdate,
    ) -> Option<&RoomMembership> {
        let member = self.members.get_mut(user_id)?;
        update.apply(&mut member.display);
        Some(member)
    }

    /// Current members, sorted by user id for consistent ordering.
    pub fn members(&self) -> Vec<RoomMembership> {
        let mut members: Vec<RoomMembership> = self.members.values().cloned().collect();
        members.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Connections of every member.
    pub fn connections(&self) -> Vec<ConnectionId> {
        self.members.values().map(|m| m.socket_id).collect()
    }

    /// Connections of every member except `excluded`.
    pub fn connections_except(&self, excluded: ConnectionId) -> Vec<ConnectionId> {
        self.members
            .values()
            .map(|m| m.socket_id)
            .filter(|id| *id != excluded)
            .collect()
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ConversationHistory {
        &mut self.history
    }
}
