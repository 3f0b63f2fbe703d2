//! Validated requests handed from the transport to the use cases.

use serde_json::Value;

use super::{
    entity::{DisplayMetadata, DisplayUpdate},
    value_object::{ConversationId, MessageId, UserId},
};

#[derive(Debug, Clone, PartialEq)]
pub struct JoinRequest {
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    pub display: DisplayMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub conversation_id: ConversationId,
    pub message_id: MessageId,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub conversation_id: ConversationId,
    pub message_id: MessageId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionRequest {
    pub conversation_id: ConversationId,
    pub message_id: MessageId,
    pub emoji: String,
    pub user_id: UserId,
    pub user_name: String,
}

/// Decoration a member can change from the client.
#[derive(Debug, Clone, PartialEq)]
pub enum DecorationUpdate {
    Frame(Value),
    NameEffect(Value),
}

impl From<DecorationUpdate> for DisplayUpdate {
    fn from(update: DecorationUpdate) -> Self {
        match update {
            DecorationUpdate::Frame(frame) => Self::Frame(frame),
            DecorationUpdate::NameEffect(effect) => Self::NameEffect(effect),
        }
    }
}

/// Frame or name-effect change of one member.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayUpdateRequest {
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    /// Name echoed in the notification; falls back to the stored display name
    pub user_name: Option<String>,
    pub update: DecorationUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdateRequest {
    pub user_id: UserId,
    pub name: Option<String>,
    pub avatar: Option<String>,
}
