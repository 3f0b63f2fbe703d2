//! WebSocket event DTOs.
//!
//! Every frame is a JSON envelope `{"event": "<name>", "data": <payload>}`.
//! Inbound payload fields are optional at this level so that a frame with a
//! missing field still parses; required fields are checked when converting
//! into domain types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ========================================
// Inbound (client → server)
// ========================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    RegisterUser(RegisterUserPayload),
    SearchUser(SearchUserPayload),
    GetAllUsers,
    JoinConversation(JoinConversationPayload),
    LeaveConversation(LeaveConversationPayload),
    SendMessage(SendMessagePayload),
    EditMessage(EditMessagePayload),
    DeleteMessage(DeleteMessagePayload),
    ReactToMessage(ReactToMessagePayload),
    Typing(TypingPayload),
    UpdateUserFrame(UpdateUserFramePayload),
    UpdateUserNameEffect(UpdateUserNameEffectPayload),
    UpdateProfile(UpdateProfilePayload),
}

impl ClientEvent {
    /// Wire name of the event, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterUser(_) => "register_user",
            Self::SearchUser(_) => "search_user",
            Self::GetAllUsers => "get_all_users",
            Self::JoinConversation(_) => "join_conversation",
            Self::LeaveConversation(_) => "leave_conversation",
            Self::SendMessage(_) => "send_message",
            Self::EditMessage(_) => "edit_message",
            Self::DeleteMessage(_) => "delete_message",
            Self::ReactToMessage(_) => "react_to_message",
            Self::Typing(_) => "typing",
            Self::UpdateUserFrame(_) => "update_user_frame",
            Self::UpdateUserNameEffect(_) => "update_user_name_effect",
            Self::UpdateProfile(_) => "update_profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterUserPayload {
    pub user_id: Option<String>,
    pub phone_number: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchUserPayload {
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JoinConversationPayload {
    pub conversation_id: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_avatar: Option<String>,
    pub user_frame: Option<Value>,
    pub user_name_effect: Option<Value>,
    pub user_status: Option<String>,
    pub is_premium_subscriber: Option<bool>,
}

/// `leave_conversation` carries either the bare conversation id or an object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LeaveConversationPayload {
    Id(String),
    Object(LeaveConversationObject),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeaveConversationObject {
    pub conversation_id: Option<String>,
}

/// Timestamp supplied by a client: epoch milliseconds or an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ClientTimestamp {
    Millis(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub id: Option<String>,
    pub conversation_id: Option<String>,
    pub sender_id: Option<String>,
    pub sender_name: Option<String>,
    pub sender_avatar: Option<String>,
    pub content: Option<String>,
    pub timestamp: Option<ClientTimestamp>,
    pub reply_to: Option<String>,
    pub reactions: Vec<ReactionDto>,
    pub attachments: Vec<AttachmentPayload>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttachmentPayload {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
    pub name: Option<String>,
    pub size: Option<u64>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditMessagePayload {
    pub message_id: Option<String>,
    pub content: Option<String>,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteMessagePayload {
    pub message_id: Option<String>,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReactToMessagePayload {
    pub message_id: Option<String>,
    pub emoji: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypingPayload {
    pub conversation_id: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub is_typing: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserFramePayload {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub frame_config: Option<Value>,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserNameEffectPayload {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub name_effect: Option<Value>,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

// ========================================
// Outbound (server → client)
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    UserRegistered(UserDto),
    UserStatusUpdate(UserStatusDto),
    UserProfileUpdated(UserProfileDto),
    SearchUserResult(SearchUserResultDto),
    AllUsers(Vec<UserDto>),
    ActiveUsers(ActiveUsersDto),
    ConversationHistory(ConversationHistoryDto),
    UserJoined(MemberDto),
    UserLeft(UserLeftDto),
    ReceiveMessage(MessageDto),
    MessageEdited(MessageEditedDto),
    MessageDeleted(MessageDeletedDto),
    MessageReaction(MessageReactionDto),
    UserTyping(UserTypingDto),
    UserFrameUpdated(UserFrameUpdatedDto),
    UserNameEffectUpdated(UserNameEffectUpdatedDto),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub phone_number: Option<String>,
    pub name: String,
    pub avatar_url: String,
    pub status: String,
    pub last_seen: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusDto {
    pub user_id: String,
    pub status: String,
    pub last_seen: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub user_id: String,
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchUserResultDto {
    pub user: Option<UserDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub conversation_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_avatar: String,
    pub user_frame: Option<Value>,
    pub user_name_effect: Option<Value>,
    pub user_status: Option<String>,
    pub is_premium_subscriber: bool,
    pub joined_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUsersDto {
    pub conversation_id: String,
    pub users: Vec<MemberDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationHistoryDto {
    pub conversation_id: String,
    pub messages: Vec<MessageDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftDto {
    pub conversation_id: String,
    pub user_id: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReactionDto {
    pub emoji: String,
    pub user_ids: Vec<String>,
    pub user_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDto {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub name: Option<String>,
    pub size: Option<u64>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_avatar: String,
    pub content: String,
    pub timestamp: i64,
    pub status: String,
    pub reply_to: Option<String>,
    pub reactions: Vec<ReactionDto>,
    pub edited: bool,
    pub attachments: Vec<AttachmentDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEditedDto {
    pub conversation_id: String,
    pub message_id: String,
    pub content: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDeletedDto {
    pub conversation_id: String,
    pub message_id: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReactionDto {
    pub conversation_id: String,
    pub message_id: String,
    pub emoji: String,
    pub user_id: String,
    pub user_name: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypingDto {
    pub conversation_id: String,
    pub user_id: String,
    pub user_name: Option<String>,
    pub is_typing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFrameUpdatedDto {
    pub conversation_id: String,
    pub user_id: String,
    pub user_name: String,
    pub frame_config: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNameEffectUpdatedDto {
    pub conversation_id: String,
    pub user_id: String,
    pub user_name: String,
    pub name_effect: Value,
}
