//! Outbound notifications produced by the use cases.
//!
//! The transport adapter decides how each notification is encoded on the wire.

use serde_json::Value;

use super::{
    entity::{Message, ReactionEvent, RoomMembership, TypingEvent, User, UserStatus},
    value_object::{ConversationId, MessageId, Timestamp, UserId},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A user id was registered for the first time
    UserRegistered(User),
    UserStatusChanged {
        user_id: UserId,
        status: UserStatus,
        last_seen: Timestamp,
    },
    UserProfileUpdated {
        user_id: UserId,
        name: String,
        avatar_url: String,
    },
    /// Direct reply to a phone number search
    SearchUserResult(Option<User>),
    /// Direct reply listing every known user
    AllUsers(Vec<User>),
    /// Direct reply to a joining connection
    ActiveUsers {
        conversation_id: ConversationId,
        members: Vec<RoomMembership>,
    },
    /// Direct reply to a joining connection
    ConversationHistory {
        conversation_id: ConversationId,
        messages: Vec<Message>,
    },
    MemberJoined(RoomMembership),
    MemberLeft {
        conversation_id: ConversationId,
        user_id: UserId,
        timestamp: Timestamp,
    },
    MessageReceived(Message),
    MessageEdited {
        conversation_id: ConversationId,
        message_id: MessageId,
        content: String,
        timestamp: Timestamp,
    },
    MessageDeleted {
        conversation_id: ConversationId,
        message_id: MessageId,
        timestamp: Timestamp,
    },
    ReactionApplied(ReactionEvent),
    Typing(TypingEvent),
    FrameUpdated {
        conversation_id: ConversationId,
        user_id: UserId,
        user_name: String,
        frame_config: Value,
    },
    NameEffectUpdated {
        conversation_id: ConversationId,
        user_id: UserId,
        user_name: String,
        name_effect: Value,
    },
}
