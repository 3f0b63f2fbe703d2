//! Entities of the messaging domain.

use serde_json::Value;

use super::value_object::{ConnectionId, ConversationId, MessageId, PhoneNumber, Timestamp, UserId};

/// Presence status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Online,
    Offline,
    Away,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Away => "away",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(Self::Online),
            "offline" => Some(Self::Offline),
            "away" => Some(Self::Away),
            _ => None,
        }
    }
}

/// Data announced by a client when it registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistration {
    pub user_id: UserId,
    pub phone_number: Option<PhoneNumber>,
    pub name: String,
    pub avatar_url: String,
}

/// A user known to the connection registry.
///
/// Users are never deleted; a disconnect only marks them offline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub phone_number: Option<PhoneNumber>,
    pub name: String,
    pub avatar_url: String,
    pub status: UserStatus,
    pub last_seen: Timestamp,
    /// The live connection currently representing this user
    pub connection: Option<ConnectionId>,
}

impl User {
    /// Create a user from its first registration. The user starts online.
    pub fn register(
        registration: UserRegistration,
        connection: ConnectionId,
        now: Timestamp,
    ) -> Self {
        Self {
            id: registration.user_id,
            phone_number: registration.phone_number,
            name: registration.name,
            avatar_url: registration.avatar_url,
            status: UserStatus::Online,
            last_seen: now,
            connection: Some(connection),
        }
    }

    /// Overwrite profile fields from a repeated registration and move the
    /// liveness pointer to `connection`.
    ///
    /// Returns `true` when the status changed.
    pub fn reregister(
        &mut self,
        registration: UserRegistration,
        connection: ConnectionId,
        now: Timestamp,
    ) -> bool {
        if registration.phone_number.is_some() {
            self.phone_number = registration.phone_number;
        }
        self.name = registration.name;
        self.avatar_url = registration.avatar_url;
        self.last_seen = now;
        self.connection = Some(connection);

        let changed = self.status != UserStatus::Online;
        self.status = UserStatus::Online;
        changed
    }

    /// Mark the user offline if `connection` is the one currently
    /// representing it.
    ///
    /// Returns `true` when the user went offline. A connection that was
    /// superseded by a newer registration does not affect the user.
    pub fn disconnect(&mut self, connection: ConnectionId, now: Timestamp) -> bool {
        if self.connection != Some(connection) {
            return false;
        }
        self.connection = None;
        self.last_seen = now;
        self.status = UserStatus::Offline;
        true
    }

    pub fn update_profile(&mut self, name: Option<String>, avatar_url: Option<String>) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(avatar_url) = avatar_url {
            self.avatar_url = avatar_url;
        }
    }
}

/// Display data a member shows inside a room.
///
/// `frame_config` and `name_effect` are decorative payloads the server stores
/// and forwards without interpreting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayMetadata {
    pub user_name: String,
    pub user_avatar: String,
    pub frame_config: Option<Value>,
    pub name_effect: Option<Value>,
    pub user_status: Option<UserStatus>,
    pub is_premium_subscriber: bool,
}

/// A change to a member's display data.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayUpdate {
    Frame(Value),
    NameEffect(Value),
    Profile {
        name: Option<String>,
        avatar: Option<String>,
    },
}

impl DisplayUpdate {
    pub fn apply(&self, display: &mut DisplayMetadata) {
        match self {
            Self::Frame(frame) => display.frame_config = Some(frame.clone()),
            Self::NameEffect(effect) => display.name_effect = Some(effect.clone()),
            Self::Profile { name, avatar } => {
                if let Some(name) = name {
                    display.user_name = name.clone();
                }
                if let Some(avatar) = avatar {
                    display.user_avatar = avatar.clone();
                }
            }
        }
    }
}

/// One user's presence inside one room, bound to the connection that joined.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomMembership {
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    pub display: DisplayMetadata,
    pub socket_id: ConnectionId,
    pub joined_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    Sending,
    Sent,
    Delivered,
    Read,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sending" => Some(Self::Sending),
            "sent" => Some(Self::Sent),
            "delivered" => Some(Self::Delivered),
            "read" => Some(Self::Read),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    File,
    Audio,
    Video,
    Voice,
    Location,
}

impl AttachmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::File => "file",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Voice => "voice",
            Self::Location => "location",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(Self::Image),
            "file" => Some(Self::File),
            "audio" => Some(Self::Audio),
            "video" => Some(Self::Video),
            "voice" => Some(Self::Voice),
            "location" => Some(Self::Location),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub id: String,
    pub kind: AttachmentKind,
    pub url: String,
    pub name: Option<String>,
    pub size: Option<u64>,
    pub metadata: Option<Value>,
}

/// Users who reacted with one emoji. `user_ids` holds no duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub emoji: String,
    pub user_ids: Vec<UserId>,
    pub user_names: Vec<String>,
}

impl Reaction {
    /// Build a reaction entry, keeping the first occurrence of each user.
    pub fn new(emoji: String, reactors: impl IntoIterator<Item = (UserId, String)>) -> Self {
        let mut user_ids: Vec<UserId> = Vec::new();
        let mut user_names = Vec::new();
        for (user_id, user_name) in reactors {
            if !user_ids.contains(&user_id) {
                user_ids.push(user_id);
                user_names.push(user_name);
            }
        }
        Self {
            emoji,
            user_ids,
            user_names,
        }
    }

    /// Fold entries that share an emoji into one, in first-seen order.
    pub fn merge_by_emoji(entries: impl IntoIterator<Item = Reaction>) -> Vec<Reaction> {
        let mut merged: Vec<Reaction> = Vec::new();
        for entry in entries {
            match merged.iter_mut().find(|r| r.emoji == entry.emoji) {
                Some(existing) => {
                    let reactors = existing
                        .user_ids
                        .drain(..)
                        .zip(existing.user_names.drain(..))
                        .chain(entry.user_ids.into_iter().zip(entry.user_names))
                        .collect::<Vec<_>>();
                    *existing = Reaction::new(entry.emoji, reactors);
                }
                None => merged.push(entry),
            }
        }
        merged
    }
}

/// A chat message as stored in a conversation's history.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub sender_avatar: String,
    pub content: String,
    pub timestamp: Timestamp,
    pub status: MessageStatus,
    pub reply_to: Option<MessageId>,
    pub reactions: Vec<Reaction>,
    pub edited: bool,
    pub attachments: Vec<Attachment>,
}

/// A message as submitted by a client, before the server stamps it.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub sender_avatar: String,
    pub content: String,
    /// Client-supplied timestamp, trusted verbatim when present
    pub timestamp: Option<Timestamp>,
    pub reply_to: Option<MessageId>,
    pub reactions: Vec<Reaction>,
    pub attachments: Vec<Attachment>,
}

impl MessageDraft {
    /// A message needs text or at least one attachment.
    pub fn has_body(&self) -> bool {
        !self.content.trim().is_empty() || !self.attachments.is_empty()
    }

    /// Stamp the draft as `sent`, filling in the timestamp when the client
    /// did not provide one.
    pub fn into_message(self, now: Timestamp) -> Message {
        Message {
            id: self.id,
            conversation_id: self.conversation_id,
            sender_id: self.sender_id,
            sender_name: self.sender_name,
            sender_avatar: self.sender_avatar,
            content: self.content,
            timestamp: self.timestamp.unwrap_or(now),
            status: MessageStatus::Sent,
            reply_to: self.reply_to,
            reactions: self.reactions,
            edited: false,
            attachments: self.attachments,
        }
    }
}

/// A reaction applied to a message, fanned out live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub conversation_id: ConversationId,
    pub message_id: MessageId,
    pub emoji: String,
    pub user_id: UserId,
    pub user_name: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingEvent {
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    pub user_name: Option<String>,
    pub is_typing: bool,
}
