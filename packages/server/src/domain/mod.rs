//! Domain layer: value objects, entities, aggregates and the ports the
//! outer layers implement.

pub mod command;
pub mod entity;
pub mod error;
pub mod history;
pub mod message_pusher;
pub mod notification;
pub mod repository;
pub mod room;
pub mod value_object;

pub use command::{
    DecorationUpdate, DeleteRequest, DisplayUpdateRequest, EditRequest, JoinRequest, ProfileUpdateRequest,
    ReactionRequest,
};
pub use entity::{
    Attachment, AttachmentKind, DisplayMetadata, DisplayUpdate, Message, MessageDraft,
    MessageStatus, Reaction, ReactionEvent, RoomMembership, TypingEvent, User, UserRegistration,
    UserStatus,
};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use history::{AppendOutcome, ConversationHistory, DEFAULT_HISTORY_LIMIT, DEFAULT_REPLAY_LIMIT};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use notification::Notification;
pub use repository::{RegistrationOutcome, RoomRepository, SharedRoom, UserRepository};
pub use room::Room;
pub use value_object::{ConnectionId, ConversationId, MessageId, PhoneNumber, Timestamp, UserId};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
