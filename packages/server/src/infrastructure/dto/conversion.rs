//! Conversion logic between DTOs and domain types.
//!
//! Inbound conversions validate required fields; a failure means the event
//! is dropped.

use chrono::DateTime;
use thiserror::Error;

use crate::domain::{
    Attachment, AttachmentKind, ConversationId, DecorationUpdate, DeleteRequest, DisplayMetadata,
    DisplayUpdateRequest, EditRequest, JoinRequest, Message, MessageDraft, MessageId,
    Notification, PhoneNumber, ProfileUpdateRequest, Reaction, ReactionEvent, ReactionRequest,
    RoomMembership, Timestamp, TypingEvent, User, UserId, UserRegistration, UserStatus,
    ValueObjectError,
};
use crate::infrastructure::dto::websocket as dto;

/// Why an inbound payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error("unknown attachment type '{0}'")]
    UnknownAttachmentType(String),

    #[error("message has neither content nor attachments")]
    EmptyMessage,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ConversionError> {
    value.ok_or(ConversionError::MissingField(field))
}

fn conversation_id(value: Option<String>) -> Result<ConversationId, ConversionError> {
    Ok(ConversationId::new(required(value, "conversationId")?)?)
}

fn user_id(value: Option<String>) -> Result<UserId, ConversionError> {
    Ok(UserId::new(required(value, "userId")?)?)
}

fn message_id(value: Option<String>, field: &'static str) -> Result<MessageId, ConversionError> {
    Ok(MessageId::new(required(value, field)?)?)
}

/// Resolve a client timestamp to epoch milliseconds. Unparseable text is
/// treated as absent.
fn client_timestamp(value: dto::ClientTimestamp) -> Option<Timestamp> {
    match value {
        dto::ClientTimestamp::Millis(millis) => Some(Timestamp::new(millis)),
        dto::ClientTimestamp::Text(text) => match DateTime::parse_from_rfc3339(&text) {
            Ok(dt) => Some(Timestamp::new(dt.timestamp_millis())),
            Err(e) => {
                tracing::warn!("Ignoring unparseable client timestamp '{}': {}", text, e);
                None
            }
        },
    }
}

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<dto::RegisterUserPayload> for UserRegistration {
    type Error = ConversionError;

    fn try_from(payload: dto::RegisterUserPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: user_id(payload.user_id)?,
            // a blank phone number is treated as absent
            phone_number: payload.phone_number.and_then(|p| PhoneNumber::new(p).ok()),
            name: payload.name.unwrap_or_default(),
            avatar_url: payload.avatar.unwrap_or_default(),
        })
    }
}

impl TryFrom<dto::SearchUserPayload> for PhoneNumber {
    type Error = ConversionError;

    fn try_from(payload: dto::SearchUserPayload) -> Result<Self, Self::Error> {
        Ok(PhoneNumber::new(required(payload.phone_number, "phoneNumber")?)?)
    }
}

impl TryFrom<dto::JoinConversationPayload> for JoinRequest {
    type Error = ConversionError;

    fn try_from(payload: dto::JoinConversationPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            conversation_id: conversation_id(payload.conversation_id)?,
            user_id: user_id(payload.user_id)?,
            display: DisplayMetadata {
                user_name: payload.user_name.unwrap_or_default(),
                user_avatar: payload.user_avatar.unwrap_or_default(),
                frame_config: payload.user_frame,
                name_effect: payload.user_name_effect,
                user_status: payload.user_status.as_deref().and_then(UserStatus::parse),
                is_premium_subscriber: payload.is_premium_subscriber.unwrap_or(false),
            },
        })
    }
}

impl TryFrom<dto::LeaveConversationPayload> for ConversationId {
    type Error = ConversionError;

    fn try_from(payload: dto::LeaveConversationPayload) -> Result<Self, Self::Error> {
        match payload {
            dto::LeaveConversationPayload::Id(id) => Ok(ConversationId::new(id)?),
            dto::LeaveConversationPayload::Object(object) => conversation_id(object.conversation_id),
        }
    }
}

impl TryFrom<dto::AttachmentPayload> for Attachment {
    type Error = ConversionError;

    fn try_from(payload: dto::AttachmentPayload) -> Result<Self, Self::Error> {
        let kind = required(payload.kind, "attachments.type")?;
        Ok(Self {
            id: required(payload.id, "attachments.id")?,
            kind: AttachmentKind::parse(&kind).ok_or(ConversionError::UnknownAttachmentType(kind))?,
            url: required(payload.url, "attachments.url")?,
            name: payload.name,
            size: payload.size,
            metadata: payload.metadata,
        })
    }
}

impl TryFrom<dto::ReactionDto> for Reaction {
    type Error = ConversionError;

    fn try_from(dto: dto::ReactionDto) -> Result<Self, Self::Error> {
        let mut reactors = Vec::with_capacity(dto.user_ids.len());
        let mut names = dto.user_names.into_iter();
        for id in dto.user_ids {
            reactors.push((UserId::new(id)?, names.next().unwrap_or_default()));
        }
        Ok(Reaction::new(dto.emoji, reactors))
    }
}

impl TryFrom<dto::SendMessagePayload> for MessageDraft {
    type Error = ConversionError;

    fn try_from(payload: dto::SendMessagePayload) -> Result<Self, Self::Error> {
        let draft = Self {
            id: message_id(payload.id, "id")?,
            conversation_id: conversation_id(payload.conversation_id)?,
            sender_id: UserId::new(required(payload.sender_id, "senderId")?)?,
            sender_name: payload.sender_name.unwrap_or_default(),
            sender_avatar: payload.sender_avatar.unwrap_or_default(),
            content: payload.content.unwrap_or_default(),
            timestamp: payload.timestamp.and_then(client_timestamp),
            reply_to: payload
                .reply_to
                .filter(|id| !id.trim().is_empty())
                .map(MessageId::new)
                .transpose()?,
            reactions: Reaction::merge_by_emoji(
                payload
                    .reactions
                    .into_iter()
                    .map(Reaction::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            attachments: payload
                .attachments
                .into_iter()
                .map(Attachment::try_from)
                .collect::<Result<_, _>>()?,
        };
        if !draft.has_body() {
            return Err(ConversionError::EmptyMessage);
        }
        Ok(draft)
    }
}

impl TryFrom<dto::EditMessagePayload> for EditRequest {
    type Error = ConversionError;

    fn try_from(payload: dto::EditMessagePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            conversation_id: conversation_id(payload.conversation_id)?,
            message_id: message_id(payload.message_id, "messageId")?,
            content: required(payload.content, "content")?,
        })
    }
}

impl TryFrom<dto::DeleteMessagePayload> for DeleteRequest {
    type Error = ConversionError;

    fn try_from(payload: dto::DeleteMessagePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            conversation_id: conversation_id(payload.conversation_id)?,
            message_id: message_id(payload.message_id, "messageId")?,
        })
    }
}

impl TryFrom<dto::ReactToMessagePayload> for ReactionRequest {
    type Error = ConversionError;

    fn try_from(payload: dto::ReactToMessagePayload) -> Result<Self, Self::Error> {
        let emoji = required(payload.emoji, "emoji")?;
        if emoji.is_empty() {
            return Err(ValueObjectError::Empty("emoji").into());
        }
        Ok(Self {
            conversation_id: conversation_id(payload.conversation_id)?,
            message_id: message_id(payload.message_id, "messageId")?,
            emoji,
            user_id: user_id(payload.user_id)?,
            user_name: payload.user_name.unwrap_or_default(),
        })
    }
}

impl TryFrom<dto::TypingPayload> for TypingEvent {
    type Error = ConversionError;

    fn try_from(payload: dto::TypingPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            conversation_id: conversation_id(payload.conversation_id)?,
            user_id: user_id(payload.user_id)?,
            user_name: payload.user_name,
            is_typing: required(payload.is_typing, "isTyping")?,
        })
    }
}

impl TryFrom<dto::UpdateUserFramePayload> for DisplayUpdateRequest {
    type Error = ConversionError;

    fn try_from(payload: dto::UpdateUserFramePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            conversation_id: conversation_id(payload.conversation_id)?,
            user_id: user_id(payload.user_id)?,
            user_name: payload.user_name,
            update: DecorationUpdate::Frame(required(payload.frame_config, "frameConfig")?),
        })
    }
}

impl TryFrom<dto::UpdateUserNameEffectPayload> for DisplayUpdateRequest {
    type Error = ConversionError;

    fn try_from(payload: dto::UpdateUserNameEffectPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            conversation_id: conversation_id(payload.conversation_id)?,
            user_id: user_id(payload.user_id)?,
            user_name: payload.user_name,
            update: DecorationUpdate::NameEffect(required(payload.name_effect, "nameEffect")?),
        })
    }
}

impl TryFrom<dto::UpdateProfilePayload> for ProfileUpdateRequest {
    type Error = ConversionError;

    fn try_from(payload: dto::UpdateProfilePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: user_id(payload.user_id)?,
            name: payload.name,
            avatar: payload.avatar,
        })
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&User> for dto::UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_str().to_string(),
            phone_number: user.phone_number.as_ref().map(|p| p.as_str().to_string()),
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
            status: user.status.as_str().to_string(),
            last_seen: user.last_seen.value(),
        }
    }
}

impl From<&RoomMembership> for dto::MemberDto {
    fn from(member: &RoomMembership) -> Self {
        Self {
            conversation_id: member.conversation_id.as_str().to_string(),
            user_id: member.user_id.as_str().to_string(),
            user_name: member.display.user_name.clone(),
            user_avatar: member.display.user_avatar.clone(),
            user_frame: member.display.frame_config.clone(),
            user_name_effect: member.display.name_effect.clone(),
            user_status: member.display.user_status.map(|s| s.as_str().to_string()),
            is_premium_subscriber: member.display.is_premium_subscriber,
            joined_at: member.joined_at.value(),
        }
    }
}

impl From<&Reaction> for dto::ReactionDto {
    fn from(reaction: &Reaction) -> Self {
        Self {
            emoji: reaction.emoji.clone(),
            user_ids: reaction
                .user_ids
                .iter()
                .map(|id| id.as_str().to_string())
                .collect(),
            user_names: reaction.user_names.clone(),
        }
    }
}

impl From<&Attachment> for dto::AttachmentDto {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id.clone(),
            kind: attachment.kind.as_str().to_string(),
            url: attachment.url.clone(),
            name: attachment.name.clone(),
            size: attachment.size,
            metadata: attachment.metadata.clone(),
        }
    }
}

impl From<&Message> for dto::MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            conversation_id: message.conversation_id.as_str().to_string(),
            sender_id: message.sender_id.as_str().to_string(),
            sender_name: message.sender_name.clone(),
            sender_avatar: message.sender_avatar.clone(),
            content: message.content.clone(),
            timestamp: message.timestamp.value(),
            status: message.status.as_str().to_string(),
            reply_to: message.reply_to.as_ref().map(|id| id.as_str().to_string()),
            reactions: message.reactions.iter().map(Into::into).collect(),
            edited: message.edited,
            attachments: message.attachments.iter().map(Into::into).collect(),
        }
    }
}

impl From<&Notification> for dto::ServerEvent {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::UserRegistered(user) => Self::UserRegistered(user.into()),
            Notification::UserStatusChanged {
                user_id,
                status,
                last_seen,
            } => Self::UserStatusUpdate(dto::UserStatusDto {
                user_id: user_id.as_str().to_string(),
                status: status.as_str().to_string(),
                last_seen: last_seen.value(),
            }),
            Notification::UserProfileUpdated {
                user_id,
                name,
                avatar_url,
            } => Self::UserProfileUpdated(dto::UserProfileDto {
                user_id: user_id.as_str().to_string(),
                name: name.clone(),
                avatar: avatar_url.clone(),
            }),
            Notification::SearchUserResult(user) => {
                Self::SearchUserResult(dto::SearchUserResultDto {
                    user: user.as_ref().map(Into::into),
                })
            }
            Notification::AllUsers(users) => Self::AllUsers(users.iter().map(Into::into).collect()),
            Notification::ActiveUsers {
                conversation_id,
                members,
            } => Self::ActiveUsers(dto::ActiveUsersDto {
                conversation_id: conversation_id.as_str().to_string(),
                users: members.iter().map(Into::into).collect(),
            }),
            Notification::ConversationHistory {
                conversation_id,
                messages,
            } => Self::ConversationHistory(dto::ConversationHistoryDto {
                conversation_id: conversation_id.as_str().to_string(),
                messages: messages.iter().map(Into::into).collect(),
            }),
            Notification::MemberJoined(member) => Self::UserJoined(member.into()),
            Notification::MemberLeft {
                conversation_id,
                user_id,
                timestamp,
            } => Self::UserLeft(dto::UserLeftDto {
                conversation_id: conversation_id.as_str().to_string(),
                user_id: user_id.as_str().to_string(),
                timestamp: timestamp.value(),
            }),
            Notification::MessageReceived(message) => Self::ReceiveMessage(message.into()),
            Notification::MessageEdited {
                conversation_id,
                message_id,
                content,
                timestamp,
            } => Self::MessageEdited(dto::MessageEditedDto {
                conversation_id: conversation_id.as_str().to_string(),
                message_id: message_id.as_str().to_string(),
                content: content.clone(),
                timestamp: timestamp.value(),
            }),
            Notification::MessageDeleted {
                conversation_id,
                message_id,
                timestamp,
            } => Self::MessageDeleted(dto::MessageDeletedDto {
                conversation_id: conversation_id.as_str().to_string(),
                message_id: message_id.as_str().to_string(),
                timestamp: timestamp.value(),
            }),
            Notification::ReactionApplied(reaction) => Self::MessageReaction(reaction.into()),
            Notification::Typing(typing) => Self::UserTyping(dto::UserTypingDto {
                conversation_id: typing.conversation_id.as_str().to_string(),
                user_id: typing.user_id.as_str().to_string(),
                user_name: typing.user_name.clone(),
                is_typing: typing.is_typing,
            }),
            Notification::FrameUpdated {
                conversation_id,
                user_id,
                user_name,
                frame_config,
            } => Self::UserFrameUpdated(dto::UserFrameUpdatedDto {
                conversation_id: conversation_id.as_str().to_string(),
                user_id: user_id.as_str().to_string(),
                user_name: user_name.clone(),
                frame_config: frame_config.clone(),
            }),
            Notification::NameEffectUpdated {
                conversation_id,
                user_id,
                user_name,
                name_effect,
            } => Self::UserNameEffectUpdated(dto::UserNameEffectUpdatedDto {
                conversation_id: conversation_id.as_str().to_string(),
                user_id: user_id.as_str().to_string(),
                user_name: user_name.clone(),
                name_effect: name_effect.clone(),
            }),
        }
    }
}

impl From<&ReactionEvent> for dto::MessageReactionDto {
    fn from(event: &ReactionEvent) -> Self {
        Self {
            conversation_id: event.conversation_id.as_str().to_string(),
            message_id: event.message_id.as_str().to_string(),
            emoji: event.emoji.clone(),
            user_id: event.user_id.as_str().to_string(),
            user_name: event.user_name.clone(),
            timestamp: event.timestamp.value(),
        }
    }
}
