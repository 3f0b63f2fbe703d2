//! Event fan-out router.
//!
//! Every inbound WebSocket event goes through [`EventRouter::route_text`]:
//! the envelope is decoded, the payload converted into domain types, and the
//! matching use case executed. Malformed events are logged and dropped; the
//! connection stays open.

use std::{collections::BTreeMap, fmt::Display, sync::Arc};

use crate::{
    domain::{ConnectionId, ConversationId, JoinRequest, ProfileUpdateRequest, UserId},
    infrastructure::dto::{conversion::ConversionError, websocket::ClientEvent},
    usecase::{
        DeleteMessageUseCase, EditMessageUseCase, JoinConversationUseCase,
        LeaveConversationUseCase, NotifyTypingUseCase, ReactToMessageUseCase, RegisterUserUseCase,
        SendMessageUseCase, UpdateMemberDisplayUseCase, UpdateProfileUseCase,
        UserDirectoryUseCase,
    },
};

/// Per-connection state the router keeps between events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSession {
    pub connection_id: ConnectionId,
    /// User announced by `register_user` (or the first join)
    pub user_id: Option<UserId>,
    /// Rooms joined on this connection and the user each was joined as
    joined: BTreeMap<ConversationId, UserId>,
}

impl ConnectionSession {
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            user_id: None,
            joined: BTreeMap::new(),
        }
    }

    pub fn joined_rooms(&self) -> impl Iterator<Item = &ConversationId> {
        self.joined.keys()
    }

    /// Hand the joined rooms over to disconnect cleanup.
    pub fn into_joined(self) -> Vec<(ConversationId, UserId)> {
        self.joined.into_iter().collect()
    }
}

/// Use cases reachable from the WebSocket transport.
pub struct EventRouter {
    pub register_user: Arc<RegisterUserUseCase>,
    pub user_directory: Arc<UserDirectoryUseCase>,
    pub join_conversation: Arc<JoinConversationUseCase>,
    pub leave_conversation: Arc<LeaveConversationUseCase>,
    pub send_message: Arc<SendMessageUseCase>,
    pub edit_message: Arc<EditMessageUseCase>,
    pub delete_message: Arc<DeleteMessageUseCase>,
    pub react_to_message: Arc<ReactToMessageUseCase>,
    pub notify_typing: Arc<NotifyTypingUseCase>,
    pub update_member_display: Arc<UpdateMemberDisplayUseCase>,
    pub update_profile: Arc<UpdateProfileUseCase>,
}

fn convert<P, T>(session: &ConnectionSession, event: &str, payload: P) -> Option<T>
where
    T: TryFrom<P, Error = ConversionError>,
{
    match T::try_from(payload) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                "Dropping '{}' from connection '{}': {}",
                event,
                session.connection_id,
                e
            );
            None
        }
    }
}

fn report<T, E: Display>(
    session: &ConnectionSession,
    event: &str,
    result: Result<T, E>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                "'{}' from connection '{}' failed: {}",
                event,
                session.connection_id,
                e
            );
            None
        }
    }
}

impl EventRouter {
    /// Decode one text frame and dispatch it.
    pub async fn route_text(&self, session: &mut ConnectionSession, text: &str) {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => self.dispatch(session, event).await,
            Err(e) => tracing::warn!(
                "Dropping malformed frame from connection '{}': {}",
                session.connection_id,
                e
            ),
        }
    }

    pub async fn dispatch(&self, session: &mut ConnectionSession, event: ClientEvent) {
        let name = event.name();
        let connection_id = session.connection_id;
        tracing::debug!("Event '{}' from connection '{}'", name, connection_id);

        match event {
            ClientEvent::RegisterUser(payload) => {
                let Some(registration) = convert(session, name, payload) else {
                    return;
                };
                let result = self.register_user.execute(connection_id, registration).await;
                if let Some(outcome) = report(session, name, result) {
                    session.user_id = Some(outcome.user.id);
                }
            }
            ClientEvent::SearchUser(payload) => {
                let Some(phone_number) = convert(session, name, payload) else {
                    return;
                };
                let result = self.user_directory.search(connection_id, phone_number).await;
                report(session, name, result);
            }
            ClientEvent::GetAllUsers => {
                let result = self.user_directory.list(connection_id).await;
                report(session, name, result);
            }
            ClientEvent::JoinConversation(payload) => {
                let Some(request) = convert::<_, JoinRequest>(session, name, payload) else {
                    return;
                };
                let conversation_id = request.conversation_id.clone();
                let user_id = request.user_id.clone();
                let result = self.join_conversation.execute(connection_id, request).await;
                if report(session, name, result).is_some() {
                    session.user_id.get_or_insert_with(|| user_id.clone());
                    session.joined.insert(conversation_id, user_id);
                }
            }
            ClientEvent::LeaveConversation(payload) => {
                let Some(conversation_id) = convert::<_, ConversationId>(session, name, payload)
                else {
                    return;
                };
                let Some(user_id) = session
                    .joined
                    .remove(&conversation_id)
                    .or_else(|| session.user_id.clone())
                else {
                    tracing::debug!(
                        "Leave of '{}' from anonymous connection '{}' ignored",
                        conversation_id,
                        connection_id
                    );
                    return;
                };
                let result = self
                    .leave_conversation
                    .execute(connection_id, conversation_id, user_id)
                    .await;
                report(session, name, result);
            }
            ClientEvent::SendMessage(payload) => {
                let Some(draft) = convert(session, name, payload) else {
                    return;
                };
                let result = self.send_message.execute(connection_id, draft).await;
                report(session, name, result);
            }
            ClientEvent::EditMessage(payload) => {
                let Some(request) = convert(session, name, payload) else {
                    return;
                };
                let result = self.edit_message.execute(request).await;
                report(session, name, result);
            }
            ClientEvent::DeleteMessage(payload) => {
                let Some(request) = convert(session, name, payload) else {
                    return;
                };
                let result = self.delete_message.execute(request).await;
                report(session, name, result);
            }
            ClientEvent::ReactToMessage(payload) => {
                let Some(request) = convert(session, name, payload) else {
                    return;
                };
                let result = self.react_to_message.execute(request).await;
                report(session, name, result);
            }
            ClientEvent::Typing(payload) => {
                let Some(event) = convert(session, name, payload) else {
                    return;
                };
                let result = self.notify_typing.execute(connection_id, event).await;
                report(session, name, result);
            }
            ClientEvent::UpdateUserFrame(payload) => {
                let Some(request) = convert(session, name, payload) else {
                    return;
                };
                let result = self.update_member_display.execute(request).await;
                report(session, name, result);
            }
            ClientEvent::UpdateUserNameEffect(payload) => {
                let Some(request) = convert(session, name, payload) else {
                    return;
                };
                let result = self.update_member_display.execute(request).await;
                report(session, name, result);
            }
            ClientEvent::UpdateProfile(payload) => {
                let Some(request) = convert::<_, ProfileUpdateRequest>(session, name, payload)
                else {
                    return;
                };
                let rooms = session
                    .joined
                    .iter()
                    .filter(|(_, user_id)| **user_id == request.user_id)
                    .map(|(conversation_id, _)| conversation_id.clone())
                    .collect();
                let result = self.update_profile.execute(request, rooms).await;
                report(session, name, result);
            }
        }
    }
}
