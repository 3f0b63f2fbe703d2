//! Dependency wiring.

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::{
    config::ServerConfig,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryRoomRepository, InMemoryUserRepository},
    },
    ui::{EventRouter, state::AppState},
    usecase::{
        ConnectClientUseCase, DeleteMessageUseCase, DisconnectClientUseCase, EditMessageUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, JoinConversationUseCase, LeaveConversationUseCase,
        NotifyTypingUseCase, ReactToMessageUseCase, RegisterUserUseCase, SendMessageUseCase,
        UpdateMemberDisplayUseCase, UpdateProfileUseCase, UserDirectoryUseCase,
    },
};

/// Build the application state in dependency order:
///
/// 1. Repositories
/// 2. MessagePusher
/// 3. UseCases
/// 4. EventRouter and AppState
pub fn build_state(config: &ServerConfig, clock: Arc<dyn Clock>) -> AppState {
    // 1. Repositories (in-memory)
    let room_repository = Arc::new(InMemoryRoomRepository::new(
        config.history_limit,
        clock.clone(),
    ));
    let user_repository = Arc::new(InMemoryUserRepository::new());

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. UseCases
    let user_directory = Arc::new(UserDirectoryUseCase::new(
        user_repository.clone(),
        message_pusher.clone(),
    ));
    let event_router = EventRouter {
        register_user: Arc::new(RegisterUserUseCase::new(
            user_repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        user_directory: user_directory.clone(),
        join_conversation: Arc::new(JoinConversationUseCase::new(
            room_repository.clone(),
            message_pusher.clone(),
            clock.clone(),
            config.replay_limit,
        )),
        leave_conversation: Arc::new(LeaveConversationUseCase::new(
            room_repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        send_message: Arc::new(SendMessageUseCase::new(
            room_repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        edit_message: Arc::new(EditMessageUseCase::new(
            room_repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        delete_message: Arc::new(DeleteMessageUseCase::new(
            room_repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        react_to_message: Arc::new(ReactToMessageUseCase::new(
            room_repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        notify_typing: Arc::new(NotifyTypingUseCase::new(
            room_repository.clone(),
            message_pusher.clone(),
        )),
        update_member_display: Arc::new(UpdateMemberDisplayUseCase::new(
            room_repository.clone(),
            message_pusher.clone(),
        )),
        update_profile: Arc::new(UpdateProfileUseCase::new(
            user_repository.clone(),
            room_repository.clone(),
            message_pusher.clone(),
        )),
    };

    // 4. AppState
    AppState {
        event_router: Arc::new(event_router),
        connect_client_usecase: Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
        disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
            user_repository,
            room_repository.clone(),
            message_pusher,
            clock,
        )),
        get_rooms_usecase: Arc::new(GetRoomsUseCase::new(room_repository.clone())),
        get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(room_repository)),
        user_directory_usecase: user_directory,
        // a bounded channel needs room for at least one frame
        outbound_buffer: config.outbound_buffer.max(1),
    }
}
