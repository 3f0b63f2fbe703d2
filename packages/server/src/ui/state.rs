//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
    UserDirectoryUseCase,
};

use super::event_router::EventRouter;

/// Shared application state
pub struct AppState {
    /// 受信イベントの振り分け
    pub event_router: Arc<EventRouter>,
    /// ConnectClientUseCase（接続受け付けのユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（切断処理のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// UserDirectoryUseCase（ユーザー一覧のユースケース）
    pub user_directory_usecase: Arc<UserDirectoryUseCase>,
    /// 接続ごとの送信キューの容量
    pub outbound_buffer: usize,
}
