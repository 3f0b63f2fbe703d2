//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{get_room_detail, get_rooms, get_users, health_check};
pub use websocket::websocket_handler;
