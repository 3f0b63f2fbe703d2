//! WebSocket messaging server implementation.

mod event_router;
mod handler;
mod server;
mod signal;
pub mod state;

pub use event_router::{ConnectionSession, EventRouter};
pub use server::Server;
