//! Real-time messaging backend.
//!
//! Clients connect over WebSocket, join conversation rooms, and exchange
//! messages, edits, deletions, reactions, typing indicators and display
//! updates. Rooms keep a bounded in-memory history that is replayed to
//! joining clients.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod app;
pub mod config;
