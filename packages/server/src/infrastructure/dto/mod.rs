//! Data Transfer Objects (DTOs) for the messaging backend.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event envelopes and payloads
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
