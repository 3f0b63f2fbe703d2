//! Infrastructure layer: adapters for the domain ports and wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
