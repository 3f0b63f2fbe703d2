//! Server configuration.

use crate::{
    domain::{DEFAULT_HISTORY_LIMIT, DEFAULT_REPLAY_LIMIT},
    infrastructure::message_pusher::DEFAULT_OUTBOUND_BUFFER,
};

/// Runtime settings of the messaging server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-room history cap
    pub history_limit: usize,
    /// Messages replayed to a joining connection
    pub replay_limit: usize,
    /// Capacity of each connection's outbound queue
    pub outbound_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            history_limit: DEFAULT_HISTORY_LIMIT,
            replay_limit: DEFAULT_REPLAY_LIMIT,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}
