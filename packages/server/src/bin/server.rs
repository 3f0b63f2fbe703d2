//! Real-time messaging server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-server
//! cargo run --bin tsudoi-server -- --host 0.0.0.0 --port 3000 --history-limit 500
//! ```

use std::sync::Arc;

use clap::Parser;
use tsudoi_server::{app::build_state, config::ServerConfig, ui::Server};
use tsudoi_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "tsudoi-server")]
#[command(about = "Real-time messaging server with conversation rooms", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Maximum number of messages kept per room
    #[arg(long, default_value = "1000")]
    history_limit: usize,

    /// Number of recent messages replayed to a joining client
    #[arg(long, default_value = "100")]
    replay_limit: usize,

    /// Capacity of each connection's outbound queue
    #[arg(long, default_value = "256")]
    outbound_buffer: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            history_limit: args.history_limit,
            replay_limit: args.replay_limit,
            outbound_buffer: args.outbound_buffer,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());
    tracing::debug!("Starting with {:?}", config);

    let state = build_state(&config, Arc::new(SystemClock));
    let server = Server::new(state);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
