//! Cursor presence relay server.
//!
//! Assigns every WebSocket connection a name and color, then relays cursor
//! moves, chat bubbles, pings and gestures to every other connection.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin cursors-server
//! cargo run --bin cursors-server -- --host 127.0.0.1 --port 3000
//! ```

use clap::Parser;
use cursors_server::ui::{CorsOrigin, Server};
use cursors_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "cursors-server")]
#[command(about = "Real-time cursor presence relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Allowed CORS origin ("*" for any)
    #[arg(long, env = "CORS_ORIGIN", default_value = "*")]
    cors_origin: CorsOrigin,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let server = Server::in_memory(args.cors_origin);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
