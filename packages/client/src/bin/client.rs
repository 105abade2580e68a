//! Terminal client for the cursor presence relay with reconnection support.
//!
//! Reads commands from stdin and shows what other clients are doing.
//! Plain text is sent as a chat message; `/move`, `/zone`, `/ping` and
//! friends drive the local pointer. Automatically reconnects on
//! disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin cursors-client
//! cargo run --bin cursors-client -- --url ws://127.0.0.1:3000/ws --viewport-width 1024
//! ```

use clap::Parser;
use cursors_client::{domain::ClientBounds, run_client};
use cursors_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "cursors-client")]
#[command(about = "Terminal client for the cursor presence relay", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3000/ws")]
    url: String,

    /// Width of the simulated viewport in pixels
    #[arg(long, default_value_t = 1280.0)]
    viewport_width: f64,

    /// Height of the simulated viewport in pixels
    #[arg(long, default_value_t = 800.0)]
    viewport_height: f64,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let bounds = ClientBounds::new(args.viewport_width, args.viewport_height);

    if let Err(e) = run_client(args.url, bounds).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
