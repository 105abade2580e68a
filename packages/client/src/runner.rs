//! Client execution logic with reconnection support.

use std::time::Duration;

use crate::{
    domain::{
        ClientBounds,
        reconnect::{ReconnectBudget, should_exit_immediately},
    },
    error::ClientError,
    session::{connect, run_client_session, spawn_input_thread},
};

pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the WebSocket client with reconnection logic
///
/// Each reconnect starts a fresh session: the server hands out a new
/// identity and roster, and every visible signal is dropped. The attempt
/// budget is per outage and refills whenever a connection succeeds.
pub async fn run_client(url: String, bounds: ClientBounds) -> Result<(), ClientError> {
    let mut input_rx = spawn_input_thread();
    let mut budget = ReconnectBudget::new(MAX_RECONNECT_ATTEMPTS);

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            budget.failures() + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let result = match connect(&url).await {
            Ok(ws_stream) => {
                budget.connected();
                run_client_session(ws_stream, bounds, &mut input_rx).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    tracing::error!("{}", e);
                    return Err(e);
                }

                tracing::warn!("Connection lost: {}", e);

                if !budget.record_failure(&e) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    budget.failures() + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
