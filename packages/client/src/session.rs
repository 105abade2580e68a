//! WebSocket client session management.

use std::sync::Arc;

use cursors_server::infrastructure::dto::websocket::ServerEvent;
use cursors_shared::time::SystemClock;
use futures_util::{SinkExt, StreamExt};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::{
    app::{ClientApp, Notice},
    command,
    domain::ClientBounds,
    error::ClientError,
    formatter::NoticeFormatter,
    ui::{PROMPT, print_above_prompt},
};

/// Reject anything that is not a WebSocket URL before dialing.
pub fn validate_url(url: &str) -> Result<(), ClientError> {
    if url.starts_with("ws://") || url.starts_with("wss://") {
        Ok(())
    } else {
        Err(ClientError::InvalidUrl(url.to_string()))
    }
}

/// Spawn the blocking rustyline thread; every non-empty line is sent on the
/// returned channel. The channel closes on Ctrl+C or Ctrl+D.
pub fn spawn_input_thread() -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}

fn show(notice: &Notice) {
    if NoticeFormatter::is_verbose(notice) {
        tracing::debug!("{:?}", notice);
    } else {
        print_above_prompt(&NoticeFormatter::format(notice));
    }
}

pub type ServerStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open the WebSocket connection to the relay.
pub async fn connect(url: &str) -> Result<ServerStream, ClientError> {
    validate_url(url)?;

    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    tracing::info!("Connected to {}", url);
    Ok(ws_stream)
}

/// Run one WebSocket session until the user quits (`Ok`) or the connection
/// is lost (`Err`).
///
/// Server frames, input lines and signal expiries are handled one at a time
/// by a single loop that owns the [`ClientApp`].
pub async fn run_client_session(
    ws_stream: ServerStream,
    bounds: ClientBounds,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (mut write, mut read) = ws_stream.split();
    let (mut app, mut expiry_rx) = ClientApp::new(bounds, Arc::new(SystemClock));

    loop {
        tokio::select! {
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match ServerEvent::from_json(text.as_str()) {
                        Ok(event) => {
                            for notice in app.apply_server_event(event) {
                                show(&notice);
                            }
                        }
                        Err(e) => tracing::warn!("Dropping unparseable frame: {} ({})", text.as_str(), e),
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Server closed the connection");
                        return Err(ClientError::ConnectionError("Connection lost".to_string()));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        return Err(ClientError::ConnectionError(e.to_string()));
                    }
                }
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    tracing::info!("Input closed, leaving");
                    write.send(Message::Close(None)).await.ok();
                    return Ok(());
                };

                let command = match command::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        print_above_prompt(&format!("\n{}\n", e));
                        continue;
                    }
                };

                let outcome = app.handle_command(command);
                for notice in &outcome.notices {
                    show(notice);
                }
                for event in outcome.outbound {
                    let json = match event.to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize event: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = write.send(Message::Text(json.into())).await {
                        tracing::warn!("Failed to send event: {}", e);
                        return Err(ClientError::ConnectionError(e.to_string()));
                    }
                }
            }
            Some(expiry) = expiry_rx.recv() => {
                if let Some(notice) = app.apply_expiry(&expiry) {
                    show(&notice);
                }
            }
        }
    }
}
