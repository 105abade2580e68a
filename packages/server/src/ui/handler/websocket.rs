//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, ClientIdFactory, Identity, LOCAL_CLIENT_ID},
    infrastructure::dto::websocket::{
        ClientEvent, IdentityDto, InitializeLocalClientPayload, ServerEvent,
    },
    ui::state::AppState,
    usecase::{RelayEnvelope, Registration},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Serialize a server event, logging failures.
fn encode(event: &ServerEvent) -> Option<String> {
    match event.to_json() {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize server event: {}", e);
            None
        }
    }
}

/// Enrich a client event with the sender identity, plus the sentinel echo when
/// the event kind is echoed back to its sender.
fn build_envelope(
    event: ClientEvent,
    sender: &Identity,
) -> Result<RelayEnvelope, serde_json::Error> {
    let kind = event.relay_kind();
    let name = sender.name.as_str();

    let for_sender = if kind.echoes_to_sender() {
        Some(event.clone().enrich(LOCAL_CLIENT_ID, name).to_json()?)
    } else {
        None
    };
    let for_others = event.enrich(sender.id.as_str(), name).to_json()?;

    Ok(RelayEnvelope {
        kind,
        for_others,
        for_sender,
    })
}

/// Spawns the writer task: drains this client's queue into the WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let client_id = ClientIdFactory::generate();
    let (mut sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let Registration { identity, roster } = state
        .connect_client_usecase
        .execute(client_id.clone(), tx)
        .await;
    tracing::info!(
        "Client '{}' connected as '{}' ({})",
        client_id.as_str(),
        identity.name.as_str(),
        identity.color.as_str()
    );

    // Own identity and the roster go out before anything queued for this client
    let initialize = ServerEvent::InitializeLocalClient(InitializeLocalClientPayload {
        id: identity.id.as_str().to_string(),
        name: identity.name.as_str().to_string(),
        color: identity.color.as_str().to_string(),
        clients: roster.into_iter().map(IdentityDto::from).collect(),
    });
    let Some(initialize_json) = encode(&initialize) else {
        disconnect(&state, client_id).await;
        return;
    };
    if let Err(e) = sender.send(Message::Text(initialize_json.into())).await {
        tracing::error!(
            "Failed to send initialize_local_client to '{}': {}",
            client_id.as_str(),
            e
        );
        disconnect(&state, client_id).await;
        return;
    }
    tracing::info!("Sent roster to '{}'", client_id.as_str());

    if let Some(joined_json) = encode(&ServerEvent::ClientJoined(IdentityDto::from(
        identity.clone(),
    ))) {
        match state
            .connect_client_usecase
            .broadcast_client_joined(&client_id, &joined_json)
            .await
        {
            Ok(targets) => tracing::debug!(
                "Broadcasted client_joined for '{}' to {} client(s)",
                client_id.as_str(),
                targets.len()
            ),
            Err(e) => tracing::warn!("Failed to broadcast client_joined: {}", e),
        }
    }

    let state_for_recv = state.clone();
    let client_id_for_recv = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match ClientEvent::from_json(text.as_str()) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(
                                "Dropping unparseable frame from '{}': {}",
                                client_id_for_recv.as_str(),
                                e
                            );
                            continue;
                        }
                    };

                    let envelope = match build_envelope(event, &identity) {
                        Ok(envelope) => envelope,
                        Err(e) => {
                            tracing::warn!("Failed to serialize relayed event: {}", e);
                            continue;
                        }
                    };

                    if let Err(e) = state_for_recv
                        .relay_event_usecase
                        .execute(&client_id_for_recv, envelope)
                        .await
                    {
                        tracing::warn!("Failed to relay event: {}", e);
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_for_recv.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    disconnect(&state, client_id).await;
}

/// Remove the client from the registry, then tell everyone else it left.
async fn disconnect(state: &AppState, client_id: ClientId) {
    let Some(targets) = state
        .disconnect_client_usecase
        .execute(client_id.clone())
        .await
    else {
        return;
    };
    tracing::info!("Client '{}' disconnected", client_id.as_str());

    let Some(left_json) = encode(&ServerEvent::ClientLeft(client_id.as_str().to_string())) else {
        return;
    };
    if let Err(e) = state
        .disconnect_client_usecase
        .broadcast_client_left(targets, &left_json)
        .await
    {
        tracing::warn!("Failed to broadcast client_left: {}", e);
    }
}
