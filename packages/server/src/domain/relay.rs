//! Fan-out rules for relayed cursor events.

use super::value_object::ClientId;

/// Id used when the server echoes a client's own event back to it.
pub const LOCAL_CLIENT_ID: &str = "LOCAL_CLIENT";

/// Kinds of client-originated events the relay forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayKind {
    CursorMove,
    FocusBlur,
    ChatMessage,
    Ping,
    ContextualPing,
    Gesture,
}

impl RelayKind {
    /// Whether the sender also receives the event, under [`LOCAL_CLIENT_ID`].
    ///
    /// Pings and gestures are rendered from the echo on the sender's side too.
    pub fn echoes_to_sender(self) -> bool {
        matches!(self, RelayKind::Ping | RelayKind::Gesture)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelayKind::CursorMove => "cursor_move",
            RelayKind::FocusBlur => "cursor_focus_blur",
            RelayKind::ChatMessage => "chat_message",
            RelayKind::Ping => "ping_message",
            RelayKind::ContextualPing => "contextual_ping",
            RelayKind::Gesture => "cursor_gesture",
        }
    }
}

/// Every connected client except `exclude`.
pub fn broadcast_targets(connected: Vec<ClientId>, exclude: &ClientId) -> Vec<ClientId> {
    connected
        .into_iter()
        .filter(|id| id != exclude)
        .collect()
}
