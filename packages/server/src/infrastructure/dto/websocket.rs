//! WebSocket event DTOs.
//!
//! Every text frame carries exactly one event, encoded as
//! `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::domain::RelayKind;

/// `{id, name, color}` of a connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDto {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// Pointer button state. Missing fields mean "not pressed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerDto {
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub ctrl: bool,
    /// Mouse button index (0 left, 1 middle, 2 right).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub button: Option<u8>,
}

/// Viewport of the sending client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBoundsDto {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub scroll_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorMovePayload {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub pointer: PointerDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_bounds: Option<ClientBoundsDto>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusBlurPayload {
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessagePayload {
    pub msg: String,
}

/// Pie-menu ping; `index` 1..=3 selects the emoji.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingPayload {
    pub index: u8,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextualPingPayload {
    /// e.g. `LOGO_BODY`, `TEXT_ERROR`
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Vertical,
    Horizontal,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GesturePayload {
    pub gesture: GestureKind,
}

/// A client payload enriched with the sender id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relayed<T> {
    pub id: String,
    #[serde(flatten)]
    pub payload: T,
}

/// A cursor move enriched with the sender id and display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorMoveBroadcast {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub payload: CursorMovePayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeLocalClientPayload {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Every other connected client, in join order.
    pub clients: Vec<IdentityDto>,
}

/// Client → server events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    CursorMove(CursorMovePayload),
    #[serde(rename = "cursor_focus_blur")]
    FocusBlur(FocusBlurPayload),
    ChatMessage(ChatMessagePayload),
    #[serde(rename = "ping_message")]
    Ping(PingPayload),
    ContextualPing(ContextualPingPayload),
    #[serde(rename = "cursor_gesture")]
    Gesture(GesturePayload),
}

impl ClientEvent {
    pub fn relay_kind(&self) -> RelayKind {
        match self {
            ClientEvent::CursorMove(_) => RelayKind::CursorMove,
            ClientEvent::FocusBlur(_) => RelayKind::FocusBlur,
            ClientEvent::ChatMessage(_) => RelayKind::ChatMessage,
            ClientEvent::Ping(_) => RelayKind::Ping,
            ClientEvent::ContextualPing(_) => RelayKind::ContextualPing,
            ClientEvent::Gesture(_) => RelayKind::Gesture,
        }
    }

    /// Attach the sender id (and, for cursor moves, the sender name).
    pub fn enrich(self, id: &str, name: &str) -> ServerEvent {
        let id = id.to_string();
        match self {
            ClientEvent::CursorMove(payload) => ServerEvent::CursorMove(CursorMoveBroadcast {
                id,
                name: name.to_string(),
                payload,
            }),
            ClientEvent::FocusBlur(payload) => ServerEvent::FocusBlur(Relayed { id, payload }),
            ClientEvent::ChatMessage(payload) => {
                ServerEvent::ChatMessage(Relayed { id, payload })
            }
            ClientEvent::Ping(payload) => ServerEvent::Ping(Relayed { id, payload }),
            ClientEvent::ContextualPing(payload) => {
                ServerEvent::ContextualPing(Relayed { id, payload })
            }
            ClientEvent::Gesture(payload) => ServerEvent::Gesture(Relayed { id, payload }),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    InitializeLocalClient(InitializeLocalClientPayload),
    ClientJoined(IdentityDto),
    /// Carries only the departed id.
    ClientLeft(String),
    CursorMove(CursorMoveBroadcast),
    #[serde(rename = "cursor_focus_blur")]
    FocusBlur(Relayed<FocusBlurPayload>),
    ChatMessage(Relayed<ChatMessagePayload>),
    #[serde(rename = "ping_message")]
    Ping(Relayed<PingPayload>),
    ContextualPing(Relayed<ContextualPingPayload>),
    #[serde(rename = "cursor_gesture")]
    Gesture(Relayed<GesturePayload>),
}

impl ServerEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
