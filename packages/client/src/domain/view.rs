//! View models for remote participants and the local client.

use cursors_server::infrastructure::dto::websocket::{
    ClientBoundsDto, CursorMovePayload, GestureKind, PointerDto,
};

use super::rate_limit::OutboundRateLimiter;

/// Color used for clients we only learned about through an update.
pub const DEFAULT_COLOR: &str = "#000";

/// Mouse button index of the middle button.
pub const MIDDLE_BUTTON: u8 = 1;
/// Mouse button index of the left button.
pub const LEFT_BUTTON: u8 = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    pub down: bool,
    pub ctrl: bool,
    pub button: Option<u8>,
}

impl From<PointerDto> for PointerState {
    fn from(dto: PointerDto) -> Self {
        Self {
            down: dto.down,
            ctrl: dto.ctrl,
            button: dto.button,
        }
    }
}

impl From<PointerState> for PointerDto {
    fn from(state: PointerState) -> Self {
        Self {
            down: state.down,
            ctrl: state.ctrl,
            button: state.button,
        }
    }
}

/// Viewport size and vertical scroll position, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClientBounds {
    pub width: f64,
    pub height: f64,
    pub scroll_offset: f64,
}

impl ClientBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_offset: 0.0,
        }
    }
}

impl From<ClientBoundsDto> for ClientBounds {
    fn from(dto: ClientBoundsDto) -> Self {
        Self {
            width: dto.width,
            height: dto.height,
            scroll_offset: dto.scroll_offset,
        }
    }
}

impl From<ClientBounds> for ClientBoundsDto {
    fn from(bounds: ClientBounds) -> Self {
        Self {
            width: bounds.width,
            height: bounds.height,
            scroll_offset: bounds.scroll_offset,
        }
    }
}

/// Last known state of one remote participant.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteClientView {
    pub name: String,
    pub color: String,
    /// Already adjusted to the local viewport.
    pub x: f64,
    /// Absolute document coordinate.
    pub y: f64,
    pub pointer: PointerState,
    pub client_bounds: ClientBounds,
    pub cursor_visible: bool,
    pub last_message: Option<String>,
    pub last_gesture_token: Option<GestureKind>,
}

impl RemoteClientView {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            x: 0.0,
            y: 0.0,
            pointer: PointerState::default(),
            client_bounds: ClientBounds::default(),
            cursor_visible: true,
            last_message: None,
            last_gesture_token: None,
        }
    }
}

/// A remote participant is either connected or known to have left.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Present(RemoteClientView),
    Absent,
}

impl Presence {
    pub fn as_present(&self) -> Option<&RemoteClientView> {
        match self {
            Presence::Present(view) => Some(view),
            Presence::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Presence::Absent)
    }
}

/// State of the local pointer.
#[derive(Debug, Clone)]
pub struct LocalClientState {
    /// Assigned by the server on `initialize_local_client`.
    pub id: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub x: f64,
    pub y: f64,
    pub pointer: PointerState,
    pub bounds: ClientBounds,
    /// Set while the radial menu is open; blocks outbound cursor moves.
    pub prevent_update: bool,
    limiter: OutboundRateLimiter,
}

impl LocalClientState {
    pub fn new(bounds: ClientBounds) -> Self {
        Self {
            id: None,
            name: None,
            color: None,
            x: 0.0,
            y: 0.0,
            pointer: PointerState::default(),
            bounds,
            prevent_update: false,
            limiter: OutboundRateLimiter::default(),
        }
    }

    /// Epoch milliseconds of the last transmitted move.
    pub fn last_emit(&self) -> Option<i64> {
        self.limiter.last_emit()
    }

    /// Move the local pointer to document coordinates `(x, y)`.
    ///
    /// Returns the payload to transmit, or `None` when throttled or while the
    /// radial menu is open. Position and bounds only change when a move is
    /// transmitted.
    pub fn try_move(&mut self, x: f64, y: f64, now: i64) -> Option<CursorMovePayload> {
        if !self.limiter.try_acquire(now, self.prevent_update) {
            return None;
        }
        self.x = x;
        self.y = y;

        Some(CursorMovePayload {
            x,
            y,
            pointer: self.pointer.into(),
            client_bounds: Some(self.bounds.into()),
        })
    }

    /// Press a pointer button. Returns `true` when this opens the radial menu
    /// (middle button, or left button with Ctrl held).
    pub fn pointer_down(&mut self, button: u8, ctrl: bool) -> bool {
        self.pointer = PointerState {
            down: true,
            ctrl,
            button: Some(button),
        };

        let opens_menu = button == MIDDLE_BUTTON || (button == LEFT_BUTTON && ctrl);
        if opens_menu {
            self.prevent_update = true;
        }
        opens_menu
    }

    /// Release the pointer; this always closes the radial menu.
    pub fn pointer_up(&mut self) {
        self.pointer = PointerState {
            down: false,
            ctrl: false,
            button: self.pointer.button,
        };
        self.prevent_update = false;
    }

    pub fn set_menu_open(&mut self, open: bool) {
        self.prevent_update = open;
    }

    pub fn set_scroll_offset(&mut self, scroll_offset: f64) {
        self.bounds.scroll_offset = scroll_offset;
    }
}
