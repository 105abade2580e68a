//! Pointer gesture detection from trigger-zone crossings.
//!
//! Four zones surround the cursor, each with a code:
//!
//! ```text
//!        [1]
//!    [4]     [2]
//!        [3]
//! ```
//!
//! The last four zone entries are multiplied. When the same product repeats
//! for consecutive windows and the window spans less than
//! [`WINDOW_SPAN_MS`], it is classified: `24` (1·2·3·4) circle, `9` (1·3·1·3)
//! vertical, `64` (2·4·2·4) horizontal.

use std::collections::VecDeque;

use cursors_server::infrastructure::dto::websocket::GestureKind;

pub const WINDOW_SIZE: usize = 4;
/// Oldest-to-newest span a window must stay under.
pub const WINDOW_SPAN_MS: i64 = 800;
/// Minimum gap between two emitted gestures.
pub const EMIT_THRESHOLD_MS: i64 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerZone {
    Top,
    Right,
    Bottom,
    Left,
}

impl TriggerZone {
    pub fn code(self) -> u32 {
        match self {
            TriggerZone::Top => 1,
            TriggerZone::Right => 2,
            TriggerZone::Bottom => 3,
            TriggerZone::Left => 4,
        }
    }
}

impl std::str::FromStr for TriggerZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(TriggerZone::Top),
            "right" => Ok(TriggerZone::Right),
            "bottom" => Ok(TriggerZone::Bottom),
            "left" => Ok(TriggerZone::Left),
            other => Err(other.to_string()),
        }
    }
}

/// Classify a window product.
pub fn classify(product: u32) -> Option<GestureKind> {
    match product {
        24 => Some(GestureKind::Circle),
        9 => Some(GestureKind::Vertical),
        64 => Some(GestureKind::Horizontal),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureSample {
    pub timestamp: i64,
    pub zone: TriggerZone,
}

#[derive(Debug, Clone, Default)]
pub struct GestureRecognizer {
    window: VecDeque<GestureSample>,
    previous_product: Option<u32>,
    last_emit: Option<i64>,
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the cursor entering `zone` at `now` (epoch ms).
    ///
    /// Ignored entirely while the pointer button is held.
    pub fn enter_zone(&mut self, zone: TriggerZone, now: i64, pointer_down: bool) -> Option<GestureKind> {
        if pointer_down {
            return None;
        }

        if self.window.len() == WINDOW_SIZE {
            self.window.pop_front();
        }
        self.window.push_back(GestureSample {
            timestamp: now,
            zone,
        });
        if self.window.len() < WINDOW_SIZE {
            return None;
        }

        let product: u32 = self.window.iter().map(|sample| sample.zone.code()).product();
        let oldest = self.window.front().map_or(now, |sample| sample.timestamp);
        let is_recent = now - oldest < WINDOW_SPAN_MS;
        let repeated = self.previous_product == Some(product);
        self.previous_product = Some(product);

        if !(is_recent && repeated) {
            return None;
        }

        let gesture = classify(product);
        let debounced = self
            .last_emit
            .is_some_and(|last| now - last <= EMIT_THRESHOLD_MS);
        // Continuous motion keeps pushing the debounce mark forward.
        self.last_emit = Some(now);

        if debounced { None } else { gesture }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
