//! Outbound cursor-move throttling.

/// Minimum gap between two transmitted cursor moves, in milliseconds.
pub const THROTTLE_THRESHOLD_MS: i64 = 25;

/// Lets a cursor move through only if more than the threshold elapsed since
/// the last one that went through. The first move always passes.
#[derive(Debug, Clone)]
pub struct OutboundRateLimiter {
    threshold_ms: i64,
    last_emit: Option<i64>,
}

impl Default for OutboundRateLimiter {
    fn default() -> Self {
        Self::new(THROTTLE_THRESHOLD_MS)
    }
}

impl OutboundRateLimiter {
    pub fn new(threshold_ms: i64) -> Self {
        Self {
            threshold_ms,
            last_emit: None,
        }
    }

    /// Returns `true` and records `now` when the move may be transmitted.
    pub fn try_acquire(&mut self, now: i64, prevent_update: bool) -> bool {
        if prevent_update {
            return false;
        }
        let allowed = match self.last_emit {
            Some(last) => now - last > self.threshold_ms,
            None => true,
        };
        if allowed {
            self.last_emit = Some(now);
        }
        allowed
    }

    pub fn last_emit(&self) -> Option<i64> {
        self.last_emit
    }
}
