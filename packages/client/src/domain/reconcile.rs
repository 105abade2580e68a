//! Maps remote cursor coordinates into the local viewport.
//!
//! Page content is centered in a column of [`CONTENT_MAX_WIDTH`]; the margin
//! left of that column differs between viewports, so x is shifted by the
//! difference of both margins. y is an absolute document coordinate and only
//! needs a visibility check against the local scroll window.

use super::view::{ClientBounds, RemoteClientView};

/// Width of the centered content column.
pub const CONTENT_MAX_WIDTH: f64 = 800.0;
/// Rendered cursor size.
pub const CURSOR_SIZE: f64 = 24.0;

/// Left margin of the content column for a viewport `viewport_width` wide.
pub fn margin(viewport_width: f64) -> f64 {
    ((viewport_width - CONTENT_MAX_WIDTH) / 2.0).max(0.0)
}

/// Translate a remote x into local coordinates.
pub fn adjust_x(remote_x: f64, local_width: f64, remote_width: f64) -> f64 {
    remote_x + (margin(local_width) - margin(remote_width))
}

/// Whether document y is inside `[scroll_offset, scroll_offset + height)`.
pub fn in_viewport(y: f64, local: &ClientBounds) -> bool {
    y >= local.scroll_offset && y < local.scroll_offset + local.height
}

/// Where a remote cursor is drawn locally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPosition {
    pub x: f64,
    pub y: f64,
    /// `false` when the cursor was clamped onto the viewport edge.
    pub in_viewport: bool,
}

/// Place an already adjusted remote position in the local viewport.
///
/// x is always kept inside the viewport width. y is only moved when the
/// cursor is outside the scroll window, onto the nearest edge.
pub fn reconcile(remote: &RemoteClientView, local: &ClientBounds) -> DisplayPosition {
    let visible = in_viewport(remote.y, local);
    let y = if visible {
        remote.y
    } else {
        let min_y = local.scroll_offset;
        let max_y = (local.scroll_offset + local.height - CURSOR_SIZE).max(min_y);
        remote.y.clamp(min_y, max_y)
    };

    DisplayPosition {
        x: remote.x.clamp(0.0, local.width.max(0.0)),
        y,
        in_viewport: visible,
    }
}
