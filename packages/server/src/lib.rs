//! Presence relay server library.
//!
//! Keeps the roster of connected pointers and fans ephemeral cursor events
//! (moves, focus changes, chat, pings, gestures) out to every other client.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
