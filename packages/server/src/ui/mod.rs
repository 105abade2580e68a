//! axum WebSocket / HTTP surface.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{CorsOrigin, Server};
