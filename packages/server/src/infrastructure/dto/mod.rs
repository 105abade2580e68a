//! Data Transfer Objects (DTOs).
//!
//! DTOs are organized by protocol:
//! - `websocket`: named WebSocket events (`{"event": ..., "data": ...}`)
//! - `http`: diagnostic HTTP API responses

pub mod conversion;
pub mod http;
pub mod websocket;
