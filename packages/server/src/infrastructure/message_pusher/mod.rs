//! メッセージ送信（通知）の実装
//!
//! - `websocket`: クライアントごとの送信キュー（WebSocket の writer タスクが消費）

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
