//! ドメイン層
//!
//! 接続中クライアントのレジストリと、イベント中継のルールを定義します。
//! 外部（WebSocket, HTTP, シリアライズ）には依存しません。

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod relay;
pub mod repository;
pub mod value_object;

pub use entity::{Identity, Registry, Session};
pub use error::ValueObjectError;
pub use factory::{ClientIdFactory, IdentityFactory};
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use relay::{LOCAL_CLIENT_ID, RelayKind, broadcast_targets};
pub use repository::SessionRepository;
pub use value_object::{ClientId, CursorColor, DisplayName, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
