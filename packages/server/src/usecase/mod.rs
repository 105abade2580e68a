//! UseCase 層
//!
//! ドメイン層の Repository / MessagePusher を組み合わせて、
//! 接続・切断・イベント中継・ロスター取得のアプリケーションロジックを提供します。

pub mod connect_client;
pub mod disconnect_client;
pub mod error;
pub mod get_roster;
pub mod relay_event;

pub use connect_client::{ConnectClientUseCase, Registration};
pub use disconnect_client::DisconnectClientUseCase;
pub use error::RelayError;
pub use get_roster::GetRosterUseCase;
pub use relay_event::{RelayEnvelope, RelayEventUseCase};
