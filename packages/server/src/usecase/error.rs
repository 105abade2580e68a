//! UseCase 層のエラー定義

use thiserror::Error;

/// イベント中継のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("Failed to broadcast: {0}")]
    BroadcastFailed(String),
}
