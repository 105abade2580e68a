//! UseCase: クライアント切断処理
//!
//! ### どのような状況を想定しているか
//! - 正常系：切断したクライアントがレジストリと MessagePusher から削除される
//! - 正常系：残りのクライアントに client_left が通知される
//! - エッジケース：既に削除済みのクライアントの切断（冪等）

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, SessionRepository};

use super::error::RelayError;

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// クライアント切断を実行
    ///
    /// レジストリから削除した後に送信キューを解除します。
    ///
    /// # Returns
    ///
    /// * `Some(Vec<ClientId>)` - client_left の通知対象（残りの全クライアント）
    /// * `None` - 既に登録されていなかった（通知不要）
    pub async fn execute(&self, client_id: ClientId) -> Option<Vec<ClientId>> {
        let removed = self.repository.unregister(&client_id).await;
        self.message_pusher.unregister_client(&client_id).await;

        removed?;
        Some(self.repository.get_all_connected_client_ids().await)
    }

    /// client_left を残りのクライアントにブロードキャスト
    pub async fn broadcast_client_left(
        &self,
        targets: Vec<ClientId>,
        message: &str,
    ) -> Result<(), RelayError> {
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| RelayError::BroadcastFailed(e.to_string()))
    }
}
