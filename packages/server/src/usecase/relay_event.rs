//! UseCase: クライアント発のイベント中継
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者以外の全クライアントに配信される
//! - 正常系：ping / gesture は送信者にも LOCAL_CLIENT としてエコーされる
//! - エッジケース：送信者しか接続していない（配信対象なし）
//! - エッジケース：既に切断された送信者からのイベント（何もしない）

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, RelayKind, SessionRepository, broadcast_targets};

use super::error::RelayError;

/// 中継するシリアライズ済みメッセージ
///
/// `for_sender` は送信者へのエコー（ID を LOCAL_CLIENT に置き換えたもの）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEnvelope {
    pub kind: RelayKind,
    pub for_others: String,
    pub for_sender: Option<String>,
}

/// イベント中継のユースケース
pub struct RelayEventUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayEventUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// イベント中継を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ClientId>)` - 配信対象のクライアント ID（送信者を除く）
    /// * `Err(RelayError)` - ブロードキャスト失敗
    pub async fn execute(
        &self,
        from_client_id: &ClientId,
        envelope: RelayEnvelope,
    ) -> Result<Vec<ClientId>, RelayError> {
        if self.repository.find(from_client_id).await.is_none() {
            tracing::debug!(
                "Dropping {} from unregistered client '{}'",
                envelope.kind.as_str(),
                from_client_id.as_str()
            );
            return Ok(Vec::new());
        }

        if envelope.kind.echoes_to_sender()
            && let Some(echo) = envelope.for_sender.as_deref()
            && let Err(e) = self.message_pusher.push_to(from_client_id, echo).await
        {
            tracing::warn!(
                "Failed to echo {} to '{}': {}",
                envelope.kind.as_str(),
                from_client_id.as_str(),
                e
            );
        }

        let all_client_ids = self.repository.get_all_connected_client_ids().await;
        let targets = broadcast_targets(all_client_ids, from_client_id);

        self.message_pusher
            .broadcast(targets.clone(), &envelope.for_others)
            .await
            .map_err(|e| RelayError::BroadcastFailed(e.to_string()))?;

        tracing::debug!(
            "Relayed {} from '{}' to {} client(s)",
            envelope.kind.as_str(),
            from_client_id.as_str(),
            targets.len()
        );

        Ok(targets)
    }
}
