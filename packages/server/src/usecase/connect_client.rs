//! UseCase: クライアント接続処理
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初のクライアントは空のロスターを受け取る
//! - 正常系：後続のクライアントは自分以外の全員を参加順で受け取る
//! - 正常系：client_joined は新規クライアント以外に配信される

use std::sync::Arc;

use cursors_shared::time::get_timestamp_millis;

use crate::domain::{
    ClientId, Identity, IdentityFactory, MessagePusher, PusherChannel, SessionRepository,
    Timestamp, broadcast_targets,
};

use super::error::RelayError;

/// 接続結果：自分の Identity と、接続時点の他クライアント一覧
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub identity: Identity,
    pub roster: Vec<Identity>,
}

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// クライアント接続を実行
    ///
    /// 名前と色を割り当て、送信キューを登録してからレジストリへ追加します。
    /// レジストリに見えている ID は常にブロードキャスト可能な状態になります。
    pub async fn execute(&self, client_id: ClientId, sender: PusherChannel) -> Registration {
        let identity = IdentityFactory::generate(client_id.clone());

        self.message_pusher.register_client(client_id, sender).await;

        let connected_at = Timestamp::new(get_timestamp_millis());
        let roster = self
            .repository
            .register(identity.clone(), connected_at)
            .await;

        Registration { identity, roster }
    }

    /// 新規クライアントの参加を他の全クライアントに通知
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ClientId>)` - 通知対象のクライアント ID
    /// * `Err(RelayError)` - ブロードキャスト失敗
    pub async fn broadcast_client_joined(
        &self,
        new_client_id: &ClientId,
        message: &str,
    ) -> Result<Vec<ClientId>, RelayError> {
        let all_client_ids = self.repository.get_all_connected_client_ids().await;
        let targets = broadcast_targets(all_client_ids, new_client_id);

        self.message_pusher
            .broadcast(targets.clone(), message)
            .await
            .map_err(|e| RelayError::BroadcastFailed(e.to_string()))?;

        Ok(targets)
    }
}
