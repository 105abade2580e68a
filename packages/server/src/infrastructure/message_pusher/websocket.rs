//! WebSocket を使った MessagePusher 実装
//!
//! WebSocket 接続の受付と writer タスクの生成は UI 層（`ui/handler/websocket.rs`）が行い、
//! この実装は各接続の送信キュー（`PusherChannel`）だけを管理します。
//! キューへの送信はノンブロッキングで、実際のソケット書き込みは writer タスクが行います。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClientId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    clients: Arc<Mutex<HashMap<ClientId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(clients: Arc<Mutex<HashMap<ClientId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", client_id.as_str());
        clients.insert(client_id, sender);
    }

    async fn unregister_client(&self, client_id: &ClientId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(client_id).is_some() {
            tracing::debug!(
                "Client '{}' unregistered from MessagePusher",
                client_id.as_str()
            );
        }
    }

    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let Some(sender) = clients.get(client_id) else {
            return Err(MessagePushError::ClientNotFound(
                client_id.as_str().to_string(),
            ));
        };
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", client_id.as_str());
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!(
                            "Failed to push message to client '{}': {}",
                            target.as_str(),
                            e
                        );
                    }
                }
                None => {
                    tracing::warn!(
                        "Client '{}' not found during broadcast, skipping",
                        target.as_str()
                    );
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn create_test_pusher() -> WebSocketMessagePusher {
        WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new())))
    }

    fn id(value: &str) -> ClientId {
        ClientId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_registered_client() {
        // テスト項目: 登録済みのクライアントにメッセージを送信できる
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(id("alice"), tx).await;

        // when (操作):
        let result = pusher.push_to(&id("alice"), "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_unknown_client() {
        // テスト項目: 存在しないクライアントへの送信は ClientNotFound
        // given (前提条件):
        let pusher = create_test_pusher();

        // when (操作):
        let result = pusher.push_to(&id("nobody"), "Hello").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound("nobody".to_string()))
        );
    }

    #[tokio::test]
    async fn test_push_to_closed_channel() {
        // テスト項目: 受信側が閉じたキューへの送信は PushFailed
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_client(id("alice"), tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&id("alice"), "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_missing_and_closed_targets() {
        // テスト項目: ブロードキャストは存在しない・閉じたキューがあっても成功する
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx_alice, mut rx_alice) = mpsc::unbounded_channel();
        let (tx_bob, rx_bob) = mpsc::unbounded_channel();
        pusher.register_client(id("alice"), tx_alice).await;
        pusher.register_client(id("bob"), tx_bob).await;
        drop(rx_bob);

        // when (操作):
        let result = pusher
            .broadcast(vec![id("alice"), id("bob"), id("nobody")], "Broadcast")
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx_alice.recv().await, Some("Broadcast".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_client() {
        // テスト項目: 登録解除後は送信できない
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(id("alice"), tx).await;

        // when (操作):
        pusher.unregister_client(&id("alice")).await;

        // then (期待する結果):
        assert!(pusher.push_to(&id("alice"), "Hello").await.is_err());
    }

    #[tokio::test]
    async fn test_per_recipient_order_is_preserved() {
        // テスト項目: 同じ受信者へのメッセージは送信順に届く
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(id("bob"), tx).await;

        // when (操作):
        for i in 0..10 {
            pusher
                .broadcast(vec![id("bob")], &format!("msg-{i}"))
                .await
                .unwrap();
        }

        // then (期待する結果):
        for i in 0..10 {
            assert_eq!(rx.recv().await, Some(format!("msg-{i}")));
        }
    }
}
