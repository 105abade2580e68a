//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! `Registry` エンティティを `tokio::sync::Mutex` で保護して保持します。
//! 登録・解除・スナップショットはすべてこのロックで直列化されます。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClientId, Identity, Registry, Session, SessionRepository, Timestamp};

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    registry: Arc<Mutex<Registry>>,
}

impl InMemorySessionRepository {
    pub fn new(registry: Arc<Mutex<Registry>>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn register(&self, identity: Identity, connected_at: Timestamp) -> Vec<Identity> {
        let mut registry = self.registry.lock().await;
        let client_id = identity.id.clone();
        let roster = registry.register(identity, connected_at);
        tracing::debug!(
            "Session '{}' registered ({} connected)",
            client_id.as_str(),
            registry.connected_count()
        );
        roster
    }

    async fn unregister(&self, client_id: &ClientId) -> Option<Identity> {
        let mut registry = self.registry.lock().await;
        let removed = registry.unregister(client_id);
        if removed.is_some() {
            tracing::debug!(
                "Session '{}' unregistered ({} connected)",
                client_id.as_str(),
                registry.connected_count()
            );
        }
        removed
    }

    async fn snapshot(&self) -> Vec<Identity> {
        self.registry.lock().await.snapshot()
    }

    async fn sessions(&self) -> Vec<Session> {
        self.registry.lock().await.sessions()
    }

    async fn find(&self, client_id: &ClientId) -> Option<Identity> {
        self.registry.lock().await.find(client_id).cloned()
    }

    async fn get_all_connected_client_ids(&self) -> Vec<ClientId> {
        self.registry.lock().await.connected_ids()
    }

    async fn count_connected_clients(&self) -> usize {
        self.registry.lock().await.connected_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IdentityFactory;

    fn create_test_repository() -> InMemorySessionRepository {
        InMemorySessionRepository::new(Arc::new(Mutex::new(Registry::new())))
    }

    fn id(value: &str) -> ClientId {
        ClientId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_register_and_snapshot() {
        // テスト項目: 登録したセッションがスナップショットに参加順で含まれる
        // given (前提条件):
        let repository = create_test_repository();
        repository
            .register(IdentityFactory::generate(id("alice")), Timestamp::new(1))
            .await;

        // when (操作):
        let roster = repository
            .register(IdentityFactory::generate(id("bob")), Timestamp::new(2))
            .await;
        let snapshot = repository.snapshot().await;

        // then (期待する結果):
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, id("alice"));
        let ids: Vec<ClientId> = snapshot.into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![id("alice"), id("bob")]);
    }

    #[tokio::test]
    async fn test_unregister_returns_removed_identity() {
        // テスト項目: 解除すると削除された Identity が返され、2 回目は None
        // given (前提条件):
        let repository = create_test_repository();
        let identity = IdentityFactory::generate(id("alice"));
        repository.register(identity.clone(), Timestamp::new(1)).await;

        // when (操作):
        let first = repository.unregister(&id("alice")).await;
        let second = repository.unregister(&id("alice")).await;

        // then (期待する結果):
        assert_eq!(first, Some(identity));
        assert_eq!(second, None);
        assert_eq!(repository.count_connected_clients().await, 0);
    }

    #[tokio::test]
    async fn test_find() {
        // テスト項目: ID で Identity を検索できる
        // given (前提条件):
        let repository = create_test_repository();
        repository
            .register(IdentityFactory::generate(id("alice")), Timestamp::new(1))
            .await;

        // when (操作):
        let found = repository.find(&id("alice")).await;
        let missing = repository.find(&id("bob")).await;

        // then (期待する結果):
        assert_eq!(found.map(|i| i.id), Some(id("alice")));
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_register_unregister_keeps_count() {
        // テスト項目: 並行に登録・解除しても接続数は (登録数 - 解除数) になる
        // given (前提条件):
        let repository = Arc::new(create_test_repository());
        let mut handles = Vec::new();

        // when (操作):
        for i in 0..50 {
            let repository = repository.clone();
            handles.push(tokio::spawn(async move {
                let client_id = id(&format!("client-{i}"));
                repository
                    .register(IdentityFactory::generate(client_id.clone()), Timestamp::new(i))
                    .await;
                if i % 2 == 0 {
                    repository.unregister(&client_id).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(repository.count_connected_clients().await, 25);
    }
}
