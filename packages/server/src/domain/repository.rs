//! Repository trait 定義
//!
//! ドメイン層が必要とするセッションレジストリへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ClientId, Identity, Session, Timestamp};

/// Session Repository trait
///
/// 登録・解除・スナップショットはすべて同一のロックで直列化されること。
/// これにより、新規クライアントに渡すロスターが解除処理と競合しない。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// セッションを登録し、自分以外の接続中 Identity を参加順で返す
    async fn register(&self, identity: Identity, connected_at: Timestamp) -> Vec<Identity>;

    /// セッションを解除（存在しなければ None）
    async fn unregister(&self, client_id: &ClientId) -> Option<Identity>;

    /// 接続中の全 Identity を参加順で取得
    async fn snapshot(&self) -> Vec<Identity>;

    /// 接続中の全セッションを参加順で取得
    async fn sessions(&self) -> Vec<Session>;

    /// Identity を ID で検索
    async fn find(&self, client_id: &ClientId) -> Option<Identity>;

    /// 接続中の全てのクライアント ID を取得
    async fn get_all_connected_client_ids(&self) -> Vec<ClientId>;

    /// 接続中のクライアント数を取得
    async fn count_connected_clients(&self) -> usize;
}
