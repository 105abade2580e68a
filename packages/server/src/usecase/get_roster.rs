//! UseCase: 接続中クライアント一覧の取得（診断用 HTTP API 向け）

use std::sync::Arc;

use crate::domain::{Session, SessionRepository};

pub struct GetRosterUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetRosterUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 接続中の全セッションを参加順で返す
    pub async fn execute(&self) -> Vec<Session> {
        self.repository.sessions().await
    }
}
