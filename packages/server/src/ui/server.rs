//! Server execution logic.

use std::{collections::HashMap, convert::Infallible, str::FromStr, sync::Arc};

use axum::{Router, http::HeaderValue, routing::get};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    domain::Registry,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
    },
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetRosterUseCase, RelayEventUseCase,
    },
};

use super::{
    handler::{get_clients, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Allowed CORS origin. `*` allows any origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigin {
    Any,
    Exact(String),
}

impl FromStr for CorsOrigin {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "*" {
            Ok(CorsOrigin::Any)
        } else {
            Ok(CorsOrigin::Exact(s.to_string()))
        }
    }
}

impl CorsOrigin {
    fn layer(&self) -> CorsLayer {
        match self {
            CorsOrigin::Any => CorsLayer::permissive(),
            CorsOrigin::Exact(origin) => match HeaderValue::from_str(origin) {
                Ok(value) => CorsLayer::new().allow_origin(AllowOrigin::exact(value)),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}, allowing any", origin, e);
                    CorsLayer::permissive()
                }
            },
        }
    }
}

/// Cursor presence relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::in_memory(CorsOrigin::Any);
/// server.run("0.0.0.0".to_string(), 3000).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
    cors_origin: CorsOrigin,
}

impl Server {
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        relay_event_usecase: Arc<RelayEventUseCase>,
        get_roster_usecase: Arc<GetRosterUseCase>,
        cors_origin: CorsOrigin,
    ) -> Self {
        Self {
            app_state: Arc::new(AppState {
                connect_client_usecase,
                disconnect_client_usecase,
                relay_event_usecase,
                get_roster_usecase,
            }),
            cors_origin,
        }
    }

    /// Wire an in-memory registry and the WebSocket pusher into every usecase.
    pub fn in_memory(cors_origin: CorsOrigin) -> Self {
        // 1. Repository
        let registry = Arc::new(Mutex::new(Registry::new()));
        let repository = Arc::new(InMemorySessionRepository::new(registry));

        // 2. MessagePusher
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));

        // 3. UseCases
        let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        ));
        let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        ));
        let relay_event_usecase = Arc::new(RelayEventUseCase::new(
            repository.clone(),
            message_pusher,
        ));
        let get_roster_usecase = Arc::new(GetRosterUseCase::new(repository));

        Self::new(
            connect_client_usecase,
            disconnect_client_usecase,
            relay_event_usecase,
            get_roster_usecase,
            cors_origin,
        )
    }

    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/clients", get(get_clients))
            .layer(self.cors_origin.layer())
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Bind to `host:port` and serve until a shutdown signal arrives.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Cursor relay listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_origin_wildcard() {
        // テスト項目: "*" と空文字は任意のオリジンを許可する
        // given (前提条件):
        let inputs = ["*", "", "  "];

        // when (操作):
        let parsed: Vec<CorsOrigin> = inputs.iter().map(|s| s.parse().unwrap()).collect();

        // then (期待する結果):
        assert!(parsed.iter().all(|o| *o == CorsOrigin::Any));
    }

    #[test]
    fn test_cors_origin_exact() {
        // テスト項目: 具体的なオリジンはそのまま保持される
        // given (前提条件):
        let input = "https://cursors.example.com";

        // when (操作):
        let parsed: CorsOrigin = input.parse().unwrap();

        // then (期待する結果):
        assert_eq!(
            parsed,
            CorsOrigin::Exact("https://cursors.example.com".to_string())
        );
    }
}
