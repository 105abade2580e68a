//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, GetRosterUseCase, RelayEventUseCase,
};

/// Handed to every connection through axum's `State` extractor.
pub struct AppState {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub relay_event_usecase: Arc<RelayEventUseCase>,
    pub get_roster_usecase: Arc<GetRosterUseCase>,
}
