//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{ClientSummaryDto, HealthDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto::ok())
}

/// Connected clients, in join order
pub async fn get_clients(State(state): State<Arc<AppState>>) -> Json<Vec<ClientSummaryDto>> {
    let sessions = state.get_roster_usecase.execute().await;

    Json(sessions.into_iter().map(ClientSummaryDto::from).collect())
}
