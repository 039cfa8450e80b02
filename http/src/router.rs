use crate::metrics::handler;
use axum::{
    routing::get,
    Router,
};
use rds_exporter_collector::Orchestrator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

pub fn create_router(orchestrator: Arc<Orchestrator>, metrics_path: &str) -> Router {
    let state = AppState { orchestrator };

    Router::new()
        .route("/healthz", get(healthz))
        .route(metrics_path, get(handler))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
