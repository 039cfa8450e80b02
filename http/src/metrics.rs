use crate::{
    error::AppError,
    router::AppState,
};
use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};
use prometheus::{
    Encoder,
    TextEncoder,
};
use rds_exporter_collector::Collector;

/// Collected RDS families followed by the exporter's own metrics, in text exposition format.
pub async fn handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut families = state.orchestrator.collect().await;
    families.extend(state.orchestrator.metrics().gather());

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&families, &mut buffer)?;

    Ok(([(CONTENT_TYPE, encoder.format_type().to_string())], buffer))
}
