// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    describe_code, export_csv, filter_options, get_dashboard, health_check,
};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/options", get(filter_options))
        .route("/dashboard", get(get_dashboard))
        .route("/export", get(export_csv))
        .route("/descriptors/:code", get(describe_code))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
