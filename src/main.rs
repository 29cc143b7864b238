// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::dashboard_service::DashboardService;
use crate::application::event_source::load_table;
use crate::application::export_service::ExportService;
use crate::domain::descriptor::DescriptorCatalog;
use crate::infrastructure::config::load_config;
use crate::infrastructure::csv_source::CsvEventSource;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vehicle_error_dashboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = load_config().context("failed to load config/dashboard")?;

    // Load the dataset once; every request reads this table
    let source = CsvEventSource::new(&config.dataset.path, config.dataset.columns.clone());
    let events = Arc::new(
        load_table(&source)
            .await
            .with_context(|| format!("failed to load dataset {}", config.dataset.path))?,
    );

    let catalog = Arc::new(DescriptorCatalog::builtin().with_overrides(
        config
            .descriptors
            .into_iter()
            .map(|entry| (entry.code, entry.description)),
    ));
    tracing::info!("Descriptor catalog holds {} entries", catalog.len());

    // Create services (application layer)
    let dashboard_service = DashboardService::new(events.clone(), catalog, config.reports);
    let export_service = ExportService::new(events);

    let state = Arc::new(AppState {
        dashboard_service,
        export_service,
        export_columns: config.dataset.columns,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    let addr: SocketAddr = config
        .server
        .listen_addr
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.listen_addr))?;
    tracing::info!("Starting vehicle-error-dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
