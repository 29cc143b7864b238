// Event source trait for the one-time dataset load
use crate::domain::event::{ErrorEvent, EventTable};
use crate::error::DashboardError;
use async_trait::async_trait;
use std::time::Instant;

#[async_trait]
pub trait EventSource: Send + Sync {
    /// Human readable location of the dataset, used in logs
    fn location(&self) -> String;

    /// Read and parse every event. Any malformed row fails the whole load.
    async fn load_events(&self) -> Result<Vec<ErrorEvent>, DashboardError>;
}

/// Load the dataset once into an immutable table.
pub async fn load_table(source: &dyn EventSource) -> Result<EventTable, DashboardError> {
    let started = Instant::now();
    let events = source.load_events().await?;
    let table = EventTable::new(events);
    if table.is_empty() {
        tracing::warn!("Dataset {} contains no events", source.location());
    }

    tracing::info!(
        source = %source.location(),
        events = table.len(),
        vehicles = table.vehicles().len(),
        error_codes = table.error_codes().len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Loaded event dataset"
    );

    Ok(table)
}
