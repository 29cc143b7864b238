// Export service - Snapshot of the filtered rows for CSV download
use crate::domain::event::{ErrorEvent, EventTable};
use crate::domain::filter::EventFilter;
use std::sync::Arc;

#[derive(Clone)]
pub struct ExportService {
    events: Arc<EventTable>,
}

impl ExportService {
    pub fn new(events: Arc<EventTable>) -> Self {
        Self { events }
    }

    /// Owned copy of the rows matching `filter`, in dataset order.
    pub fn filtered_rows(&self, filter: &EventFilter) -> Vec<ErrorEvent> {
        let rows: Vec<ErrorEvent> = filter
            .apply(self.events.events())
            .into_iter()
            .cloned()
            .collect();

        tracing::debug!(
            total = self.events.len(),
            exported = rows.len(),
            "Prepared export snapshot"
        );

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::VehicleId;
    use crate::domain::event::fixtures::event;
    use crate::domain::filter::{DateRange, Selection};

    #[test]
    fn test_filtered_rows_keep_dataset_order() {
        let events = vec![
            event(2, "WA009", "2024-01-05", 1.0),
            event(1, "WA041", "2024-01-02", 2.0),
            event(2, "WA066", "2024-01-01", 3.0),
        ];
        let service = ExportService::new(Arc::new(EventTable::new(events.clone())));
        let filter = EventFilter::new(
            Selection::only([VehicleId::Number(2)]),
            Selection::All,
            DateRange::default(),
        );
        assert_eq!(
            service.filtered_rows(&filter),
            vec![events[0].clone(), events[2].clone()]
        );
    }

    #[test]
    fn test_no_vehicles_selected_exports_nothing() {
        let service = ExportService::new(Arc::new(EventTable::new(vec![event(
            1,
            "WA009",
            "2024-01-05",
            1.0,
        )])));
        let filter = EventFilter::new(Selection::none(), Selection::All, DateRange::default());
        assert!(service.filtered_rows(&filter).is_empty());
    }
}
