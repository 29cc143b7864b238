// Dashboard service - Use case for building dashboards
use crate::domain::dashboard::{Dashboard, ReportSettings};
use crate::domain::descriptor::DescriptorCatalog;
use crate::domain::event::{EventTable, VehicleId};
use crate::domain::filter::EventFilter;
use crate::domain::period::Granularity;
use crate::error::DashboardError;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// One user interaction: the active filter plus the chosen granularity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardRequest {
    pub filter: EventFilter,
    pub granularity: Granularity,
}

/// Values a client can offer in its filter widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub vehicles: Vec<VehicleId>,
    pub error_codes: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub granularities: Vec<Granularity>,
    pub default_granularity: Granularity,
}

#[derive(Clone)]
pub struct DashboardService {
    events: Arc<EventTable>,
    catalog: Arc<DescriptorCatalog>,
    settings: ReportSettings,
}

impl DashboardService {
    pub fn new(
        events: Arc<EventTable>,
        catalog: Arc<DescriptorCatalog>,
        settings: ReportSettings,
    ) -> Self {
        Self {
            events,
            catalog,
            settings,
        }
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Recompute every report from the shared table for one request.
    pub fn get_dashboard(&self, request: &DashboardRequest) -> Dashboard {
        let started = Instant::now();
        let filtered = request.filter.apply(self.events.events());

        let dashboard = Dashboard::build(
            &filtered,
            request.filter.clone(),
            request.granularity,
            &self.settings,
            &self.catalog,
        );

        tracing::debug!(
            total = self.events.len(),
            matched = filtered.len(),
            granularity = %request.granularity,
            start = ?request.filter.dates.start(),
            end = ?request.filter.dates.end(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Rebuilt dashboard"
        );

        dashboard
    }

    /// Empty dashboard carrying the reason the request was rejected.
    pub fn rejected_dashboard(&self, granularity: Granularity, error: &DashboardError) -> Dashboard {
        tracing::warn!("Rejected dashboard request: {}", error);
        Dashboard::rejected(granularity, error.to_string(), &self.settings, &self.catalog)
    }

    pub fn filter_options(&self) -> FilterOptions {
        let bounds = self.events.date_bounds();
        FilterOptions {
            vehicles: self.events.vehicles(),
            error_codes: self.events.error_codes(),
            start_date: bounds.map(|(start, _)| start),
            end_date: bounds.map(|(_, end)| end),
            granularities: Granularity::ALL.to_vec(),
            default_granularity: self.settings.default_granularity,
        }
    }

    pub fn describe(&self, error_code: &str) -> &str {
        self.catalog.describe(error_code)
    }
}
