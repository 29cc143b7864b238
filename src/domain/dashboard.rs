// Dashboard domain model
use super::aggregate::{AggregateTable, GroupBy};
use super::descriptor::DescriptorCatalog;
use super::event::ErrorEvent;
use super::filter::EventFilter;
use super::period::Granularity;
use super::report::{
    HeatmapReport, Metric, Overview, RankedBarReport, TreemapHierarchy, TreemapReport,
    TrendReport, VehicleDurationReport,
};
use serde::{Deserialize, Serialize};

pub const NO_DATA_NOTICE: &str = "No data for the selected filters";

/// Report parameters shared by every dashboard request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub default_granularity: Granularity,
    pub ranked_bar_size: usize,
    pub top_vehicles_size: usize,
    pub heatmap_metric: Metric,
    pub treemap_hierarchy: TreemapHierarchy,
    pub treemap_metric: Metric,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            default_granularity: Granularity::Monthly,
            ranked_bar_size: 10,
            top_vehicles_size: 10,
            heatmap_metric: Metric::Count,
            treemap_hierarchy: TreemapHierarchy::ErrorCodeThenVehicle,
            treemap_metric: Metric::Duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub granularity: Granularity,
    pub filter: EventFilter,
    pub empty: bool,
    pub notices: Vec<String>,
    pub overview: Overview,
    pub trend: TrendReport,
    pub top_errors: RankedBarReport,
    pub top_vehicles: RankedBarReport,
    pub heatmap: HeatmapReport,
    pub treemap: TreemapReport,
    pub vehicle_durations: VehicleDurationReport,
}

impl Dashboard {
    /// Run the full pipeline over already-filtered events.
    pub fn build(
        events: &[&ErrorEvent],
        filter: EventFilter,
        granularity: Granularity,
        settings: &ReportSettings,
        catalog: &DescriptorCatalog,
    ) -> Self {
        let by_vehicle = AggregateTable::build(events, granularity, GroupBy::ErrorCodeAndVehicle);
        let by_code = by_vehicle.rollup();

        let empty = by_code.is_empty();
        let notices = if empty {
            vec![NO_DATA_NOTICE.to_string()]
        } else {
            Vec::new()
        };

        Self {
            title: format!("Vehicle Error Analysis ({})", granularity),
            granularity,
            filter,
            empty,
            notices,
            overview: Overview::from_events(events),
            trend: TrendReport::build(&by_code, catalog),
            top_errors: RankedBarReport::top_error_codes(&by_code, settings.ranked_bar_size, catalog),
            top_vehicles: RankedBarReport::top_vehicles(events, settings.top_vehicles_size),
            heatmap: HeatmapReport::build(&by_vehicle, settings.heatmap_metric),
            treemap: TreemapReport::build(
                &by_vehicle,
                settings.treemap_hierarchy,
                settings.treemap_metric,
                catalog,
            ),
            vehicle_durations: VehicleDurationReport::build(events),
        }
    }

    /// Empty dashboard for requests that could not be turned into a filter.
    pub fn rejected(
        granularity: Granularity,
        notice: String,
        settings: &ReportSettings,
        catalog: &DescriptorCatalog,
    ) -> Self {
        let mut dashboard = Self::build(
            &[],
            EventFilter::default(),
            granularity,
            settings,
            catalog,
        );
        dashboard.notices.insert(0, notice);
        dashboard
    }
}
