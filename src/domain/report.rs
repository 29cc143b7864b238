// Chart-ready report shapes built from aggregate tables
use crate::domain::aggregate::{AggregateTable, GroupBy};
use crate::domain::descriptor::DescriptorCatalog;
use crate::domain::event::{ErrorEvent, VehicleId};
use crate::domain::period::BucketKey;
use crate::domain::ranking::{top_error_codes, top_vehicles};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Value plotted by the heatmap and treemap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Count,
    Duration,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::Count => "Number of Errors",
            Metric::Duration => "Total Time Spent (min)",
        }
    }

    fn pick(self, count: u64, duration: f64) -> f64 {
        match self {
            Metric::Count => count as f64,
            Metric::Duration => duration,
        }
    }
}

/// Parent → child order of the treemap levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreemapHierarchy {
    #[default]
    ErrorCodeThenVehicle,
    VehicleThenErrorCode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_errors: u64,
    pub total_duration: f64,
    pub vehicles_affected: usize,
}

impl Overview {
    pub fn from_events(events: &[&ErrorEvent]) -> Self {
        let vehicles: BTreeSet<&VehicleId> = events.iter().map(|e| &e.vehicle_id).collect();
        Self {
            total_errors: events.len() as u64,
            total_duration: events.iter().map(|e| e.duration_minutes).sum(),
            vehicles_affected: vehicles.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub bucket: BucketKey,
    pub count: u64,
    pub total_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub error_code: String,
    pub description: String,
    /// Duration of this code summed over every bucket.
    pub total_duration: f64,
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<TrendSeries>,
    /// All codes combined, one point per bucket.
    pub totals: Vec<TrendPoint>,
}

impl TrendReport {
    /// Expects a table keyed by (bucket, code).
    pub fn build(table: &AggregateTable, catalog: &DescriptorCatalog) -> Self {
        debug_assert_eq!(table.group_by(), GroupBy::ErrorCode);

        let mut by_code: BTreeMap<&str, Vec<TrendPoint>> = BTreeMap::new();
        let mut totals: BTreeMap<BucketKey, TrendPoint> = BTreeMap::new();
        for row in table.rows() {
            by_code.entry(&row.error_code).or_default().push(TrendPoint {
                bucket: row.bucket,
                count: row.count,
                total_duration: row.total_duration,
            });
            let total = totals.entry(row.bucket).or_insert(TrendPoint {
                bucket: row.bucket,
                count: 0,
                total_duration: 0.0,
            });
            total.count += row.count;
            total.total_duration += row.total_duration;
        }

        let series = by_code
            .into_iter()
            .map(|(code, points)| TrendSeries {
                error_code: code.to_string(),
                description: catalog.describe(code).to_string(),
                total_duration: table.code_duration(code),
                points,
            })
            .collect();

        Self {
            x_label: table.granularity().unit().to_string(),
            y_label: "Number of Errors".to_string(),
            series,
            totals: totals.into_values().collect(),
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBar {
    pub label: String,
    pub count: u64,
    pub total_duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBarReport {
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<RankedBar>,
}

impl RankedBarReport {
    pub fn top_error_codes(table: &AggregateTable, n: usize, catalog: &DescriptorCatalog) -> Self {
        let bars = top_error_codes(table, n)
            .into_iter()
            .map(|ranked| RankedBar {
                description: Some(catalog.describe(&ranked.key).to_string()),
                label: ranked.key,
                count: ranked.count,
                total_duration: ranked.total_duration,
            })
            .collect();
        Self {
            x_label: "Error Code".to_string(),
            y_label: "Number of Errors".to_string(),
            bars,
        }
    }

    pub fn top_vehicles(events: &[&ErrorEvent], n: usize) -> Self {
        let bars = top_vehicles(events, n)
            .into_iter()
            .map(|ranked| RankedBar {
                label: ranked.key.to_string(),
                count: ranked.count,
                total_duration: ranked.total_duration,
                description: None,
            })
            .collect();
        Self {
            x_label: "Vehicle".to_string(),
            y_label: "Number of Errors".to_string(),
            bars,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Dense vehicles × buckets matrix; `values[row][column]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapReport {
    pub metric: Metric,
    pub x_label: String,
    pub y_label: String,
    pub value_label: String,
    pub vehicles: Vec<VehicleId>,
    pub buckets: Vec<BucketKey>,
    pub values: Vec<Vec<f64>>,
}

impl HeatmapReport {
    /// Expects a table keyed by (bucket, code, vehicle).
    pub fn build(table: &AggregateTable, metric: Metric) -> Self {
        debug_assert_eq!(table.group_by(), GroupBy::ErrorCodeAndVehicle);

        let mut cells: BTreeMap<(&VehicleId, BucketKey), f64> = BTreeMap::new();
        for row in table.rows() {
            if let Some(vehicle) = &row.vehicle_id {
                *cells.entry((vehicle, row.bucket)).or_default() +=
                    metric.pick(row.count, row.total_duration);
            }
        }

        let vehicles: Vec<VehicleId> = cells
            .keys()
            .map(|(vehicle, _)| *vehicle)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect();
        let buckets = table.buckets();
        let values = vehicles
            .iter()
            .map(|vehicle| {
                buckets
                    .iter()
                    .map(|bucket| cells.get(&(vehicle, *bucket)).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();

        Self {
            metric,
            x_label: table.granularity().unit().to_string(),
            y_label: "Vehicle".to_string(),
            value_label: metric.label().to_string(),
            vehicles,
            buckets,
            values,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapNode {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreemapNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapReport {
    pub hierarchy: TreemapHierarchy,
    pub metric: Metric,
    pub value_label: String,
    pub roots: Vec<TreemapNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum TreemapLabel<'a> {
    Code(&'a str),
    Vehicle(&'a VehicleId),
}

impl TreemapLabel<'_> {
    fn node(&self, value: f64, catalog: &DescriptorCatalog, children: Vec<TreemapNode>) -> TreemapNode {
        match self {
            TreemapLabel::Code(code) => TreemapNode {
                label: code.to_string(),
                value,
                description: Some(catalog.describe(code).to_string()),
                children,
            },
            TreemapLabel::Vehicle(vehicle) => TreemapNode {
                label: vehicle.to_string(),
                value,
                description: None,
                children,
            },
        }
    }
}

impl TreemapReport {
    /// Expects a table keyed by (bucket, code, vehicle). Buckets are summed away.
    pub fn build(
        table: &AggregateTable,
        hierarchy: TreemapHierarchy,
        metric: Metric,
        catalog: &DescriptorCatalog,
    ) -> Self {
        debug_assert_eq!(table.group_by(), GroupBy::ErrorCodeAndVehicle);

        let mut tree: BTreeMap<TreemapLabel<'_>, BTreeMap<TreemapLabel<'_>, f64>> = BTreeMap::new();
        for row in table.rows() {
            let Some(vehicle) = &row.vehicle_id else {
                continue;
            };
            let code = TreemapLabel::Code(&row.error_code);
            let vehicle = TreemapLabel::Vehicle(vehicle);
            let (parent, child) = match hierarchy {
                TreemapHierarchy::ErrorCodeThenVehicle => (code, vehicle),
                TreemapHierarchy::VehicleThenErrorCode => (vehicle, code),
            };
            *tree.entry(parent).or_default().entry(child).or_default() +=
                metric.pick(row.count, row.total_duration);
        }

        let roots = tree
            .into_iter()
            .map(|(parent, children)| {
                let children: Vec<TreemapNode> = children
                    .into_iter()
                    .map(|(child, value)| child.node(value, catalog, Vec::new()))
                    .collect();
                let value = children.iter().map(|c| c.value).sum();
                parent.node(value, catalog, children)
            })
            .collect();

        Self {
            hierarchy,
            metric,
            value_label: metric.label().to_string(),
            roots,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleDuration {
    pub vehicle_id: VehicleId,
    pub total_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleDurationReport {
    pub x_label: String,
    pub y_label: String,
    pub totals: Vec<VehicleDuration>,
}

impl VehicleDurationReport {
    pub fn build(events: &[&ErrorEvent]) -> Self {
        let mut totals: BTreeMap<&VehicleId, f64> = BTreeMap::new();
        for event in events {
            *totals.entry(&event.vehicle_id).or_default() += event.duration_minutes;
        }
        Self {
            x_label: "Vehicle".to_string(),
            y_label: "Total Time (min)".to_string(),
            totals: totals
                .into_iter()
                .map(|(vehicle_id, total_duration)| VehicleDuration {
                    vehicle_id: vehicle_id.clone(),
                    total_duration,
                })
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptor::NO_DESCRIPTION;
    use crate::domain::event::fixtures::event;
    use crate::domain::period::Granularity;

    fn sample() -> Vec<ErrorEvent> {
        vec![
            event(1, "WA009", "2024-01-03", 10.0),
            event(2, "WA009", "2024-01-20", 4.0),
            event(1, "WA099", "2024-02-21", 2.5),
            event(3, "WA009", "2024-03-02", 1.5),
        ]
    }

    fn fine(events: &[ErrorEvent]) -> AggregateTable {
        let refs: Vec<&ErrorEvent> = events.iter().collect();
        AggregateTable::build(&refs, Granularity::Monthly, GroupBy::ErrorCodeAndVehicle)
    }

    #[test]
    fn test_trend_series_per_code() {
        let events = sample();
        let catalog = DescriptorCatalog::builtin();
        let trend = TrendReport::build(&fine(&events).rollup(), &catalog);

        assert_eq!(trend.x_label, "Month");
        assert_eq!(trend.series.len(), 2);
        let wa009 = &trend.series[0];
        assert_eq!(wa009.error_code, "WA009");
        let points: Vec<(String, u64)> = wa009.points.iter().map(|p| (p.bucket.label(), p.count)).collect();
        assert_eq!(
            points,
            vec![("2024-01".to_string(), 2), ("2024-03".to_string(), 1)]
        );
        assert_eq!(trend.series[1].description, NO_DESCRIPTION);
        assert_eq!(trend.totals.len(), 3);
    }

    #[test]
    fn test_trend_series_carry_code_totals() {
        let events = vec![
            event(1, "WA009", "2024-01-03", 10.0),
            event(2, "WA009", "2024-02-11", 4.0),
            event(3, "WA009", "2024-04-30", 0.5),
            event(1, "WA041", "2024-02-12", 2.5),
        ];
        let catalog = DescriptorCatalog::builtin();
        let trend = TrendReport::build(&fine(&events).rollup(), &catalog);

        let totals: Vec<(&str, usize, f64)> = trend
            .series
            .iter()
            .map(|s| (s.error_code.as_str(), s.points.len(), s.total_duration))
            .collect();
        assert_eq!(totals, vec![("WA009", 3, 14.5), ("WA041", 1, 2.5)]);

        let json = serde_json::to_value(&trend).unwrap();
        assert_eq!(json["series"][1]["total_duration"], 2.5);
    }

    #[test]
    fn test_heatmap_is_dense() {
        let events = sample();
        let heatmap = HeatmapReport::build(&fine(&events), Metric::Count);

        assert_eq!(
            heatmap.vehicles,
            vec![VehicleId::Number(1), VehicleId::Number(2), VehicleId::Number(3)]
        );
        assert_eq!(heatmap.buckets.len(), 3);
        assert_eq!(heatmap.values.len(), heatmap.vehicles.len());
        assert!(heatmap.values.iter().all(|row| row.len() == heatmap.buckets.len()));
        assert_eq!(heatmap.values[0], vec![1.0, 1.0, 0.0]);
        assert_eq!(heatmap.values[2], vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_heatmap_duration_metric() {
        let events = vec![
            event(1, "WA009", "2024-01-03", 10.0),
            event(1, "WA041", "2024-01-04", 5.0),
        ];
        let heatmap = HeatmapReport::build(&fine(&events), Metric::Duration);
        assert_eq!(heatmap.values, vec![vec![15.0]]);
        assert_eq!(heatmap.value_label, "Total Time Spent (min)");
    }

    #[test]
    fn test_treemap_code_then_vehicle() {
        let events = sample();
        let catalog = DescriptorCatalog::builtin();
        let treemap = TreemapReport::build(
            &fine(&events),
            TreemapHierarchy::ErrorCodeThenVehicle,
            Metric::Duration,
            &catalog,
        );

        assert_eq!(treemap.roots.len(), 2);
        let root = &treemap.roots[0];
        assert_eq!(root.label, "WA009");
        assert_eq!(root.value, 15.5);
        assert!(root.description.is_some());
        let children: Vec<(&str, f64)> = root.children.iter().map(|c| (c.label.as_str(), c.value)).collect();
        assert_eq!(children, vec![("1", 10.0), ("2", 4.0), ("3", 1.5)]);
    }

    #[test]
    fn test_treemap_vehicle_then_code() {
        let events = sample();
        let catalog = DescriptorCatalog::builtin();
        let treemap = TreemapReport::build(
            &fine(&events),
            TreemapHierarchy::VehicleThenErrorCode,
            Metric::Count,
            &catalog,
        );

        let root = &treemap.roots[0];
        assert_eq!(root.label, "1");
        assert_eq!(root.value, 2.0);
        assert_eq!(root.description, None);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].description.as_deref(), Some(NO_DESCRIPTION));
    }

    #[test]
    fn test_reports_tolerate_empty_input() {
        let catalog = DescriptorCatalog::builtin();
        let table = AggregateTable::build(&[], Granularity::Daily, GroupBy::ErrorCodeAndVehicle);

        assert!(TrendReport::build(&table.rollup(), &catalog).is_empty());
        assert!(RankedBarReport::top_error_codes(&table.rollup(), 10, &catalog).is_empty());
        assert!(HeatmapReport::build(&table, Metric::Count).is_empty());
        assert!(
            TreemapReport::build(&table, TreemapHierarchy::default(), Metric::Count, &catalog)
                .is_empty()
        );
        assert!(VehicleDurationReport::build(&[]).is_empty());
    }

    #[test]
    fn test_vehicle_durations_and_overview() {
        let events = sample();
        let refs: Vec<&ErrorEvent> = events.iter().collect();

        let durations = VehicleDurationReport::build(&refs);
        assert_eq!(durations.totals[0].vehicle_id, VehicleId::Number(1));
        assert_eq!(durations.totals[0].total_duration, 12.5);

        let overview = Overview::from_events(&refs);
        assert_eq!(overview.total_errors, 4);
        assert_eq!(overview.total_duration, 18.0);
        assert_eq!(overview.vehicles_affected, 3);
    }

    #[test]
    fn test_monthly_trend_over_thirteen_months() {
        let codes = ["WA009", "WA041"];
        let events: Vec<ErrorEvent> = (0..100)
            .map(|i| {
                let month_offset = i % 13;
                let (year, month) = if month_offset < 12 {
                    (2023, month_offset + 1)
                } else {
                    (2024, 1)
                };
                let date = format!("{}-{:02}-{:02}", year, month, (i % 28) + 1);
                event((i % 3) as i64 + 1, codes[(i % 2) as usize], &date, 1.0)
            })
            .collect();
        let catalog = DescriptorCatalog::builtin();
        let trend = TrendReport::build(&fine(&events).rollup(), &catalog);

        assert_eq!(trend.series.len(), 2);
        for series in &trend.series {
            assert!(series.points.len() <= 13);
        }
        assert_eq!(trend.totals.len(), 13);
        assert_eq!(trend.totals.iter().map(|p| p.count).sum::<u64>(), 100);
    }
}
