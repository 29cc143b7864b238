// Group-by aggregation of bucketed events
use crate::domain::event::{ErrorEvent, VehicleId};
use crate::domain::period::{BucketKey, Granularity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key columns of an aggregate table. Bucket and error code are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    ErrorCode,
    ErrorCodeAndVehicle,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct AggregateKey {
    bucket: BucketKey,
    error_code: String,
    vehicle_id: Option<VehicleId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub bucket: BucketKey,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<VehicleId>,
    pub count: u64,
    pub total_duration: f64,
}

impl AggregateRow {
    fn key(&self) -> AggregateKey {
        AggregateKey {
            bucket: self.bucket,
            error_code: self.error_code.clone(),
            vehicle_id: self.vehicle_id.clone(),
        }
    }
}

/// Aggregated counts and durations, ordered by (bucket, code, vehicle).
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTable {
    granularity: Granularity,
    group_by: GroupBy,
    rows: Vec<AggregateRow>,
    code_durations: BTreeMap<String, f64>,
}

impl AggregateTable {
    /// Count and sum durations per key, then join both sums on the key.
    pub fn build(events: &[&ErrorEvent], granularity: Granularity, group_by: GroupBy) -> Self {
        let mut counts: BTreeMap<AggregateKey, u64> = BTreeMap::new();
        let mut durations: BTreeMap<AggregateKey, f64> = BTreeMap::new();
        let mut code_durations: BTreeMap<String, f64> = BTreeMap::new();

        for event in events {
            let key = AggregateKey {
                bucket: granularity.bucket(event.timestamp),
                error_code: event.error_code.clone(),
                vehicle_id: match group_by {
                    GroupBy::ErrorCode => None,
                    GroupBy::ErrorCodeAndVehicle => Some(event.vehicle_id.clone()),
                },
            };
            *counts.entry(key.clone()).or_default() += 1;
            *durations.entry(key).or_default() += event.duration_minutes;
            *code_durations.entry(event.error_code.clone()).or_default() += event.duration_minutes;
        }

        Self {
            granularity,
            group_by,
            rows: join(counts, &durations),
            code_durations,
        }
    }

    /// Collapse the vehicle column so the table is keyed by (bucket, code).
    pub fn rollup(&self) -> Self {
        if self.group_by == GroupBy::ErrorCode {
            return self.clone();
        }

        let mut counts: BTreeMap<AggregateKey, u64> = BTreeMap::new();
        let mut durations: BTreeMap<AggregateKey, f64> = BTreeMap::new();
        for row in &self.rows {
            let key = AggregateKey {
                vehicle_id: None,
                ..row.key()
            };
            *counts.entry(key.clone()).or_default() += row.count;
            *durations.entry(key).or_default() += row.total_duration;
        }

        Self {
            granularity: self.granularity,
            group_by: GroupBy::ErrorCode,
            rows: join(counts, &durations),
            code_durations: self.code_durations.clone(),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn group_by(&self) -> GroupBy {
        self.group_by
    }

    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct buckets in chronological order.
    pub fn buckets(&self) -> Vec<BucketKey> {
        let mut buckets: Vec<BucketKey> = self.rows.iter().map(|r| r.bucket).collect();
        buckets.dedup();
        buckets
    }

    /// Total duration of a code across all buckets of the filtered rows.
    pub fn code_duration(&self, error_code: &str) -> f64 {
        self.code_durations.get(error_code).copied().unwrap_or(0.0)
    }

    #[cfg(test)]
    pub fn total_count(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    #[cfg(test)]
    pub fn total_duration(&self) -> f64 {
        self.rows.iter().map(|r| r.total_duration).sum()
    }
}

fn join(
    counts: BTreeMap<AggregateKey, u64>,
    durations: &BTreeMap<AggregateKey, f64>,
) -> Vec<AggregateRow> {
    counts
        .into_iter()
        .filter_map(|(key, count)| {
            durations.get(&key).map(|&total_duration| AggregateRow {
                bucket: key.bucket,
                error_code: key.error_code,
                vehicle_id: key.vehicle_id,
                count,
                total_duration,
            })
        })
        .collect()
}
