// Top-N ranking by descending count with stable tie-break
use crate::domain::aggregate::AggregateTable;
use crate::domain::event::{ErrorEvent, VehicleId};
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<K> {
    pub key: K,
    pub count: u64,
    pub total_duration: f64,
}

/// Sum (count, duration) per key, sort by count descending and keep `n`.
///
/// Keys with equal counts keep the order in which they were first seen.
pub fn top_n<K, I>(entries: I, n: usize) -> Vec<Ranked<K>>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = (K, u64, f64)>,
{
    let mut ranked: Vec<Ranked<K>> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for (key, count, duration) in entries {
        match index.get(&key) {
            Some(&position) => {
                ranked[position].count += count;
                ranked[position].total_duration += duration;
            }
            None => {
                index.insert(key.clone(), ranked.len());
                ranked.push(Ranked {
                    key,
                    count,
                    total_duration: duration,
                });
            }
        }
    }

    // sort_by is stable
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}

pub fn top_error_codes(table: &AggregateTable, n: usize) -> Vec<Ranked<String>> {
    top_n(
        table
            .rows()
            .iter()
            .map(|r| (r.error_code.clone(), r.count, r.total_duration)),
        n,
    )
}

pub fn top_vehicles(events: &[&ErrorEvent], n: usize) -> Vec<Ranked<VehicleId>> {
    top_n(
        events
            .iter()
            .map(|e| (e.vehicle_id.clone(), 1, e.duration_minutes)),
        n,
    )
}
