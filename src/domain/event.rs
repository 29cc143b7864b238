// Diagnostic event domain model
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Opaque vehicle identifier. Numeric ids sort numerically and before textual ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleId {
    Number(i64),
    Name(String),
}

impl VehicleId {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(number) => Self::Number(number),
            Err(_) => Self::Name(trimmed.to_string()),
        }
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{}", number),
            Self::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEvent {
    pub vehicle_id: VehicleId,
    pub error_code: String,
    pub timestamp: NaiveDateTime,
    pub duration_minutes: f64,
}

impl ErrorEvent {
    pub fn new(
        vehicle_id: VehicleId,
        error_code: String,
        timestamp: NaiveDateTime,
        duration_minutes: f64,
    ) -> Self {
        Self {
            vehicle_id,
            error_code,
            timestamp,
            duration_minutes,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// The loaded dataset. Built once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    events: Vec<ErrorEvent>,
}

impl EventTable {
    pub fn new(events: Vec<ErrorEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[ErrorEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn vehicles(&self) -> Vec<VehicleId> {
        let distinct: BTreeSet<&VehicleId> = self.events.iter().map(|e| &e.vehicle_id).collect();
        distinct.into_iter().cloned().collect()
    }

    pub fn error_codes(&self) -> Vec<String> {
        let distinct: BTreeSet<&str> = self.events.iter().map(|e| e.error_code.as_str()).collect();
        distinct.into_iter().map(str::to_string).collect()
    }

    /// Earliest and latest event dates, `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.events.iter().map(ErrorEvent::date).min()?;
        let last = self.events.iter().map(ErrorEvent::date).max()?;
        Some((first, last))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::event;
    use super::*;

    #[test]
    fn test_vehicle_id_parse() {
        assert_eq!(VehicleId::parse(" 42 "), VehicleId::Number(42));
        assert_eq!(VehicleId::parse("CAR-7"), VehicleId::Name("CAR-7".to_string()));
        assert_eq!(VehicleId::Number(42).to_string(), "42");
    }

    #[test]
    fn test_vehicle_ids_sort_numerically() {
        let mut ids = vec![
            VehicleId::Name("alpha".to_string()),
            VehicleId::Number(10),
            VehicleId::Number(9),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                VehicleId::Number(9),
                VehicleId::Number(10),
                VehicleId::Name("alpha".to_string()),
            ]
        );
    }

    #[test]
    fn test_table_options() {
        let table = EventTable::new(vec![
            event(3, "WA050.a", "2024-02-01", 5.0),
            event(1, "WA009", "2024-01-15", 10.0),
            event(3, "WA009", "2024-03-20", 2.5),
        ]);

        assert_eq!(table.vehicles(), vec![VehicleId::Number(1), VehicleId::Number(3)]);
        assert_eq!(table.error_codes(), vec!["WA009".to_string(), "WA050.a".to_string()]);
        assert_eq!(
            table.date_bounds(),
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            ))
        );
        assert_eq!(EventTable::default().date_bounds(), None);
    }
}
