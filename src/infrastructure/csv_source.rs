// CSV event source implementation
use crate::application::event_source::EventSource;
use crate::domain::event::{ErrorEvent, VehicleId};
use crate::error::DashboardError;
use crate::infrastructure::config::ColumnMapping;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::PathBuf;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Debug, Clone)]
pub struct CsvEventSource {
    path: PathBuf,
    columns: ColumnMapping,
}

impl CsvEventSource {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnMapping) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }
}

#[async_trait]
impl EventSource for CsvEventSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn load_events(&self) -> Result<Vec<ErrorEvent>, DashboardError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| DashboardError::DatasetIo {
                path: self.location(),
                source,
            })?;

        tracing::debug!("Read {} bytes from {}", bytes.len(), self.location());
        parse_events(bytes.as_slice(), &self.columns)
    }
}

/// Parse a headed CSV document into events.
///
/// Columns are located by name so their order in the file does not matter.
pub fn parse_events<R: Read>(
    input: R,
    columns: &ColumnMapping,
) -> Result<Vec<ErrorEvent>, DashboardError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
    };
    let vehicle_idx = position(&columns.vehicle_id)?;
    let code_idx = position(&columns.error_code)?;
    let timestamp_idx = position(&columns.timestamp)?;
    let duration_idx = position(&columns.duration_minutes)?;

    let mut events = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // line 1 is the header
        let row = index + 2;
        let invalid = |message: String| DashboardError::InvalidRow { row, message };
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let vehicle = field(vehicle_idx);
        if vehicle.is_empty() {
            return Err(invalid("empty vehicle id".to_string()));
        }

        let code = field(code_idx);
        if code.is_empty() {
            return Err(invalid("empty error code".to_string()));
        }

        let raw_timestamp = field(timestamp_idx);
        let timestamp = parse_timestamp(raw_timestamp)
            .ok_or_else(|| invalid(format!("unparseable timestamp '{}'", raw_timestamp)))?;

        let raw_duration = field(duration_idx);
        let duration = raw_duration
            .parse::<f64>()
            .ok()
            .filter(|minutes| minutes.is_finite() && *minutes >= 0.0)
            .ok_or_else(|| invalid(format!("invalid duration '{}'", raw_duration)))?;

        events.push(ErrorEvent::new(
            VehicleId::parse(vehicle),
            code.to_string(),
            timestamp,
            duration,
        ));
    }

    Ok(events)
}

/// Accepts RFC 3339, ISO-like date-times, US style dates, and bare dates (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::fixtures::at;

    const SAMPLE: &str = "\
Car Number,Troubleshooting Code,Date,Time (min)
12,WA009,2024-01-05 08:30:00,15
12,WA050.a,2024-01-06,7.5
CAR-3,WA041,01/07/2024 10:00,0
";

    #[test]
    fn test_parse_sample() {
        let events = parse_events(SAMPLE.as_bytes(), &ColumnMapping::default()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].vehicle_id, VehicleId::Number(12));
        assert_eq!(events[0].timestamp, at("2024-01-05", "08:30:00"));
        assert_eq!(events[1].error_code, "WA050.a");
        assert_eq!(events[1].duration_minutes, 7.5);
        assert_eq!(events[1].timestamp, at("2024-01-06", "00:00:00"));
        assert_eq!(events[2].vehicle_id, VehicleId::Name("CAR-3".to_string()));
        assert_eq!(events[2].timestamp, at("2024-01-07", "10:00:00"));
    }

    #[test]
    fn test_columns_found_by_name() {
        let input = "minutes,extra,when,code,vehicle\n3,x,2024-02-01,WA066,5\n";
        let columns = ColumnMapping {
            vehicle_id: "vehicle".to_string(),
            error_code: "code".to_string(),
            timestamp: "when".to_string(),
            duration_minutes: "minutes".to_string(),
        };
        let events = parse_events(input.as_bytes(), &columns).unwrap();
        assert_eq!(events[0].vehicle_id, VehicleId::Number(5));
        assert_eq!(events[0].duration_minutes, 3.0);
    }

    #[test]
    fn test_missing_column_fails() {
        let input = "Car Number,Troubleshooting Code,Time (min)\n1,WA009,3\n";
        let err = parse_events(input.as_bytes(), &ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn(column) if column == "Date"));
    }

    #[test]
    fn test_bad_timestamp_reports_row() {
        let input = "Car Number,Troubleshooting Code,Date,Time (min)\n1,WA009,2024-01-01,3\n2,WA009,yesterday,3\n";
        let err = parse_events(input.as_bytes(), &ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidRow { row: 3, .. }));
    }

    #[test]
    fn test_negative_duration_fails() {
        let input = "Car Number,Troubleshooting Code,Date,Time (min)\n1,WA009,2024-01-01,-4\n";
        let err = parse_events(input.as_bytes(), &ColumnMapping::default()).unwrap_err();
        assert!(err.to_string().contains("invalid duration '-4'"));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(
            parse_timestamp("2024-03-01T12:00:00Z"),
            Some(at("2024-03-01", "12:00:00"))
        );
        assert_eq!(
            parse_timestamp("2024-03-01 12:00:00.250").map(|t| t.date()),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_timestamp("2024-03-01T12:00"), Some(at("2024-03-01", "12:00:00")));
        assert_eq!(parse_timestamp("not a date"), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_load_failure() {
        let source = CsvEventSource::new("does/not/exist.csv", ColumnMapping::default());
        let err = source.load_events().await.unwrap_err();
        assert!(matches!(err, DashboardError::DatasetIo { .. }));
    }
}
