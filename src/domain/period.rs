// Time granularity and bucket keys
use crate::error::DashboardError;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Daily,
        Granularity::Weekly,
        Granularity::Monthly,
        Granularity::Yearly,
    ];

    /// Map a timestamp to the bucket it falls into.
    ///
    /// Weeks follow ISO 8601: they start on Monday and are labelled with the
    /// ISO week-numbering year, so late December days can land in week 1.
    pub fn bucket(self, timestamp: NaiveDateTime) -> BucketKey {
        let date = timestamp.date();
        let start = match self {
            Granularity::Daily => date,
            Granularity::Weekly => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Granularity::Monthly => date.with_day(1).unwrap_or(date),
            Granularity::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        };
        BucketKey {
            granularity: self,
            start,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
            Granularity::Yearly => "Yearly",
        }
    }

    /// Axis label for the bucket dimension.
    pub fn unit(self) -> &'static str {
        match self {
            Granularity::Daily => "Day",
            Granularity::Weekly => "Week",
            Granularity::Monthly => "Month",
            Granularity::Yearly => "Year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Granularity {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Granularity::Daily),
            "weekly" | "week" => Ok(Granularity::Weekly),
            "monthly" | "month" => Ok(Granularity::Monthly),
            "yearly" | "year" => Ok(Granularity::Yearly),
            _ => Err(DashboardError::UnknownGranularity(s.to_string())),
        }
    }
}

/// A coarse time bucket, identified by its first calendar day.
///
/// Ordering is chronological for keys of the same granularity. Keys of
/// different granularities never share a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    granularity: Granularity,
    start: NaiveDate,
}

impl BucketKey {
    #[cfg(test)]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn label(&self) -> String {
        match self.granularity {
            Granularity::Daily => self.start.format("%Y-%m-%d").to_string(),
            Granularity::Weekly => {
                let week = self.start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Granularity::Monthly => self.start.format("%Y-%m").to_string(),
            Granularity::Yearly => self.start.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for BucketKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}
