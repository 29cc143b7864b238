// Row filter: vehicle, error code and date range predicates
use crate::domain::event::{ErrorEvent, VehicleId};
use crate::error::DashboardError;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// A dimension selection.
///
/// `All` places no restriction on the dimension. `Only` restricts to the
/// listed values, so an empty `Only` matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection<T: Ord> {
    All,
    Only(BTreeSet<T>),
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: Ord> Selection<T> {
    pub fn only<I: IntoIterator<Item = T>>(values: I) -> Self {
        Selection::Only(values.into_iter().collect())
    }

    pub fn none() -> Self {
        Selection::Only(BTreeSet::new())
    }

    pub fn allows(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) => values.contains(value),
        }
    }
}

/// Inclusive calendar date range; a missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, DashboardError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(DashboardError::InvertedDateRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventFilter {
    pub vehicles: Selection<VehicleId>,
    pub error_codes: Selection<String>,
    pub dates: DateRange,
}

impl EventFilter {
    pub fn new(
        vehicles: Selection<VehicleId>,
        error_codes: Selection<String>,
        dates: DateRange,
    ) -> Self {
        Self {
            vehicles,
            error_codes,
            dates,
        }
    }

    pub fn matches(&self, event: &ErrorEvent) -> bool {
        self.vehicles.allows(&event.vehicle_id)
            && self.error_codes.allows(&event.error_code)
            && self.dates.contains(event.date())
    }

    /// Collect the matching events in their original order.
    pub fn apply<'a, I>(&self, events: I) -> Vec<&'a ErrorEvent>
    where
        I: IntoIterator<Item = &'a ErrorEvent>,
    {
        events.into_iter().filter(|e| self.matches(e)).collect()
    }
}
