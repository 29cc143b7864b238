// HTTP request handlers
use crate::application::dashboard_service::DashboardRequest;
use crate::domain::event::VehicleId;
use crate::domain::filter::{DateRange, EventFilter, Selection};
use crate::domain::period::Granularity;
use crate::error::DashboardError;
use crate::infrastructure::chunked_csv::csv_attachment_response;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Filter inputs as sent by the client.
///
/// `vehicles` and `codes` are comma separated. Omitted or `all` selects
/// everything; an empty value selects nothing.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub vehicles: Option<String>,
    pub codes: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub period: Option<String>,
}

impl FilterQuery {
    pub fn granularity(&self, default: Granularity) -> Result<Granularity, DashboardError> {
        match self.period.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => raw.parse(),
        }
    }

    pub fn filter(&self) -> Result<EventFilter, DashboardError> {
        let dates = DateRange::new(
            parse_date(self.start.as_deref())?,
            parse_date(self.end.as_deref())?,
        )?;
        Ok(EventFilter::new(
            parse_selection(self.vehicles.as_deref(), VehicleId::parse),
            parse_selection(self.codes.as_deref(), str::to_string),
            dates,
        ))
    }

    pub fn to_request(&self, default: Granularity) -> Result<DashboardRequest, DashboardError> {
        Ok(DashboardRequest {
            filter: self.filter()?,
            granularity: self.granularity(default)?,
        })
    }
}

fn parse_selection<T: Ord>(raw: Option<&str>, parse: impl Fn(&str) -> T) -> Selection<T> {
    match raw.map(str::trim) {
        None => Selection::All,
        Some("") => Selection::none(),
        Some(value) if value.eq_ignore_ascii_case("all") => Selection::All,
        Some(value) => Selection::only(
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(parse),
        ),
    }
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, DashboardError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DashboardError::InvalidDate(value.to_string())),
    }
}

#[derive(Serialize)]
struct DescriptorBody<'a> {
    code: &'a str,
    description: &'a str,
}

fn into_response(result: Result<Response, axum::http::StatusCode>) -> Response {
    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Distinct vehicles, codes and date bounds for the client's filter widgets
pub async fn filter_options(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let options = state.dashboard_service.filter_options();
    into_response(json_response(&options, accepts_brotli(&headers)).await)
}

/// Recompute the dashboard for the given filter
pub async fn get_dashboard(
    Query(query): Query<FilterQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let service = &state.dashboard_service;
    let default = service.settings().default_granularity;

    let dashboard = match query.to_request(default) {
        Ok(request) => service.get_dashboard(&request),
        Err(e) => service.rejected_dashboard(query.granularity(default).unwrap_or(default), &e),
    };

    into_response(json_response(&dashboard, accepts_brotli(&headers)).await)
}

/// Download the filtered rows as CSV. Invalid filters export the header only.
pub async fn export_csv(
    Query(query): Query<FilterQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rows = match query.filter() {
        Ok(filter) => state.export_service.filtered_rows(&filter),
        Err(e) => {
            tracing::warn!("Rejected export request: {}", e);
            Vec::new()
        }
    };

    csv_attachment_response(rows, state.export_columns.clone())
}

/// Tooltip text for a single error code
pub async fn describe_code(
    Path(code): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let body = DescriptorBody {
        code: &code,
        description: state.dashboard_service.describe(&code),
    };
    into_response(json_response(&body, accepts_brotli(&headers)).await)
}
