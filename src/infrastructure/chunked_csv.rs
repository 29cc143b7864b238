// Chunked CSV streaming for the filtered-rows export
use crate::domain::event::ErrorEvent;
use crate::infrastructure::config::ColumnMapping;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::Bytes;
use futures::stream::Stream;

pub const EXPORT_FILE_NAME: &str = "filtered_vehicle_errors.csv";
pub const ROWS_PER_CHUNK: usize = 500;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Encode the header row using the dataset's own column names.
pub fn encode_header(columns: &ColumnMapping) -> Result<Bytes, std::io::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns.header()).map_err(std::io::Error::other)?;
    finish(writer)
}

/// Encode rows without a header.
pub fn encode_rows(rows: &[ErrorEvent]) -> Result<Bytes, std::io::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for event in rows {
        writer
            .write_record([
                event.vehicle_id.to_string(),
                event.error_code.clone(),
                event.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                event.duration_minutes.to_string(),
            ])
            .map_err(std::io::Error::other)?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Bytes, std::io::Error> {
    let buffer = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(Bytes::from(buffer))
}

/// Header chunk first, then one chunk per `rows_per_chunk` rows.
pub fn csv_export_stream(
    rows: Vec<ErrorEvent>,
    columns: ColumnMapping,
    rows_per_chunk: usize,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    async_stream::try_stream! {
        yield encode_header(&columns)?;
        for chunk in rows.chunks(rows_per_chunk.max(1)) {
            yield encode_rows(chunk)?;
        }
    }
}

/// Create a streamed CSV attachment response
pub fn csv_attachment_response(rows: Vec<ErrorEvent>, columns: ColumnMapping) -> impl IntoResponse {
    let row_count = rows.len();
    let body = Body::from_stream(csv_export_stream(rows, columns, ROWS_PER_CHUNK));

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
        )
        .body(body);

    match response {
        Ok(response) => {
            tracing::debug!("Streaming export of {} rows", row_count);
            response.into_response()
        }
        Err(e) => {
            tracing::error!("Export response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
