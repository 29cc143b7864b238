// Infrastructure layer - External dependencies and adapters
pub mod chunked_csv;
pub mod config;
pub mod csv_source;
pub mod http_response;
