// Application layer - use cases over the loaded event table
pub mod dashboard_service;
pub mod event_source;
pub mod export_service;
