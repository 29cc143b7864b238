// Domain layer - pure pipeline types, no I/O
pub mod aggregate;
pub mod dashboard;
pub mod descriptor;
pub mod event;
pub mod filter;
pub mod period;
pub mod ranking;
pub mod report;
