pub mod assessment;
pub mod config;
pub mod error;
pub mod insights;
pub mod notifications;
pub mod processing;
pub mod telemetry;
