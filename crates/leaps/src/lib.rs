pub mod config;
pub mod error;
pub mod records;
pub mod rules;
pub mod telemetry;
