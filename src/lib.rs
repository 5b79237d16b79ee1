pub mod config;
pub mod dss;
pub mod error;
pub mod telemetry;
