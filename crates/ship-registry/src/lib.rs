pub mod config;
pub mod error;
pub mod ships;
pub mod telemetry;
