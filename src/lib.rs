// Library entry point
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod error_logger;
pub mod exporter;
pub mod logging;
pub mod model;
pub mod report;
