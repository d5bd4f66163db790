//! Concrete port implementations.

pub mod csv_data_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
