//! Port traits decoupling the domain from concrete infrastructure.

pub mod config_port;
pub mod data_port;
pub mod report_port;
