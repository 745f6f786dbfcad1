//! config/mod.rs
pub mod forensics_config;
pub mod server_config;
