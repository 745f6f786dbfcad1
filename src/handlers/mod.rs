//! handlers/mod.rs
//! Módulo que agrupa los handlers HTTP.
pub mod analysis_handler;
pub mod health_handler;
