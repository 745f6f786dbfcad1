//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod analysis_service;
pub mod forensics_service;
pub mod operation_service;
pub mod report_service;
pub mod sb3_service;
pub mod similarity;
