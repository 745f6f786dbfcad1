//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod analysis_model;
pub mod operation_model;
pub mod project_model;
