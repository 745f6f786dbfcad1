//! config/forensics_config.rs
//! Valores por defecto y límites de los parámetros de análisis.

use serde::{Deserialize, Serialize};

/// Configuración global del análisis forense
/// (los rangos replican los controles de la herramienta original).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForensicsConfig {
    pub default_similarity_threshold: f64, // porcentaje
    pub min_similarity_threshold: f64,
    pub max_similarity_threshold: f64,
    pub default_min_shared_assets: usize,
    pub min_shared_assets_floor: usize,
    pub min_shared_assets_ceiling: usize,
    /// Máximo de archivos por lote
    pub max_files_per_batch: usize,
    /// Extracciones .sb3 simultáneas
    pub max_concurrent_extractions: usize,
}

impl Default for ForensicsConfig {
    fn default() -> Self {
        ForensicsConfig {
            default_similarity_threshold: 85.0,
            min_similarity_threshold: 50.0,
            max_similarity_threshold: 100.0,
            default_min_shared_assets: 3,
            min_shared_assets_floor: 1,
            min_shared_assets_ceiling: 10,
            max_files_per_batch: 200,
            max_concurrent_extractions: 8,
        }
    }
}
