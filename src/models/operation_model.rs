use serde::{Deserialize, Serialize};

use crate::models::analysis_model::AnalysisReport;

/// Estados posibles de un análisis registrado
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_RUNNING: &str = "running";
pub const STATUS_DONE: &str = "done";
pub const STATUS_FAILED: &str = "failed";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub status: String, // "pending", "running", "done", "failed"
    pub file_count: i64,
    pub similarity_threshold: f64,
    pub min_shared_assets: i64,
    pub error_message: Option<String>,
    pub report: Option<AnalysisReport>,
    pub created_at: String,
    pub updated_at: String,
}

impl AnalysisRecord {
    pub fn is_finished(&self) -> bool {
        self.status == STATUS_DONE && self.report.is_some()
    }
}

/// Fila tal cual sale de SQLite (el reporte va serializado en JSON)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisRow {
    pub id: String,
    pub status: String,
    pub file_count: i64,
    pub similarity_threshold: f64,
    pub min_shared_assets: i64,
    pub error_message: Option<String>,
    pub report_json: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Resumen para el listado (sin el reporte completo)
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub id: String,
    pub status: String,
    pub file_count: i64,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Para listar análisis con paginación
#[derive(Debug, Clone, Serialize)]
pub struct ListAnalysesResponse {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<AnalysisSummary>,
}
