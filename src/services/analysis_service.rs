//! services/analysis_service.rs
//! Orquesta un análisis: registro en DB, ejecución (sync o en segundo plano) y estado final.

use anyhow::Result;

use crate::models::analysis_model::{AnalysisReport, AnalysisSettings, UploadedProject};
use crate::services::{forensics_service::ForensicsService, operation_service::OperationService};

#[derive(Clone)]
pub struct AnalysisService {
    forensics: ForensicsService,
    operations: OperationService,
}

impl AnalysisService {
    pub fn new(forensics: ForensicsService, operations: OperationService) -> Self {
        Self {
            forensics,
            operations,
        }
    }

    /// Ejecuta el análisis en la misma request y devuelve (id, reporte).
    pub async fn run(
        &self,
        files: Vec<UploadedProject>,
        settings: AnalysisSettings,
    ) -> Result<(String, AnalysisReport)> {
        let op_id = self.operations.create_analysis(files.len(), &settings).await?;
        let report = self.execute(&op_id, files, settings).await?;
        Ok((op_id, report))
    }

    /// Registra el análisis y lo lanza en segundo plano; se consulta luego por id.
    pub async fn submit(
        &self,
        files: Vec<UploadedProject>,
        settings: AnalysisSettings,
    ) -> Result<String> {
        let op_id = self.operations.create_analysis(files.len(), &settings).await?;

        let service = self.clone();
        let task_id = op_id.clone();
        tokio::spawn(async move {
            match service.execute(&task_id, files, settings).await {
                Ok(_) => log::info!("Análisis async {} terminado", task_id),
                Err(e) => log::error!("Falló análisis async {}: {:#}", task_id, e),
            }
        });

        Ok(op_id)
    }

    async fn execute(
        &self,
        op_id: &str,
        files: Vec<UploadedProject>,
        settings: AnalysisSettings,
    ) -> Result<AnalysisReport> {
        self.operations.mark_running(op_id).await?;

        match self.forensics.analyze(files, settings).await {
            Ok(report) => {
                self.operations.complete_analysis(op_id, &report).await?;
                Ok(report)
            }
            Err(e) => {
                if let Err(db_err) = self.operations.mark_failed(op_id, &format!("{:#}", e)).await {
                    log::error!("No se pudo marcar {} como fallido: {:#}", op_id, db_err);
                }
                Err(e)
            }
        }
    }
}
