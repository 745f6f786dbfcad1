use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::models::analysis_model::{AnalysisReport, AnalysisSettings};
use crate::models::operation_model::{
    AnalysisRecord, AnalysisRow, AnalysisSummary, ListAnalysesResponse, STATUS_DONE,
    STATUS_FAILED, STATUS_PENDING, STATUS_RUNNING,
};

pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Clone, Debug)]
pub struct OperationService {
    db_pool: Pool<Sqlite>,
}

fn now() -> String {
    // Ancho fijo para que ORDER BY created_at sea cronológico
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl OperationService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        OperationService { db_pool }
    }

    /// Corre migraciones con sqlx
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .context("Fallo en migraciones de 'analyses'")?;
        Ok(())
    }

    /// Registra el análisis con estado "pending" y devuelve su id
    pub async fn create_analysis(
        &self,
        file_count: usize,
        settings: &AnalysisSettings,
    ) -> Result<String> {
        let op_id = Uuid::new_v4().to_string();
        let now = now();

        sqlx::query(
            r#"
            INSERT INTO analyses (
                id, status, file_count, similarity_threshold,
                min_shared_assets, error_message, report_json, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, NULL, NULL, ?6, ?6)
            "#,
        )
        .bind(&op_id)
        .bind(STATUS_PENDING)
        .bind(file_count as i64)
        .bind(settings.similarity_threshold)
        .bind(settings.min_shared_assets as i64)
        .bind(&now)
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar análisis")?;

        Ok(op_id)
    }

    pub async fn mark_running(&self, op_id: &str) -> Result<()> {
        self.update_status(op_id, STATUS_RUNNING, None).await
    }

    pub async fn mark_failed(&self, op_id: &str, error: &str) -> Result<()> {
        self.update_status(op_id, STATUS_FAILED, Some(error)).await
    }

    /// Guarda el reporte final y pasa a "done"
    pub async fn complete_analysis(&self, op_id: &str, report: &AnalysisReport) -> Result<()> {
        let report_json =
            serde_json::to_string(report).context("No se pudo serializar el reporte")?;
        sqlx::query(
            r#"
            UPDATE analyses
            SET status = ?2,
                error_message = NULL,
                report_json = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(op_id)
        .bind(STATUS_DONE)
        .bind(report_json)
        .bind(now())
        .execute(&self.db_pool)
        .await
        .context("Fallo al guardar el reporte")?;

        Ok(())
    }

    async fn update_status(&self, op_id: &str, status: &str, error: Option<&str>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE analyses
            SET status = ?2,
                error_message = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(op_id)
        .bind(status)
        .bind(error)
        .bind(now())
        .execute(&self.db_pool)
        .await
        .context("Fallo al actualizar análisis")?;

        Ok(())
    }

    /// Obtiene un análisis; `None` si el id no existe
    pub async fn get_analysis(&self, op_id: &str) -> Result<Option<AnalysisRecord>> {
        let row = sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT
                id, status, file_count, similarity_threshold, min_shared_assets,
                error_message, report_json, created_at, updated_at
            FROM analyses
            WHERE id = ?1
            "#,
        )
        .bind(op_id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al consultar análisis")?;

        let Some(r) = row else {
            return Ok(None);
        };
        let report = match r.report_json.as_deref() {
            Some(json) => Some(
                serde_json::from_str::<AnalysisReport>(json)
                    .context("Reporte guardado corrupto")?,
            ),
            None => None,
        };

        Ok(Some(AnalysisRecord {
            id: r.id,
            status: r.status,
            file_count: r.file_count,
            similarity_threshold: r.similarity_threshold,
            min_shared_assets: r.min_shared_assets,
            error_message: r.error_message,
            report,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }))
    }

    /// Lista análisis con paginación (más recientes primero)
    pub async fn list_analyses(&self, page: u64, page_size: u64) -> Result<ListAnalysesResponse> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let offset = ((page - 1) * page_size) as i64;

        // total
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analyses")
            .fetch_one(&self.db_pool)
            .await?;

        // items
        let rows = sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT
                id, status, file_count, similarity_threshold, min_shared_assets,
                error_message, NULL AS report_json, created_at, updated_at
            FROM analyses
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(page_size as i64)
        .bind(offset)
        .fetch_all(&self.db_pool)
        .await?;

        let items = rows
            .into_iter()
            .map(|r| AnalysisSummary {
                id: r.id,
                status: r.status,
                file_count: r.file_count,
                error_message: r.error_message,
                created_at: r.created_at,
                updated_at: r.updated_at,
            })
            .collect();

        Ok(ListAnalysesResponse {
            total: total as u64,
            page,
            page_size,
            items,
        })
    }
}
