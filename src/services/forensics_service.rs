use anyhow::{anyhow, Context, Result};
use futures_util::future::try_join_all;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    sync::{Semaphore, SemaphorePermit},
    time::timeout,
};

use crate::config::forensics_config::ForensicsConfig;
use crate::models::analysis_model::{
    AnalysisReport, AnalysisSettings, BinaryMatch, PairComparison, UnreadableFile,
    UploadedProject,
};
use crate::models::project_model::ProjectFingerprint;
use crate::services::report_service::{binary_match_line, pair_line};
use crate::services::sb3_service::extract_project;
use crate::services::similarity::logic_similarity_percent;

/// Tiempo máximo esperando turno para extraer un archivo
const PERMIT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ForensicsService {
    semaphore: Arc<Semaphore>,
    config: Arc<ForensicsConfig>,
    permit_timeout: Duration,
}

impl ForensicsService {
    pub fn new(config: ForensicsConfig) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_extractions.max(1))),
            config: Arc::new(config),
            permit_timeout: PERMIT_TIMEOUT,
        }
    }

    /// Constructor de test: permisos y timeout a mano (0 permisos = nunca hay turno).
    #[allow(dead_code)]
    #[cfg(test)]
    pub fn new_test(config: ForensicsConfig, permits: usize, permit_timeout: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            config: Arc::new(config),
            permit_timeout,
        }
    }

    pub fn config(&self) -> &ForensicsConfig {
        &self.config
    }

    /// Analiza un lote completo: extracción, duplicados binarios y
    /// comparación lógica/assets por pares.
    pub async fn analyze(
        &self,
        files: Vec<UploadedProject>,
        settings: AnalysisSettings,
    ) -> Result<AnalysisReport> {
        let start = Instant::now();
        let files_received = files.len();

        // 1) Extracción (en paralelo, acotada por el semaphore)
        let extracted = try_join_all(files.into_iter().map(|f| self.extract_one(f))).await?;

        let mut projects: Vec<ProjectFingerprint> = Vec::with_capacity(extracted.len());
        let mut unreadable_files = Vec::new();
        for (file_name, result) in extracted {
            match result {
                Ok(project) => insert_by_name(&mut projects, project),
                Err(e) => {
                    log::warn!("Error leyendo {}: {:#}", file_name, e);
                    unreadable_files.push(UnreadableFile {
                        file_name,
                        reason: format!("{:#}", e),
                    });
                }
            }
        }

        // 2) Comparaciones (CPU puro, fuera del runtime)
        let report = tokio::task::spawn_blocking(move || {
            build_report(projects, unreadable_files, files_received, settings)
        })
        .await
        .context("Falló la tarea de comparación")?;

        log::info!(
            "Análisis de {} archivos en {:.2}s: {} duplicados, {} pares sospechosos",
            files_received,
            start.elapsed().as_secs_f32(),
            report.binary_matches.len(),
            report.suspicious_pairs.len()
        );
        Ok(report)
    }

    /// El error externo aborta el lote; el interno solo marca el archivo como ilegible.
    async fn extract_one(
        &self,
        upload: UploadedProject,
    ) -> Result<(String, Result<ProjectFingerprint>)> {
        let _guard = self.acquire_permit().await?;

        let UploadedProject { file_name, data } = upload;
        let name = file_name.clone();
        let result = tokio::task::spawn_blocking(move || extract_project(&name, &data))
            .await
            .context("Falló la tarea de extracción")?;
        Ok((file_name, result))
    }

    async fn acquire_permit(&self) -> Result<SemaphorePermit<'_>> {
        timeout(self.permit_timeout, self.semaphore.acquire())
            .await
            .context("Timeout esperando permiso en ForensicsService")?
            .map_err(|_| anyhow!("No se pudo adquirir el semaphore"))
    }
}

/// Un nombre repetido reemplaza al anterior pero conserva su posición.
/// Solo se llama con archivos legibles: una copia ilegible nunca pisa a una buena.
fn insert_by_name(projects: &mut Vec<ProjectFingerprint>, project: ProjectFingerprint) {
    if let Some(pos) = projects.iter().position(|p| p.file_name == project.file_name) {
        log::warn!("Archivo repetido '{}', se usa la última copia legible", project.file_name);
        projects[pos] = project;
    } else {
        projects.push(project);
    }
}

pub fn build_report(
    projects: Vec<ProjectFingerprint>,
    unreadable_files: Vec<UnreadableFile>,
    files_received: usize,
    settings: AnalysisSettings,
) -> AnalysisReport {
    let binary_matches = find_binary_duplicates(&projects);
    let suspicious_pairs = compare_pairs(&projects, &settings);

    let report_lines = binary_matches
        .iter()
        .map(binary_match_line)
        .chain(suspicious_pairs.iter().map(pair_line))
        .collect();

    AnalysisReport {
        files_received,
        files_analyzed: projects.len(),
        unreadable_files,
        binary_matches,
        suspicious_pairs,
        report_lines,
        settings,
    }
}

/// Fase 1: el primer archivo con un hash es el original, los siguientes son copias.
pub fn find_binary_duplicates(projects: &[ProjectFingerprint]) -> Vec<BinaryMatch> {
    let mut seen: Vec<(&str, &str)> = Vec::new(); // (hash, nombre)
    let mut duplicates = Vec::new();
    for project in projects {
        let original = seen
            .iter()
            .find(|(hash, _)| *hash == project.file_hash)
            .map(|(_, name)| *name);
        match original {
            Some(original) => duplicates.push(BinaryMatch {
                copy: project.file_name.clone(),
                original: original.to_string(),
            }),
            None => seen.push((&project.file_hash, &project.file_name)),
        }
    }
    duplicates
}

/// Fase 2: todos los pares (i < j) en orden de subida; solo se devuelven los sospechosos.
pub fn compare_pairs(
    projects: &[ProjectFingerprint],
    settings: &AnalysisSettings,
) -> Vec<PairComparison> {
    let mut suspicious = Vec::new();
    for (i, first) in projects.iter().enumerate() {
        for second in &projects[i + 1..] {
            let pair = compare_pair(first, second, settings);
            if pair.is_suspicious() {
                suspicious.push(pair);
            }
        }
    }
    suspicious
}

pub fn compare_pair(
    first: &ProjectFingerprint,
    second: &ProjectFingerprint,
    settings: &AnalysisSettings,
) -> PairComparison {
    let logic_similarity =
        logic_similarity_percent(&first.logic_signature, &second.logic_signature);
    let shared_assets = first.shared_assets(second);

    PairComparison {
        first: first.file_name.clone(),
        second: second.file_name.clone(),
        logic_similarity,
        shared_assets,
        sprite_counts: (first.sprite_count(), second.sprite_count()),
        logic_match: logic_similarity >= settings.similarity_threshold,
        asset_match: shared_assets >= settings.min_shared_assets,
    }
}
