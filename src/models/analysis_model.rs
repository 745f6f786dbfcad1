//! models/analysis_model.rs
//! Requests/responses del análisis de plagio.

use serde::{Deserialize, Serialize};

use crate::config::forensics_config::ForensicsConfig;

/// Archivo .sb3 subido, con el contenido en base64.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedProject {
    pub file_name: String,
    #[serde(
        serialize_with = "serialize_base64",
        deserialize_with = "deserialize_base64"
    )]
    pub data: Vec<u8>,
}

fn serialize_base64<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&base64::encode(data))
}

fn deserialize_base64<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    base64::decode(&s).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub files: Vec<UploadedProject>,
    /// Umbral de similitud lógica (%)
    pub similarity_threshold: Option<f64>,
    pub min_shared_assets: Option<usize>,
    /// Si es true, se responde de inmediato y el análisis corre en segundo plano
    pub async_mode: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    pub similarity_threshold: f64,
    pub min_shared_assets: usize,
}

impl AnalysisRequest {
    /// Valida el lote y resuelve los parámetros con los defaults.
    /// El error es un mensaje listo para devolver como 400.
    pub fn validate(&self, config: &ForensicsConfig) -> Result<AnalysisSettings, String> {
        if self.files.len() < 2 {
            return Err("Please upload at least 2 files to perform a comparison.".to_string());
        }
        if self.files.len() > config.max_files_per_batch {
            return Err(format!(
                "Too many files: {} (max {})",
                self.files.len(),
                config.max_files_per_batch
            ));
        }
        if let Some(bad) = self
            .files
            .iter()
            .find(|f| !f.file_name.to_ascii_lowercase().ends_with(".sb3"))
        {
            return Err(format!("Not a .sb3 file: {}", bad.file_name));
        }

        let similarity_threshold = self
            .similarity_threshold
            .unwrap_or(config.default_similarity_threshold);
        if !(config.min_similarity_threshold..=config.max_similarity_threshold)
            .contains(&similarity_threshold)
        {
            return Err(format!(
                "similarity_threshold must be between {} and {}",
                config.min_similarity_threshold, config.max_similarity_threshold
            ));
        }

        let min_shared_assets = self
            .min_shared_assets
            .unwrap_or(config.default_min_shared_assets);
        if !(config.min_shared_assets_floor..=config.min_shared_assets_ceiling)
            .contains(&min_shared_assets)
        {
            return Err(format!(
                "min_shared_assets must be between {} and {}",
                config.min_shared_assets_floor, config.min_shared_assets_ceiling
            ));
        }

        Ok(AnalysisSettings {
            similarity_threshold,
            min_shared_assets,
        })
    }

    pub fn is_async(&self) -> bool {
        self.async_mode.unwrap_or(false)
    }
}

/// `copy` es binariamente idéntico a `original` (el primero visto).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryMatch {
    pub copy: String,
    pub original: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairComparison {
    pub first: String,
    pub second: String,
    pub logic_similarity: f64,
    pub shared_assets: usize,
    pub sprite_counts: (usize, usize),
    pub logic_match: bool,
    pub asset_match: bool,
}

impl PairComparison {
    pub fn is_suspicious(&self) -> bool {
        self.logic_match || self.asset_match
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnreadableFile {
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub files_received: usize,
    pub files_analyzed: usize,
    pub unreadable_files: Vec<UnreadableFile>,
    pub binary_matches: Vec<BinaryMatch>,
    pub suspicious_pairs: Vec<PairComparison>,
    pub report_lines: Vec<String>,
    pub settings: AnalysisSettings,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub operation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AnalysisReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadedProject {
    #[allow(dead_code)]
    #[cfg(test)]
    pub fn test_new(file_name: &str, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            data,
        }
    }
}
