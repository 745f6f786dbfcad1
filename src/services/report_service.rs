//! services/report_service.rs
//! Reporte de evidencia en texto plano (descargable).

use crate::models::analysis_model::{AnalysisReport, BinaryMatch, PairComparison};

pub const REPORT_FILE_NAME: &str = "plagiarism_report.txt";
pub const REPORT_TITLE: &str = "LITTLE KITES PLAGIARISM REPORT";
pub const NO_FINDINGS: &str = "No plagiarism detected in this batch.";

pub fn binary_match_line(m: &BinaryMatch) -> String {
    format!("[BINARY MATCH] {} == {}", m.copy, m.original)
}

pub fn pair_line(pair: &PairComparison) -> String {
    format!(
        "[LOGIC MATCH] {} vs {} | Similarity: {:.1}% | Shared Assets: {}",
        pair.first, pair.second, pair.logic_similarity, pair.shared_assets
    )
}

/// Cuerpo del reporte (lo que se ve en la vista previa)
pub fn render_report_body(report: &AnalysisReport) -> String {
    if report.report_lines.is_empty() {
        NO_FINDINGS.to_string()
    } else {
        report.report_lines.join("\n")
    }
}

/// Archivo completo: título, separador y cuerpo.
pub fn render_text_report(report: &AnalysisReport) -> String {
    format!(
        "{}\n{}\n{}",
        REPORT_TITLE,
        "-".repeat(30),
        render_report_body(report)
    )
}
