//! handlers/analysis_handler.rs
//! Endpoints del análisis de plagio.

use actix_web::{web, HttpResponse};
use log::error;
use serde::Deserialize;
use serde_json::json;

use crate::models::analysis_model::{AnalysisReport, AnalysisRequest, AnalysisResponse};
use crate::services::analysis_service::AnalysisService;
use crate::services::forensics_service::ForensicsService;
use crate::services::operation_service::OperationService;
use crate::services::report_service::{render_text_report, REPORT_FILE_NAME};

#[derive(Deserialize)]
pub struct PaginationQuery {
    page: Option<u64>,
    page_size: Option<u64>,
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "success": false,
        "error": message
    }))
}

fn internal_error(context: &str, e: anyhow::Error) -> HttpResponse {
    error!("{}: {:#}", context, e);
    HttpResponse::InternalServerError().json(json!({
        "success": false,
        "error": "Internal server error",
        "details": format!("{:#}", e)
    }))
}

fn not_found(op_id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "error": "Analysis not found",
        "details": op_id
    }))
}

fn text_report_response(report: &AnalysisReport) -> HttpResponse {
    let body = render_text_report(report);
    HttpResponse::Ok()
        .append_header(("Content-Type", "text/plain; charset=utf-8"))
        .append_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", REPORT_FILE_NAME),
        ))
        .body(body)
}

/// POST /api/analysis
pub async fn analyze_endpoint(
    forensics: web::Data<ForensicsService>,
    analysis_service: web::Data<AnalysisService>,
    body: web::Json<AnalysisRequest>,
) -> HttpResponse {
    let req = body.into_inner();
    log::info!("Entrando a analyze_endpoint con {} archivos", req.files.len());

    let settings = match req.validate(forensics.config()) {
        Ok(s) => s,
        Err(msg) => return bad_request(msg),
    };

    if req.is_async() {
        return match analysis_service.submit(req.files, settings).await {
            Ok(op_id) => HttpResponse::Accepted().json(AnalysisResponse {
                success: true,
                operation_id: op_id,
                report: None,
                message: Some("Analysis started".to_string()),
            }),
            Err(e) => internal_error("Error iniciando análisis", e),
        };
    }

    match analysis_service.run(req.files, settings).await {
        Ok((op_id, report)) => HttpResponse::Ok().json(AnalysisResponse {
            success: true,
            operation_id: op_id,
            report: Some(report),
            message: None,
        }),
        Err(e) => internal_error("Error en análisis", e),
    }
}

/// POST /api/analysis/report
/// Igual que /api/analysis pero devuelve directamente el .txt descargable.
pub async fn analyze_report_endpoint(
    forensics: web::Data<ForensicsService>,
    analysis_service: web::Data<AnalysisService>,
    body: web::Json<AnalysisRequest>,
) -> HttpResponse {
    let req = body.into_inner();
    let settings = match req.validate(forensics.config()) {
        Ok(s) => s,
        Err(msg) => return bad_request(msg),
    };

    match analysis_service.run(req.files, settings).await {
        Ok((_, report)) => text_report_response(&report),
        Err(e) => internal_error("Error en análisis", e),
    }
}

/// GET /api/analysis
pub async fn list_analyses_endpoint(
    op_service: web::Data<OperationService>,
    query: web::Query<PaginationQuery>,
) -> HttpResponse {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(10);

    match op_service.list_analyses(page, page_size).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => internal_error("Error listando análisis", e),
    }
}

/// GET /api/analysis/{id}
pub async fn get_analysis_endpoint(
    op_service: web::Data<OperationService>,
    path: web::Path<String>,
) -> HttpResponse {
    let op_id = path.into_inner();

    match op_service.get_analysis(&op_id).await {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => not_found(&op_id),
        Err(e) => internal_error("Error consultando análisis", e),
    }
}

/// GET /api/analysis/{id}/report
pub async fn get_analysis_report_endpoint(
    op_service: web::Data<OperationService>,
    path: web::Path<String>,
) -> HttpResponse {
    let op_id = path.into_inner();

    match op_service.get_analysis(&op_id).await {
        Ok(Some(record)) => match (&record.report, record.is_finished()) {
            (Some(report), true) => text_report_response(report),
            _ => HttpResponse::Conflict().json(json!({
                "success": false,
                "error": "Analysis not finished",
                "details": record.status
            })),
        },
        Ok(None) => not_found(&op_id),
        Err(e) => internal_error("Error consultando análisis", e),
    }
}
