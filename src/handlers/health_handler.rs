//! handlers/health_handler.rs
//! Endpoint de salud del servicio.

use actix_web::HttpResponse;
use serde_json::json;

/// GET /api/health
pub async fn health_endpoint() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
