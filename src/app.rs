//! app.rs
use crate::handlers::{analysis_handler, health_handler};
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_handler::health_endpoint))
            .service(
                web::scope("/analysis")
                    .route("", web::post().to(analysis_handler::analyze_endpoint))
                    .route("", web::get().to(analysis_handler::list_analyses_endpoint))
                    .route(
                        "/report",
                        web::post().to(analysis_handler::analyze_report_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::get().to(analysis_handler::get_analysis_endpoint),
                    )
                    .route(
                        "/{id}/report",
                        web::get().to(analysis_handler::get_analysis_report_endpoint),
                    ),
            ),
    );
}
