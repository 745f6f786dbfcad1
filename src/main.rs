use std::str::FromStr;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::forensics_config::ForensicsConfig;
use crate::config::server_config::ServerConfig;
use crate::logger::init_logger;
use crate::services::analysis_service::AnalysisService;
use crate::services::forensics_service::ForensicsService;
use crate::services::operation_service::OperationService;

mod app;
mod config;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

/// Conecta a SQLite. Sin DATABASE_URL se usa ./data/forensics.db
/// (la carpeta y el archivo se crean si no existen).
async fn setup_database(database_url: Option<&str>) -> Result<Pool<Sqlite>> {
    let db_url = match database_url {
        Some(url) => url.to_string(),
        None => {
            std::fs::create_dir_all("data").context("No se pudo crear directorio 'data'")?;
            let db_path = std::env::current_dir()
                .context("No se pudo obtener el current_dir")?
                .join("data")
                .join("forensics.db");
            format!("sqlite:{}", db_path.to_string_lossy())
        }
    };

    log::info!("Conectando a SQLite en {}", db_url);

    let options = SqliteConnectOptions::from_str(&db_url)
        .with_context(|| format!("URL de SQLite inválida: {}", db_url))?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("No se pudo conectar a la base de datos SQLite.")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let server_config = ServerConfig::from_env();

    let db_pool = setup_database(server_config.database_url.as_deref())
        .await
        .unwrap_or_else(|e| panic!("Fallo inicializando la base de datos: {:#}", e));

    let operation_service = OperationService::new(db_pool.clone());
    if let Err(e) = operation_service.run_migrations().await {
        panic!("Fallo en migraciones de 'analyses': {:?}", e);
    }

    let forensics_service = ForensicsService::new(ForensicsConfig::default());
    let analysis_service =
        AnalysisService::new(forensics_service.clone(), operation_service.clone());

    let payload_limit = server_config.max_payload_bytes();
    let bind_addr = (server_config.host.clone(), server_config.port);

    // Levantar servidor
    log::info!("Levantando servidor en {}:{}", bind_addr.0, bind_addr.1);
    HttpServer::new(move || {
        App::new()
            // Los .sb3 llegan en base64 dentro del JSON: límite amplio
            .app_data(web::JsonConfig::default().limit(payload_limit))
            .app_data(web::Data::new(forensics_service.clone()))
            .app_data(web::Data::new(operation_service.clone()))
            .app_data(web::Data::new(analysis_service.clone()))
            .configure(app::init_app)
    })
    .workers(server_config.workers)
    .bind(bind_addr)?
    .run()
    .await
}
