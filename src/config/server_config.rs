//! config/server_config.rs
//! Configuración del servidor leída de variables de entorno (.env incluido).

use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Si no viene, se usa ./data/forensics.db
    pub database_url: Option<String>,
    pub workers: usize,
    pub max_payload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 5022,
            database_url: None,
            workers: 1,
            max_payload_mb: 64,
        }
    }
}

impl ServerConfig {
    /// Lee HOST, PORT, DATABASE_URL, WORKERS y MAX_PAYLOAD_MB.
    /// Valores ausentes o inválidos caen al default (con un warning).
    pub fn from_env() -> Self {
        let defaults = ServerConfig::default();
        ServerConfig {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port),
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            workers: parse_var("WORKERS", defaults.workers).max(1),
            max_payload_mb: parse_var("MAX_PAYLOAD_MB", defaults.max_payload_mb).max(1),
        }
    }

    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_mb * 1024 * 1024
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("Valor inválido para {}: '{}', usando default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}
