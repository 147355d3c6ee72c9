use std::env;

/// Runtime configuration, read once at startup. `.env` values are loaded by
/// `dotenv` before this runs, so every knob can live in the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub jwt_secret: String,
    pub hash_secret: String,
    pub uploads_dir: String,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> AppConfig {
        AppConfig {
            db_path: env::var("JOBBOARD_DB").unwrap_or_else(|_| "jobboard.db".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "dev-jwt-secret".to_string()),
            hash_secret: env::var("HASH_SECRET").unwrap_or_else(|_| "dev-hash-secret".to_string()),
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
        }
    }
}

/// Shared application state handed to every handler via `web::Data`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db_path: String,
    pub jwt_secret: String,
    pub hash_secret: String,
    pub uploads_dir: String,
}

impl AppState {
    pub fn new(config: &AppConfig) -> AppState {
        AppState {
            db_path: config.db_path.clone(),
            jwt_secret: config.jwt_secret.clone(),
            hash_secret: config.hash_secret.clone(),
            uploads_dir: config.uploads_dir.clone(),
        }
    }
}
