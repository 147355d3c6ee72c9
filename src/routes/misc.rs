use crate::auth;
use crate::config::AppState;
use crate::db;
use crate::errors::ApiError;
use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use chrono::Utc;
use futures_util::StreamExt;
use std::fs;
use std::io::Write;
use std::path::Path;

#[get("/health_check")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().timestamp()
    }))
}

/// Resume upload. The file is stored under a fresh UUID name first and only
/// referenced by an application afterwards, so a failed application insert
/// can never leave a record pointing at a missing file.
#[post("/api/v1/upload")]
pub async fn upload(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let conn = db::connect(&state.db_path)?;
    auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?
        .ok_or_else(ApiError::not_authenticated)?;

    fs::create_dir_all(&state.uploads_dir)
        .map_err(|e| ApiError::Database(format!("Failed to create uploads directory: {}", e)))?;

    let mut stored_name = None;
    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| ApiError::Validation(format!("Invalid upload: {}", e)))?;
        let original = field
            .content_disposition()
            .get_filename()
            .unwrap_or("resume")
            .to_string();
        let extension: String = original
            .rsplit('.')
            .next()
            .unwrap_or("")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        let filename = if extension.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            format!("{}.{}", uuid::Uuid::new_v4(), extension)
        };
        let filepath = Path::new(&state.uploads_dir).join(&filename);

        let mut file = fs::File::create(&filepath)
            .map_err(|e| ApiError::Database(format!("Failed to create file: {}", e)))?;
        while let Some(chunk) = field.next().await {
            let data =
                chunk.map_err(|e| ApiError::Validation(format!("Failed to read upload: {}", e)))?;
            file.write_all(&data)
                .map_err(|e| ApiError::Database(format!("Failed to write file: {}", e)))?;
        }
        tracing::info!(file = %filename, "stored uploaded resume");
        stored_name = Some(filename);
    }

    let Some(resume) = stored_name else {
        return Err(ApiError::Validation("No file in upload".to_string()));
    };
    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "resume": resume
    })))
}

#[get("/uploads/{filename}")]
pub async fn serve_file(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filename = path.into_inner();
    if filename.contains('/') || filename.contains("..") {
        return Err(ApiError::Validation("Invalid filename".to_string()));
    }
    let filepath = Path::new(&state.uploads_dir).join(&filename);

    let content = fs::read(&filepath)
        .map_err(|_| ApiError::NotFound("File not found".to_string()))?;
    let content_type = match filepath.extension().and_then(|e| e.to_str()) {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    };
    Ok(HttpResponse::Ok().content_type(content_type).body(content))
}
