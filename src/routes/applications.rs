use crate::auth;
use crate::config::AppState;
use crate::db;
use crate::enums::ApplicationStatus;
use crate::errors::ApiError;
use crate::models::{Application, Job};
use crate::policy::{can_perform, Action, Target};
use crate::visibility;
use actix_web::{delete, get, post, put, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub job_id: i64,
    pub resume: Option<String>,
    pub cover_letter: Option<String>,
    // any client-supplied applicant id is ignored; the actor always applies
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[post("/api/v1/applications")]
pub async fn create_application(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    body: web::Json<CreateApplicationRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::connect(&state.db_path)?;
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(
        actor.as_ref(),
        Action::Create,
        Target::Application {
            applicant_id: None,
            company_owner_id: None,
        },
    )
    .require()?;
    let actor = actor.ok_or_else(ApiError::not_authenticated)?;

    let Some(job) = Job::get(&conn, body.job_id)? else {
        return Err(ApiError::NotFound("Job not found".to_string()));
    };
    let application = Application::create(
        &conn,
        &job,
        actor.id,
        body.resume.clone(),
        body.cover_letter.clone(),
    )?;
    tracing::info!(
        application_id = application.id,
        job_id = job.id,
        "application submitted"
    );
    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "application": application
    })))
}

/// Applications visible to the actor: their own, plus those for jobs whose
/// company they own; everything for admins; nothing when anonymous.
#[get("/api/v1/applications")]
pub async fn list_applications(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::connect(&state.db_path)?;
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    let scope = visibility::application_scope(actor.as_ref());
    let applications = Application::list_visible(&conn, scope)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "applications": applications
    })))
}

#[get("/api/v1/applications/{id}")]
pub async fn get_application(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let conn = db::connect(&state.db_path)?;
    let Some(application) = Application::get(&conn, id)? else {
        return Err(ApiError::NotFound("Application not found".to_string()));
    };
    let Some(owner_id) = Application::company_owner(&conn, id)? else {
        return Err(ApiError::NotFound("Application not found".to_string()));
    };
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(
        actor.as_ref(),
        Action::Read,
        Target::Application {
            applicant_id: Some(application.applicant_id),
            company_owner_id: Some(owner_id),
        },
    )
    .require()?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "application": application
    })))
}

/// Moves an application through the pipeline. Only the job's company owner
/// (or an admin) may do this; the applicant never may, not even on their own
/// application.
#[put("/api/v1/applications/{id}/status")]
pub async fn update_application_status(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    path: web::Path<i64>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let conn = db::connect(&state.db_path)?;
    let Some(application) = Application::get(&conn, id)? else {
        return Err(ApiError::NotFound("Application not found".to_string()));
    };
    let Some(owner_id) = Application::company_owner(&conn, id)? else {
        return Err(ApiError::NotFound("Application not found".to_string()));
    };
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(
        actor.as_ref(),
        Action::Update,
        Target::Application {
            applicant_id: Some(application.applicant_id),
            company_owner_id: Some(owner_id),
        },
    )
    .require()?;

    let status: ApplicationStatus = body
        .status
        .parse()
        .map_err(ApiError::Validation)?;
    Application::set_status(&conn, id, status)?;
    let Some(application) = Application::get(&conn, id)? else {
        return Err(ApiError::NotFound("Application not found".to_string()));
    };
    tracing::info!(application_id = id, status = %status, "application status updated");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "application": application
    })))
}

#[delete("/api/v1/applications/{id}")]
pub async fn delete_application(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let conn = db::connect(&state.db_path)?;
    let Some(application) = Application::get(&conn, id)? else {
        return Err(ApiError::NotFound("Application not found".to_string()));
    };
    let Some(owner_id) = Application::company_owner(&conn, id)? else {
        return Err(ApiError::NotFound("Application not found".to_string()));
    };
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(
        actor.as_ref(),
        Action::Delete,
        Target::Application {
            applicant_id: Some(application.applicant_id),
            company_owner_id: Some(owner_id),
        },
    )
    .require()?;

    Application::delete(&conn, id)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Application deleted"
    })))
}
