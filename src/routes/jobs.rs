use crate::auth;
use crate::config::AppState;
use crate::db;
use crate::errors::ApiError;
use crate::models::{Company, Job, JobFilters, NewJob};
use crate::policy::{can_perform, Action, Target};
use actix_web::{delete, get, post, put, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;

/// Public job list: active jobs only, filtered and paginated.
#[get("/api/v1/jobs")]
pub async fn list_jobs(
    state: web::Data<AppState>,
    filters: web::Query<JobFilters>,
) -> Result<HttpResponse, ApiError> {
    // reads are public; the anonymous decision covers every actor
    can_perform(None, Action::Read, Target::JobRead).require()?;
    let conn = db::connect(&state.db_path)?;
    let jobs = Job::list(&conn, &filters)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "jobs": jobs
    })))
}

/// Public job detail; unlike the list this does not filter on is_active.
#[get("/api/v1/jobs/{id}")]
pub async fn get_job(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    can_perform(None, Action::Read, Target::JobRead).require()?;
    let conn = db::connect(&state.db_path)?;
    let Some(job) = Job::get(&conn, path.into_inner())? else {
        return Err(ApiError::NotFound("Job not found".to_string()));
    };
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "job": job
    })))
}

#[post("/api/v1/jobs")]
pub async fn create_job(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    body: web::Json<NewJob>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::connect(&state.db_path)?;
    let Some(actor) = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)? else {
        return Err(ApiError::not_authenticated());
    };
    let Some(company) = Company::get(&conn, body.company)? else {
        return Err(ApiError::Validation("Unknown company".to_string()));
    };
    can_perform(
        Some(&actor),
        Action::Create,
        Target::Job {
            company_owner_id: company.owner_id,
        },
    )
    .require()?;

    let job = Job::create(&conn, &body, actor.id)?;
    tracing::info!(job_id = job.id, company_id = company.id, "job posted");
    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "job": job
    })))
}

#[put("/api/v1/jobs/{id}")]
pub async fn update_job(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    path: web::Path<i64>,
    body: web::Json<NewJob>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let conn = db::connect(&state.db_path)?;
    let Some(job) = Job::get(&conn, id)? else {
        return Err(ApiError::NotFound("Job not found".to_string()));
    };
    let Some(company) = Company::get(&conn, job.company_id)? else {
        return Err(ApiError::NotFound("Company not found".to_string()));
    };
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(
        actor.as_ref(),
        Action::Update,
        Target::Job {
            company_owner_id: company.owner_id,
        },
    )
    .require()?;
    // moving the job under another company needs the same rights there
    if body.company != job.company_id {
        let Some(target) = Company::get(&conn, body.company)? else {
            return Err(ApiError::Validation("Unknown company".to_string()));
        };
        can_perform(
            actor.as_ref(),
            Action::Update,
            Target::Job {
                company_owner_id: target.owner_id,
            },
        )
        .require()?;
    }

    Job::update(&conn, id, &body)?;
    let Some(job) = Job::get(&conn, id)? else {
        return Err(ApiError::NotFound("Job not found".to_string()));
    };
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "job": job
    })))
}

#[delete("/api/v1/jobs/{id}")]
pub async fn delete_job(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let conn = db::connect(&state.db_path)?;
    let Some(job) = Job::get(&conn, id)? else {
        return Err(ApiError::NotFound("Job not found".to_string()));
    };
    let Some(company) = Company::get(&conn, job.company_id)? else {
        return Err(ApiError::NotFound("Company not found".to_string()));
    };
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(
        actor.as_ref(),
        Action::Delete,
        Target::Job {
            company_owner_id: company.owner_id,
        },
    )
    .require()?;

    Job::delete(&conn, id)?;
    tracing::info!(job_id = id, "job deleted");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Job deleted"
    })))
}
