use crate::auth;
use crate::config::AppState;
use crate::db;
use crate::errors::ApiError;
use crate::models::{Company, CompanyInput};
use crate::policy::{can_perform, Action, Target};
use actix_web::{delete, get, post, put, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;

#[post("/api/v1/companies")]
pub async fn create_company(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    body: web::Json<CompanyInput>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::connect(&state.db_path)?;
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(actor.as_ref(), Action::Create, Target::Company { owner_id: None }).require()?;
    let actor = actor.ok_or_else(ApiError::not_authenticated)?;

    let company = Company::create(&conn, &body, actor.id)?;
    tracing::info!(company_id = company.id, owner_id = actor.id, "company created");
    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "company": company
    })))
}

#[get("/api/v1/companies")]
pub async fn list_companies(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    // reads are public; the anonymous decision covers every actor
    can_perform(None, Action::Read, Target::Company { owner_id: None }).require()?;
    let conn = db::connect(&state.db_path)?;
    let companies = Company::list(&conn)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "companies": companies
    })))
}

#[get("/api/v1/companies/{id}")]
pub async fn get_company(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    can_perform(None, Action::Read, Target::Company { owner_id: None }).require()?;
    let conn = db::connect(&state.db_path)?;
    let Some(company) = Company::get(&conn, path.into_inner())? else {
        return Err(ApiError::NotFound("Company not found".to_string()));
    };
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "company": company
    })))
}

#[put("/api/v1/companies/{id}")]
pub async fn update_company(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    path: web::Path<i64>,
    body: web::Json<CompanyInput>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let conn = db::connect(&state.db_path)?;
    let Some(company) = Company::get(&conn, id)? else {
        return Err(ApiError::NotFound("Company not found".to_string()));
    };
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(
        actor.as_ref(),
        Action::Update,
        Target::Company {
            owner_id: Some(company.owner_id),
        },
    )
    .require()?;

    Company::update(&conn, id, &body)?;
    let Some(company) = Company::get(&conn, id)? else {
        return Err(ApiError::NotFound("Company not found".to_string()));
    };
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "company": company
    })))
}

#[delete("/api/v1/companies/{id}")]
pub async fn delete_company(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let conn = db::connect(&state.db_path)?;
    let Some(company) = Company::get(&conn, id)? else {
        return Err(ApiError::NotFound("Company not found".to_string()));
    };
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(
        actor.as_ref(),
        Action::Delete,
        Target::Company {
            owner_id: Some(company.owner_id),
        },
    )
    .require()?;

    Company::delete(&conn, id)?;
    tracing::info!(company_id = id, "company deleted");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Company deleted"
    })))
}
