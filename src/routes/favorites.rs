use crate::auth;
use crate::config::AppState;
use crate::db;
use crate::errors::ApiError;
use crate::models::{Favorite, Job};
use crate::policy::{can_perform, Action, Target};
use actix_web::{delete, get, post, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    pub job_id: i64,
    // any client-supplied user id is ignored; favorites belong to the actor
}

#[post("/api/v1/favorites")]
pub async fn create_favorite(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    body: web::Json<CreateFavoriteRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::connect(&state.db_path)?;
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(actor.as_ref(), Action::Create, Target::Favorite { owner_id: None }).require()?;
    let actor = actor.ok_or_else(ApiError::not_authenticated)?;

    if Job::get(&conn, body.job_id)?.is_none() {
        return Err(ApiError::NotFound("Job not found".to_string()));
    }
    let favorite = Favorite::create(&conn, actor.id, body.job_id)?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "favorite": favorite
    })))
}

#[get("/api/v1/favorites")]
pub async fn list_favorites(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::connect(&state.db_path)?;
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(actor.as_ref(), Action::Read, Target::Favorite { owner_id: None }).require()?;
    let actor = actor.ok_or_else(ApiError::not_authenticated)?;

    let favorites = Favorite::list_for_user(&conn, actor.id)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "favorites": favorites
    })))
}

#[delete("/api/v1/favorites/{id}")]
pub async fn delete_favorite(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let conn = db::connect(&state.db_path)?;
    let Some(favorite) = Favorite::get(&conn, id)? else {
        return Err(ApiError::NotFound("Favorite not found".to_string()));
    };
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(
        actor.as_ref(),
        Action::Delete,
        Target::Favorite {
            owner_id: Some(favorite.user_id),
        },
    )
    .require()?;

    Favorite::delete(&conn, id)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Favorite removed"
    })))
}
