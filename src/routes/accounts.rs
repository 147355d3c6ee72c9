use crate::auth;
use crate::config::AppState;
use crate::db;
use crate::enums::Role;
use crate::errors::ApiError;
use crate::enc;
use crate::models::{NewUser, User};
use crate::policy::{can_perform, Action, Target};
use actix_web::{get, post, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration is open to anyone. The role is always forced to `user`;
/// clients cannot register administrators.
#[post("/api/v1/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    if body.email.trim().is_empty() || !body.email.contains('@') {
        return Err(ApiError::Validation("A valid email is required".to_string()));
    }
    if body.username.trim().is_empty() {
        return Err(ApiError::Validation("A username is required".to_string()));
    }
    if body.password.is_empty() {
        return Err(ApiError::Validation("A password is required".to_string()));
    }

    let conn = db::connect(&state.db_path)?;
    let user = User::create(
        &conn,
        &NewUser {
            email: body.email.clone(),
            username: body.username.clone(),
            password_hash: enc::hash_password(&body.password, &state.hash_secret)?,
            role: Role::User,
            is_superuser: false,
            bio: body.bio.clone(),
            location: body.location.clone(),
            phone: body.phone.clone(),
        },
    )?;
    tracing::info!(user_id = user.id, "registered new user");
    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "user": user
    })))
}

/// Login by email + password, returning a signed token carrying
/// {user id, email, role, superuser}.
#[post("/api/v1/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::connect(&state.db_path)?;
    let Some(user) = User::get_by_email(&conn, &body.email)? else {
        return Err(ApiError::NotAuthenticated("Invalid email or password".to_string()));
    };
    if !enc::verify_password(&body.password, &user.password, &state.hash_secret)? {
        return Err(ApiError::NotAuthenticated("Invalid email or password".to_string()));
    }
    let token = auth::issue_token(&user, &state.jwt_secret)?;
    tracing::info!(user_id = user.id, "login succeeded");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "token": token,
        "user": user
    })))
}

/// The acting user's own record.
#[get("/api/v1/user")]
pub async fn current_user(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::connect(&state.db_path)?;
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?
        .ok_or_else(ApiError::not_authenticated)?;
    let Some(user) = User::get(&conn, actor.id)? else {
        return Err(ApiError::NotFound("User not found".to_string()));
    };
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": user
    })))
}

/// Full user directory, admins and superusers only.
#[get("/api/v1/users")]
pub async fn list_users(
    state: web::Data<AppState>,
    bearer: Option<BearerAuth>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::connect(&state.db_path)?;
    let actor = auth::resolve_actor(&conn, bearer.as_ref(), &state.jwt_secret)?;
    can_perform(actor.as_ref(), Action::Read, Target::UserDirectory).require()?;
    let users = User::list(&conn)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "users": users
    })))
}
