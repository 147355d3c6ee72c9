pub mod accounts;
pub mod applications;
pub mod companies;
pub mod favorites;
pub mod jobs;
pub mod misc;

use crate::errors::ApiError;
use actix_web::web;

/// Registers every endpoint plus JSON/query error handlers that keep
/// malformed input inside the standard error envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid query parameters: {}", err)).into()
    }))
    .service(accounts::register)
    .service(accounts::login)
    .service(accounts::current_user)
    .service(accounts::list_users)
    .service(companies::create_company)
    .service(companies::list_companies)
    .service(companies::get_company)
    .service(companies::update_company)
    .service(companies::delete_company)
    .service(jobs::list_jobs)
    .service(jobs::get_job)
    .service(jobs::create_job)
    .service(jobs::update_job)
    .service(jobs::delete_job)
    .service(applications::create_application)
    .service(applications::list_applications)
    .service(applications::get_application)
    .service(applications::update_application_status)
    .service(applications::delete_application)
    .service(favorites::create_favorite)
    .service(favorites::list_favorites)
    .service(favorites::delete_favorite)
    .service(misc::health_check)
    .service(misc::upload)
    .service(misc::serve_file);
}
