use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use jobboard::config::{AppConfig, AppState};
use jobboard::{db, routes};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = AppConfig::from_env();
    let conn = db::connect(&config.db_path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    db::init_schema(&conn)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    drop(conn);

    let state = AppState::new(&config);
    let bind_addr = config.bind_addr.clone();
    tracing::info!(addr = %bind_addr, db = %config.db_path, "starting jobboard server");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);
        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
