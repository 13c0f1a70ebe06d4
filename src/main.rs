use actix_cors::Cors;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use rental_profiles::config::AppConfig;
use rental_profiles::state::AppState;
use rental_profiles::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let pool = match db::init_pool(&config.database_url, config.max_connections).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(error = %err, database_url = %config.database_url, "failed to initialize SQLite pool");
            return Err(std::io::Error::new(std::io::ErrorKind::Other, err));
        }
    };
    let app_state = web::Data::new(AppState::new(pool, config.session_ttl_days));

    tracing::info!(host = %config.host, port = config.port, "starting rental profiles backend");

    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(app_state.clone())
            .configure(handlers::configure)
    })
    .bind(config.bind_address())?
    .run()
    .await
}
