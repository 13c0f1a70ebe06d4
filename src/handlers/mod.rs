pub mod auth;
pub mod listings;
pub mod profile;

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Registers every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Body parse failures use the same `{"error": ...}` shape as everything else.
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    );

    cfg.route("/health", web::get().to(health_check))
        .route("/auth/login", web::post().to(auth::login))
        .route("/auth/logout", web::post().to(auth::logout))
        .route("/me", web::get().to(profile::me))
        .route("/listings", web::get().to(listings::discover))
        .service(
            web::resource("/profile")
                .route(web::put().to(profile::update_profile))
                .default_service(web::to(profile::profile_method_not_allowed)),
        )
        .service(
            web::resource("/femboy/listings")
                .route(web::post().to(listings::upsert_listing))
                .default_service(web::to(listings::listings_method_not_allowed)),
        );
}
