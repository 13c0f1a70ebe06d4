use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::Principal;
use crate::error::{method_not_allowed, ApiError};
use crate::models::ProfileUpdate;
use crate::services::profile;
use crate::state::AppState;

pub async fn update_profile(
    principal: Principal,
    data: web::Json<ProfileUpdate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let update = data.into_inner();

    if let Err(err) = profile::apply_update(&state.pool, &principal, &update).await {
        // The cause itself is logged at error level by `ApiError::error_response`.
        tracing::debug!(
            target: "profile_update",
            user_id = %principal.id,
            role = %principal.role,
            error = %err,
            "profile update rolled back"
        );
        return Err(err);
    }

    tracing::info!(
        user_id = %principal.id,
        role = %principal.role,
        image_replaced = update.image_url.is_some(),
        "profile updated"
    );

    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile updated successfully"
    })))
}

pub async fn profile_method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(method_not_allowed("PUT"))
}

pub async fn me(principal: Principal, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let snapshot = profile::snapshot(&state.pool, &principal).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}
