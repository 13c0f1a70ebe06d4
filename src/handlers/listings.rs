use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::Principal;
use crate::error::{method_not_allowed, ApiError};
use crate::models::{ListingUpsert, Role};
use crate::services::listing;
use crate::state::AppState;

pub async fn upsert_listing(
    principal: Principal,
    payload: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    // Role first: a renter gets 403 whatever the body looks like.
    principal.require_role(Role::Femboy)?;

    let body: ListingUpsert = serde_json::from_slice(&payload)
        .map_err(|err| ApiError::BadRequest(format!("Json deserialize error: {}", err)))?;
    for slot in &body.availability {
        slot.validate().map_err(ApiError::BadRequest)?;
    }

    let listing = listing::upsert(&state.pool, &principal.id, &body).await?;

    tracing::info!(
        user_id = %principal.id,
        listing_id = %listing.id,
        is_active = listing.is_active,
        slots = listing.availability.len(),
        "listing saved"
    );

    Ok(HttpResponse::Created().json(json!({
        "message": "Listing saved successfully",
        "listingId": listing.id,
        "data": listing
    })))
}

pub async fn listings_method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(method_not_allowed("POST"))
}

pub async fn discover(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let items = listing::discover(&state.pool).await?;
    Ok(HttpResponse::Ok().json(items))
}
