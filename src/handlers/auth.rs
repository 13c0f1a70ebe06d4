use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::Row;

use crate::auth::{self, Principal, SESSION_COOKIE};
use crate::error::ApiError;
use crate::models::{LoginRequest, Role, User};
use crate::state::AppState;

pub async fn login(
    data: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let login_req = data.into_inner();
    let pool = &state.pool;

    let row = sqlx::query(
        "SELECT id, email, password, role, created_at FROM users WHERE email = ? LIMIT 1"
    )
    .bind(&login_req.email)
    .fetch_optional(pool)
    .await?;

    let row = match row {
        Some(r) => r,
        None => {
            tracing::debug!("login for unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let user = User {
        id: row.get::<String, _>("id"),
        email: row.get::<String, _>("email"),
        password: row.get::<Option<String>, _>("password"),
        role: row
            .get::<String, _>("role")
            .parse::<Role>()
            .map_err(ApiError::Internal)?,
        created_at: row.get::<String, _>("created_at"),
    };

    // Accounts without a password hash cannot log in with one.
    let is_valid = match user.password.clone() {
        Some(hash) => auth::verify_password_blocking(login_req.password, hash).await?,
        None => false,
    };

    if !is_valid {
        tracing::debug!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = auth::create_session(pool, &user.id, state.session_ttl_days).await?;
    let cookie = Cookie::build(SESSION_COOKIE, token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(state.session_ttl_days))
        .finish();

    tracing::info!(user_id = %user.id, role = %user.role, "session created");

    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "message": "Login successful",
        "user": {
            "id": user.id,
            "email": user.email,
            "role": user.role,
            "createdAt": user.created_at
        },
        "token": token
    })))
}

pub async fn logout(principal: Principal, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    auth::revoke_session(&state.pool, &principal.token).await?;

    let cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "message": "Logged out"
    })))
}
