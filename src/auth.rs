//! Session-based auth gate.
//!
//! Handlers that take a [`Principal`] argument only run once a valid session
//! token has been resolved to a user id and role; otherwise the request is
//! answered with 401 before the handler body executes.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Role;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Fixed bcrypt work factor for stored password hashes.
pub const PASSWORD_HASH_COST: u32 = 10;

pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    Ok(bcrypt::hash(plain, PASSWORD_HASH_COST)?)
}

pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

/// [`hash_password`] on actix's blocking pool, off the worker thread.
pub async fn hash_password_blocking(plain: String) -> Result<String, ApiError> {
    web::block(move || hash_password(&plain))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
}

pub async fn verify_password_blocking(plain: String, hash: String) -> Result<bool, ApiError> {
    web::block(move || verify_password(&plain, &hash))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: String,
    pub role: Role,
    pub token: String,
}

impl Principal {
    pub fn require_role(&self, role: Role) -> Result<(), ApiError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Session cookie first, then `Authorization: Bearer`.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

pub async fn resolve_session(pool: &SqlitePool, token: &str) -> Result<Option<Principal>, ApiError> {
    let row = sqlx::query(
        "SELECT s.user_id, s.expires_at, u.role FROM sessions s \
         JOIN users u ON u.id = s.user_id WHERE s.token = ? LIMIT 1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    let row = match row {
        Some(r) => r,
        None => return Ok(None),
    };

    if let Some(expires_at) = row.get::<Option<String>, _>("expires_at") {
        match DateTime::parse_from_rfc3339(&expires_at) {
            Ok(t) if t.with_timezone(&Utc) > Utc::now() => {}
            _ => return Ok(None),
        }
    }

    let role = row
        .get::<String, _>("role")
        .parse::<Role>()
        .map_err(ApiError::Internal)?;

    Ok(Some(Principal {
        id: row.get::<String, _>("user_id"),
        role,
        token: token.to_string(),
    }))
}

pub async fn create_session(pool: &SqlitePool, user_id: &str, ttl_days: i64) -> Result<String, ApiError> {
    let token = Uuid::new_v4().to_string();
    let created_at = Utc::now();
    let expires_at = created_at + chrono::Duration::days(ttl_days);

    sqlx::query(
        "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&token)
    .bind(user_id)
    .bind(created_at.to_rfc3339())
    .bind(expires_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(token)
}

pub async fn revoke_session(pool: &SqlitePool, token: &str) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

impl FromRequest for Principal {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = session_token(req);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let token = match token {
                Some(t) => t,
                None => {
                    tracing::debug!("request without session token");
                    return Err(ApiError::Unauthorized);
                }
            };
            let state = state.ok_or_else(|| ApiError::Internal("application state is not registered".into()))?;

            match resolve_session(&state.pool, &token).await? {
                Some(principal) => Ok(principal),
                None => {
                    tracing::debug!("unknown or expired session token");
                    Err(ApiError::Unauthorized)
                }
            }
        })
    }
}
