use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::auth::{hash_password_blocking, Principal};
use crate::error::ApiError;
use crate::models::{FemboyProfile, MeSnapshot, ProfileSnapshot, ProfileUpdate, RenterProfile, Role};

/// Which profile an image row hangs off.
#[derive(Debug, Clone, Copy)]
enum ImageOwner<'a> {
    Renter(&'a str),
    Femboy(&'a str),
}

impl<'a> ImageOwner<'a> {
    fn column(&self) -> &'static str {
        match *self {
            ImageOwner::Renter(_) => "renter_profile_id",
            ImageOwner::Femboy(_) => "femboy_profile_id",
        }
    }

    fn profile_id(&self) -> &'a str {
        match *self {
            ImageOwner::Renter(id) | ImageOwner::Femboy(id) => id,
        }
    }
}

/// Applies a profile edit for the caller in a single transaction.
///
/// Fields missing from `update` keep their stored values. If any step fails
/// the transaction is dropped uncommitted and nothing is written.
pub async fn apply_update(
    pool: &SqlitePool,
    principal: &Principal,
    update: &ProfileUpdate,
) -> Result<(), ApiError> {
    let password_hash = match update.password.clone() {
        Some(plain) => Some(hash_password_blocking(plain).await?),
        None => None,
    };

    let mut tx = pool.begin().await?;

    update_user(&mut tx, &principal.id, update.email.as_deref(), password_hash.as_deref()).await?;

    match principal.role {
        Role::Renter => {
            let profile = renter_profile(&mut tx, &principal.id)
                .await?
                .ok_or(ApiError::ProfileMissing(Role::Renter))?;

            if let Some(nickname) = update.nickname.as_deref() {
                sqlx::query("UPDATE renter_profiles SET nickname = ? WHERE id = ?")
                    .bind(nickname)
                    .bind(&profile.id)
                    .execute(&mut *tx)
                    .await?;
            }

            if let Some(url) = update.image_url.as_deref() {
                replace_primary_image(&mut tx, ImageOwner::Renter(&profile.id), url).await?;
            }
        }
        Role::Femboy => {
            let profile = femboy_profile(&mut tx, &principal.id)
                .await?
                .ok_or(ApiError::ProfileMissing(Role::Femboy))?;

            let base_rate = update.parsed_base_rate();
            if update.display_name.is_some() || update.bio.is_some() || base_rate.is_some() {
                sqlx::query(
                    "UPDATE femboy_profiles SET \
                        display_name = COALESCE(?, display_name), \
                        bio = COALESCE(?, bio), \
                        base_rate = COALESCE(?, base_rate) \
                     WHERE id = ?",
                )
                .bind(update.display_name.as_deref())
                .bind(update.bio.as_deref())
                .bind(base_rate)
                .bind(&profile.id)
                .execute(&mut *tx)
                .await?;
            }

            if let Some(url) = update.image_url.as_deref() {
                replace_primary_image(&mut tx, ImageOwner::Femboy(&profile.id), url).await?;
            }
        }
    }

    tx.commit().await?;
    Ok(())
}

async fn update_user(
    conn: &mut SqliteConnection,
    user_id: &str,
    email: Option<&str>,
    password_hash: Option<&str>,
) -> Result<(), ApiError> {
    if email.is_none() && password_hash.is_none() {
        return Ok(());
    }

    sqlx::query(
        "UPDATE users SET email = COALESCE(?, email), password = COALESCE(?, password) WHERE id = ?",
    )
    .bind(email)
    .bind(password_hash)
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Drops every image of the profile and inserts `url` as its only, primary, image.
async fn replace_primary_image(
    conn: &mut SqliteConnection,
    owner: ImageOwner<'_>,
    url: &str,
) -> Result<(), ApiError> {
    let column = owner.column();

    sqlx::query(&format!("DELETE FROM profile_images WHERE {} = ?", column))
        .bind(owner.profile_id())
        .execute(&mut *conn)
        .await?;

    sqlx::query(&format!(
        "INSERT INTO profile_images (id, {}, url, is_primary, created_at) VALUES (?, ?, ?, 1, ?)",
        column
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(owner.profile_id())
    .bind(url)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn renter_profile(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Option<RenterProfile>, sqlx::Error> {
    sqlx::query_as::<_, RenterProfile>(
        "SELECT id, user_id, nickname FROM renter_profiles WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn femboy_profile(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Option<FemboyProfile>, sqlx::Error> {
    sqlx::query_as::<_, FemboyProfile>(
        "SELECT id, user_id, display_name, bio, base_rate FROM femboy_profiles WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await
}

async fn primary_image_url(
    conn: &mut SqliteConnection,
    owner: ImageOwner<'_>,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(&format!(
        "SELECT url FROM profile_images WHERE {} = ? AND is_primary = 1 \
         ORDER BY created_at DESC LIMIT 1",
        owner.column()
    ))
    .bind(owner.profile_id())
    .fetch_optional(&mut *conn)
    .await
}

/// Normalized view of the caller's profile for `GET /me`.
pub async fn snapshot(pool: &SqlitePool, principal: &Principal) -> Result<MeSnapshot, ApiError> {
    let mut conn = pool.acquire().await?;

    let email = sqlx::query_scalar::<_, String>("SELECT email FROM users WHERE id = ?")
        .bind(&principal.id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let mut profile = ProfileSnapshot {
        email,
        ..ProfileSnapshot::default()
    };

    match principal.role {
        Role::Renter => {
            if let Some(renter) = renter_profile(&mut conn, &principal.id).await? {
                profile.image_url = primary_image_url(&mut conn, ImageOwner::Renter(&renter.id)).await?;
                profile.nickname = renter.nickname;
            }
        }
        Role::Femboy => {
            if let Some(femboy) = femboy_profile(&mut conn, &principal.id).await? {
                profile.image_url = primary_image_url(&mut conn, ImageOwner::Femboy(&femboy.id)).await?;
                let is_active = sqlx::query_scalar::<_, bool>(
                    "SELECT is_active FROM listings WHERE femboy_id = ?",
                )
                .bind(&femboy.id)
                .fetch_optional(&mut *conn)
                .await?;
                profile.is_active = Some(is_active.unwrap_or(false));
                profile.display_name = femboy.display_name;
                profile.bio = femboy.bio;
                profile.base_rate = femboy.base_rate;
            }
        }
    }

    Ok(MeSnapshot {
        role: principal.role,
        profile,
    })
}
