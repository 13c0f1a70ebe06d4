#![allow(dead_code)]

use sqlx::SqlitePool;
use uuid::Uuid;

use rental_profiles::auth;
use rental_profiles::db;
use rental_profiles::models::Role;

/// Builds the full app over `$pool`, the same way `main` wires it.
macro_rules! test_app {
    ($pool:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(
                    rental_profiles::state::AppState::new($pool.clone(), 30),
                ))
                .configure(rental_profiles::handlers::configure),
        )
        .await
    };
}

/// In-memory databases are per connection, so the pool is capped at one.
pub async fn test_pool() -> SqlitePool {
    db::init_pool("sqlite::memory:", 1)
        .await
        .expect("in-memory pool")
}

pub async fn seed_user(pool: &SqlitePool, email: &str, role: Role, password: Option<&str>) -> String {
    let id = Uuid::new_v4().to_string();
    let hash = password.map(|p| auth::hash_password(p).expect("hash"));
    sqlx::query("INSERT INTO users (id, email, password, role, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&id)
        .bind(email)
        .bind(hash)
        .bind(role.as_str())
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(pool)
        .await
        .expect("insert user");
    id
}

pub async fn seed_renter_profile(pool: &SqlitePool, user_id: &str, nickname: Option<&str>) -> String {
    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO renter_profiles (id, user_id, nickname) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(user_id)
        .bind(nickname)
        .execute(pool)
        .await
        .expect("insert renter profile");
    id
}

pub async fn seed_femboy_profile(
    pool: &SqlitePool,
    user_id: &str,
    display_name: &str,
    bio: &str,
    base_rate: f64,
) -> String {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO femboy_profiles (id, user_id, display_name, bio, base_rate) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(display_name)
    .bind(bio)
    .bind(base_rate)
    .execute(pool)
    .await
    .expect("insert femboy profile");
    id
}

/// `owner_column` is `renter_profile_id` or `femboy_profile_id`.
pub async fn seed_image(pool: &SqlitePool, owner_column: &str, profile_id: &str, url: &str, primary: bool) {
    sqlx::query(&format!(
        "INSERT INTO profile_images (id, {}, url, is_primary, created_at) VALUES (?, ?, ?, ?, ?)",
        owner_column
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(profile_id)
    .bind(url)
    .bind(primary)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(pool)
    .await
    .expect("insert image");
}

pub async fn seed_session(pool: &SqlitePool, user_id: &str) -> String {
    auth::create_session(pool, user_id, 30).await.expect("session")
}

pub async fn seed_listing(pool: &SqlitePool, femboy_id: &str, is_active: bool, slots: &[(i64, &str, &str)]) -> String {
    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query(
        "INSERT INTO listings (id, femboy_id, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(femboy_id)
    .bind(is_active)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .expect("insert listing");

    for (position, (day, start, end)) in slots.iter().enumerate() {
        sqlx::query(
            "INSERT INTO availability_slots (id, listing_id, position, day_of_week, start_time, end_time) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&id)
        .bind(position as i64)
        .bind(*day)
        .bind(*start)
        .bind(*end)
        .execute(pool)
        .await
        .expect("insert slot");
    }
    id
}

pub async fn count_images(pool: &SqlitePool, owner_column: &str, profile_id: &str) -> (i64, i64) {
    let total: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM profile_images WHERE {} = ?",
        owner_column
    ))
    .bind(profile_id)
    .fetch_one(pool)
    .await
    .expect("count images");
    let primary: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM profile_images WHERE {} = ? AND is_primary = 1",
        owner_column
    ))
    .bind(profile_id)
    .fetch_one(pool)
    .await
    .expect("count primary images");
    (total, primary)
}

pub async fn user_email(pool: &SqlitePool, user_id: &str) -> String {
    sqlx::query_scalar("SELECT email FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("user email")
}

pub async fn slot_count(pool: &SqlitePool, listing_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM availability_slots WHERE listing_id = ?")
        .bind(listing_id)
        .fetch_one(pool)
        .await
        .expect("slot count")
}
