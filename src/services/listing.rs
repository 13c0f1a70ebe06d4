use std::collections::HashMap;

use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{AvailabilitySlot, Listing, ListingSummary, ListingUpsert};
use crate::services::profile::femboy_profile;

#[derive(Debug, FromRow)]
struct ListingRow {
    id: String,
    femboy_id: String,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

/// Creates or updates the listing of the femboy profile owned by `user_id`
/// and replaces its availability with `body.availability`, all in one
/// transaction.
pub async fn upsert(
    pool: &SqlitePool,
    user_id: &str,
    body: &ListingUpsert,
) -> Result<Listing, ApiError> {
    let now = chrono::Utc::now().to_rfc3339();
    let mut tx = pool.begin().await?;

    let profile = femboy_profile(&mut tx, user_id)
        .await?
        .ok_or(ApiError::NotFound("Femboy profile"))?;
    let femboy_id = profile.id.as_str();

    let existing = sqlx::query_scalar::<_, String>("SELECT id FROM listings WHERE femboy_id = ?")
        .bind(femboy_id)
        .fetch_optional(&mut *tx)
        .await?;

    let listing_id = match existing {
        Some(id) => {
            sqlx::query("UPDATE listings SET is_active = ?, updated_at = ? WHERE id = ?")
                .bind(body.is_active)
                .bind(&now)
                .bind(&id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM availability_slots WHERE listing_id = ?")
                .bind(&id)
                .execute(&mut *tx)
                .await?;
            id
        }
        None => {
            let id = Uuid::new_v4().to_string();
            sqlx::query(
                "INSERT INTO listings (id, femboy_id, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(femboy_id)
            .bind(body.is_active)
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
            id
        }
    };

    for (position, slot) in body.availability.iter().enumerate() {
        sqlx::query(
            "INSERT INTO availability_slots (id, listing_id, position, day_of_week, start_time, end_time) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&listing_id)
        .bind(position as i64)
        .bind(slot.day_of_week)
        .bind(&slot.start_time)
        .bind(&slot.end_time)
        .execute(&mut *tx)
        .await?;
    }

    let listing = load(&mut tx, &listing_id).await?;
    tx.commit().await?;

    Ok(listing)
}

async fn load(conn: &mut SqliteConnection, listing_id: &str) -> Result<Listing, ApiError> {
    let row = sqlx::query_as::<_, ListingRow>(
        "SELECT id, femboy_id, is_active, created_at, updated_at FROM listings WHERE id = ?",
    )
    .bind(listing_id)
    .fetch_one(&mut *conn)
    .await?;

    let availability = sqlx::query_as::<_, AvailabilitySlot>(
        "SELECT id, day_of_week, start_time, end_time FROM availability_slots \
         WHERE listing_id = ? ORDER BY position",
    )
    .bind(listing_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Listing {
        id: row.id,
        femboy_id: row.femboy_id,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
        availability,
    })
}

/// Public summaries of every active listing, most recently updated first.
pub async fn discover(pool: &SqlitePool) -> Result<Vec<ListingSummary>, ApiError> {
    let rows = sqlx::query(
        "SELECT l.id AS listing_id, l.femboy_id, f.display_name, f.bio, f.base_rate, \
            (SELECT i.url FROM profile_images i \
              WHERE i.femboy_profile_id = f.id AND i.is_primary = 1 \
              ORDER BY i.created_at DESC LIMIT 1) AS image_url \
         FROM listings l JOIN femboy_profiles f ON f.id = l.femboy_id \
         WHERE l.is_active = 1 \
         ORDER BY l.updated_at DESC",
    )
    .fetch_all(pool)
    .await?;

    let slot_rows = sqlx::query(
        "SELECT s.listing_id, s.id, s.day_of_week, s.start_time, s.end_time \
         FROM availability_slots s JOIN listings l ON l.id = s.listing_id \
         WHERE l.is_active = 1 ORDER BY s.listing_id, s.position",
    )
    .fetch_all(pool)
    .await?;

    let mut slots: HashMap<String, Vec<AvailabilitySlot>> = HashMap::new();
    for r in slot_rows {
        slots
            .entry(r.get::<String, _>("listing_id"))
            .or_default()
            .push(AvailabilitySlot {
                id: r.get::<String, _>("id"),
                day_of_week: r.get::<i64, _>("day_of_week"),
                start_time: r.get::<String, _>("start_time"),
                end_time: r.get::<String, _>("end_time"),
            });
    }

    let summaries = rows
        .into_iter()
        .map(|r| {
            let listing_id = r.get::<String, _>("listing_id");
            ListingSummary {
                availability: slots.remove(&listing_id).unwrap_or_default(),
                listing_id,
                femboy_id: r.get::<String, _>("femboy_id"),
                display_name: r.try_get::<Option<String>, _>("display_name").unwrap_or(None),
                bio: r.try_get::<Option<String>, _>("bio").unwrap_or(None),
                base_rate: r.try_get::<Option<f64>, _>("base_rate").unwrap_or(None),
                image_url: r.try_get::<Option<String>, _>("image_url").unwrap_or(None),
            }
        })
        .collect();

    Ok(summaries)
}
