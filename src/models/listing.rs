use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub id: String,
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub femboy_id: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub availability: Vec<AvailabilitySlot>,
}

/// Body of `POST /femboy/listings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpsert {
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub availability: Vec<SlotInput>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotInput {
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
}

impl SlotInput {
    pub fn validate(&self) -> Result<(), String> {
        if !(0..=6).contains(&self.day_of_week) {
            return Err(format!("dayOfWeek must be between 0 and 6, got {}", self.day_of_week));
        }
        let start = parse_clock(&self.start_time)
            .ok_or_else(|| format!("startTime '{}' is not HH:MM", self.start_time))?;
        let end = parse_clock(&self.end_time)
            .ok_or_else(|| format!("endTime '{}' is not HH:MM", self.end_time))?;
        if start >= end {
            return Err(format!(
                "startTime {} must be before endTime {}",
                self.start_time, self.end_time
            ));
        }
        Ok(())
    }
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    // NaiveTime accepts "9:00"; require the zero-padded form.
    if value.len() != 5 {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Public card returned by `GET /listings`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub listing_id: String,
    pub femboy_id: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub base_rate: Option<f64>,
    pub image_url: Option<String>,
    pub availability: Vec<AvailabilitySlot>,
}
