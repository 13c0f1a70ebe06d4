use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;
use sqlx::FromRow;

use super::Role;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RenterProfile {
    pub id: String,
    pub user_id: String,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FemboyProfile {
    pub id: String,
    pub user_id: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub base_rate: Option<f64>,
}

/// Body of `PUT /profile`. Every field is optional; `null` counts as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    /// Kept unparsed so an out-of-range number such as `1e400` cannot fail
    /// the whole body.
    pub base_rate: Option<Box<RawValue>>,
    pub image_url: Option<String>,
}

impl ProfileUpdate {
    /// The base rate, if the submitted value reads as a finite number.
    pub fn parsed_base_rate(&self) -> Option<f64> {
        let raw = self.base_rate.as_deref()?;
        let value = serde_json::from_str::<Value>(raw.get()).ok()?;
        parse_base_rate(&value)
    }
}

/// Accepts JSON numbers and numeric strings; anything else is ignored.
pub fn parse_base_rate(value: &Value) -> Option<f64> {
    let rate = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    rate.filter(|r| r.is_finite())
}

/// Response of `GET /me`, used to pre-populate the edit form.
#[derive(Debug, Serialize)]
pub struct MeSnapshot {
    pub role: Role,
    pub profile: ProfileSnapshot,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    pub image_url: Option<String>,
}
