use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role; decides which profile table a user owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Renter,
    Femboy,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Renter => "RENTER",
            Role::Femboy => "FEMBOY",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RENTER" => Ok(Role::Renter),
            "FEMBOY" => Ok(Role::Femboy),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: Option<String>,
    pub role: Role,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
