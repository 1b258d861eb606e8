use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned identity of a ship record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipId(pub u64);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hull category of a registered ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    Transport,
    Military,
    Merchant,
}

impl ShipType {
    pub const fn ordered() -> [Self; 3] {
        [Self::Transport, Self::Military, Self::Merchant]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Transport => "TRANSPORT",
            Self::Military => "MILITARY",
            Self::Merchant => "MERCHANT",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(raw))
    }
}

/// A persisted ship. `rating` is always derived from `speed`, `is_used`, and `prod_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    pub id: ShipId,
    pub name: String,
    pub planet: String,
    pub ship_type: ShipType,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub prod_date: DateTime<Utc>,
    pub is_used: bool,
    pub speed: f64,
    pub crew_size: u32,
    pub rating: f64,
}

impl Ship {
    pub fn from_details(id: ShipId, details: ShipDetails) -> Self {
        let ShipDetails {
            name,
            planet,
            ship_type,
            prod_date,
            is_used,
            speed,
            crew_size,
            rating,
        } = details;

        Self {
            id,
            name,
            planet,
            ship_type,
            prod_date,
            is_used,
            speed,
            crew_size,
            rating,
        }
    }

    /// Calendar year of the production date, evaluated in UTC.
    pub fn prod_year(&self) -> i32 {
        self.prod_date.year()
    }
}

/// Validated ship attributes awaiting an identity from storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipDetails {
    pub name: String,
    pub planet: String,
    pub ship_type: ShipType,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub prod_date: DateTime<Utc>,
    pub is_used: bool,
    pub speed: f64,
    pub crew_size: u32,
    pub rating: f64,
}

/// Inbound create request. Fields are optional so a missing value can be rejected
/// explicitly instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub planet: Option<String>,
    #[serde(default)]
    pub ship_type: Option<ShipType>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub prod_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_used: Option<bool>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub crew_size: Option<i64>,
}

/// Partial update document. Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub planet: Option<String>,
    #[serde(default)]
    pub ship_type: Option<ShipType>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub prod_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_used: Option<bool>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub crew_size: Option<i64>,
}

impl ShipPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.planet.is_none()
            && self.ship_type.is_none()
            && self.prod_date.is_none()
            && self.is_used.is_none()
            && self.speed.is_none()
            && self.crew_size.is_none()
    }

    /// Whether applying this patch requires the rating to be recomputed.
    pub fn touches_rating(&self) -> bool {
        self.prod_date.is_some() || self.is_used.is_some() || self.speed.is_some()
    }
}
