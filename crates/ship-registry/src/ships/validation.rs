use chrono::{DateTime, Datelike, Utc};

use super::domain::{Ship, ShipDetails, ShipDraft, ShipPatch};
use super::rating::{compute_rating, round_to_hundredths, PROD_YEAR_MAX, PROD_YEAR_MIN};

pub const MAX_TEXT_LENGTH: usize = 50;
pub const MIN_SPEED: f64 = 0.01;
pub const MAX_SPEED: f64 = 0.99;
pub const MIN_CREW_SIZE: i64 = 1;
pub const MAX_CREW_SIZE: i64 = 9999;

/// Rejected caller input. Every variant maps to a client error at the transport edge.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` must not be empty")]
    BlankText { field: &'static str },
    #[error("field `{field}` exceeds {max} characters (found {found})")]
    TextTooLong {
        field: &'static str,
        max: usize,
        found: usize,
    },
    #[error("production date must not precede the epoch (found {millis} ms)")]
    NegativeTimestamp { millis: i64 },
    #[error("production year must lie within 2800..=3019 (found {year})")]
    ProductionYearOutOfRange { year: i32 },
    #[error("speed must lie within 0.01..=0.99 after rounding (found {found})")]
    SpeedOutOfRange { found: f64 },
    #[error("crew size must lie within 1..=9999 (found {found})")]
    CrewSizeOutOfRange { found: i64 },
}

/// Validate a fully populated candidate and derive its rating.
pub fn prepare_for_create(draft: ShipDraft) -> Result<ShipDetails, ValidationError> {
    let ShipDraft {
        name,
        planet,
        ship_type,
        prod_date,
        is_used,
        speed,
        crew_size,
    } = draft;

    let name = name.ok_or(ValidationError::MissingField("name"))?;
    let planet = planet.ok_or(ValidationError::MissingField("planet"))?;
    let ship_type = ship_type.ok_or(ValidationError::MissingField("shipType"))?;
    let prod_date = prod_date.ok_or(ValidationError::MissingField("prodDate"))?;
    let speed = speed.ok_or(ValidationError::MissingField("speed"))?;
    let crew_size = crew_size.ok_or(ValidationError::MissingField("crewSize"))?;

    let name = check_text("name", name)?;
    let planet = check_text("planet", planet)?;
    let crew_size = check_crew_size(crew_size)?;
    let prod_date = check_prod_date(prod_date)?;
    let speed = check_speed(speed)?;
    let is_used = is_used.unwrap_or(false);
    let rating = compute_rating(speed, is_used, prod_date);

    Ok(ShipDetails {
        name,
        planet,
        ship_type,
        prod_date,
        is_used,
        speed,
        crew_size,
        rating,
    })
}

/// Build the merged record for an update without touching `existing`.
///
/// Only fields present in the patch are checked; the first violation rejects the whole
/// patch. The rating is recomputed from the merged values when the patch carries a
/// production date, usage flag, or speed.
pub fn merge_for_update(existing: &Ship, patch: &ShipPatch) -> Result<Ship, ValidationError> {
    let mut merged = existing.clone();

    if let Some(name) = &patch.name {
        merged.name = check_text("name", name.clone())?;
    }
    if let Some(planet) = &patch.planet {
        merged.planet = check_text("planet", planet.clone())?;
    }
    if let Some(ship_type) = patch.ship_type {
        merged.ship_type = ship_type;
    }
    if let Some(prod_date) = patch.prod_date {
        merged.prod_date = check_prod_date(prod_date)?;
    }
    if let Some(is_used) = patch.is_used {
        merged.is_used = is_used;
    }
    if let Some(speed) = patch.speed {
        merged.speed = check_speed(speed)?;
    }
    if let Some(crew_size) = patch.crew_size {
        merged.crew_size = check_crew_size(crew_size)?;
    }

    if patch.touches_rating() {
        merged.rating = compute_rating(merged.speed, merged.is_used, merged.prod_date);
    }

    Ok(merged)
}

/// Apply an optional update body. A missing or empty body leaves the record unchanged.
pub fn apply_patch(existing: Ship, patch: Option<&ShipPatch>) -> Result<Ship, ValidationError> {
    match patch {
        Some(patch) if !patch.is_empty() => merge_for_update(&existing, patch),
        _ => Ok(existing),
    }
}

fn check_text(field: &'static str, value: String) -> Result<String, ValidationError> {
    let found = value.chars().count();
    if found == 0 {
        return Err(ValidationError::BlankText { field });
    }
    if found > MAX_TEXT_LENGTH {
        return Err(ValidationError::TextTooLong {
            field,
            max: MAX_TEXT_LENGTH,
            found,
        });
    }
    Ok(value)
}

fn check_prod_date(prod_date: DateTime<Utc>) -> Result<DateTime<Utc>, ValidationError> {
    let millis = prod_date.timestamp_millis();
    if millis < 0 {
        return Err(ValidationError::NegativeTimestamp { millis });
    }

    let year = prod_date.year();
    if !(PROD_YEAR_MIN..=PROD_YEAR_MAX).contains(&year) {
        return Err(ValidationError::ProductionYearOutOfRange { year });
    }
    Ok(prod_date)
}

fn check_speed(speed: f64) -> Result<f64, ValidationError> {
    let rounded = round_to_hundredths(speed);
    if !(MIN_SPEED..=MAX_SPEED).contains(&rounded) {
        return Err(ValidationError::SpeedOutOfRange { found: rounded });
    }
    Ok(rounded)
}

fn check_crew_size(crew_size: i64) -> Result<u32, ValidationError> {
    if !(MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&crew_size) {
        return Err(ValidationError::CrewSizeOutOfRange { found: crew_size });
    }
    u32::try_from(crew_size).map_err(|_| ValidationError::CrewSizeOutOfRange { found: crew_size })
}
