use chrono::{DateTime, Datelike, Utc};

/// Earliest accepted production year.
pub const PROD_YEAR_MIN: i32 = 2800;
/// Latest accepted production year; also the reference year for ship age.
pub const PROD_YEAR_MAX: i32 = 3019;

const USED_COEFFICIENT: f64 = 0.5;
const NEW_COEFFICIENT: f64 = 1.0;
const RATING_SCALE: f64 = 80.0;

/// Round half-up to two decimal places.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Derived score for a ship.
///
/// `rating = round(k * speed * 80 / (3019 - year + 1), 2)` where `k` is `0.5` for used
/// ships and `1.0` otherwise. Callers are expected to pass a production date whose year
/// lies within [`PROD_YEAR_MIN`, `PROD_YEAR_MAX`]; the divisor is clamped to `1` so
/// out-of-range dates never divide by zero.
pub fn compute_rating(speed: f64, is_used: bool, prod_date: DateTime<Utc>) -> f64 {
    let coefficient = if is_used {
        USED_COEFFICIENT
    } else {
        NEW_COEFFICIENT
    };
    let years_remaining = (PROD_YEAR_MAX - prod_date.year() + 1).max(1);

    round_to_hundredths(coefficient * speed * RATING_SCALE / f64::from(years_remaining))
}
