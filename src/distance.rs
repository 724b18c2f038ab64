//! Pace to distance-rate conversions.
//!
//! Pace is strokes per minute; one recreational rowing stroke covers
//! roughly 10 meters, which is the fixed conversion constant throughout.
//! The accumulator side works in integer millimeters so that replaying a
//! suspension gap in one multiplication lands on exactly the same value
//! as ticking once per second would have.

/// Meters covered by a single stroke.
pub const METERS_PER_STROKE: f64 = 10.0;

pub fn meters_per_minute(pace: f64) -> f64 {
    pace * METERS_PER_STROKE
}

pub fn meters_per_second(pace: f64) -> f64 {
    meters_per_minute(pace) / 60.0
}

/// Integral accrual rate. One live tick adds this once; a bulk replay of
/// `n` seconds adds `n *` this. Integer multiplication distributes, so the
/// two paths agree for every pace value.
pub fn millimeters_per_second(pace: f64) -> u64 {
    (meters_per_second(pace) * 1000.0).round() as u64
}

pub fn mm_to_meters(mm: u64) -> f64 {
    mm as f64 / 1000.0
}

/// Human-readable distance: meters below 1 km, two decimals below 10 km,
/// one decimal beyond.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round() as i64)
    } else if meters < 10_000.0 {
        format!("{:.2}km", meters / 1000.0)
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}
