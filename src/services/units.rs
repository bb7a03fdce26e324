//! Unit conversions from provider units into display units.
//!
//! All functions here are pure. Rounding uses round-half-to-even everywhere
//! (`f64::round_ties_even`), so `.5` boundaries resolve to the even neighbour.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// hPa to mmHg factor
const HPA_TO_MM_HG: f64 = 0.750062;

/// Degrees covered by one compass octant
const OCTANT_DEGREES: f64 = 45.0;

/// Eight-point compass direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    const CLOCKWISE: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// Russian abbreviation used in replies
    pub fn label(&self) -> &'static str {
        match self {
            Direction::N => "С",
            Direction::NE => "СВ",
            Direction::E => "В",
            Direction::SE => "ЮВ",
            Direction::S => "Ю",
            Direction::SW => "ЮЗ",
            Direction::W => "З",
            Direction::NW => "СЗ",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Convert pressure from hPa to mmHg, rounded half-to-even.
pub fn pressure_to_mm_hg(hpa: i64) -> i64 {
    (hpa as f64 * HPA_TO_MM_HG).round_ties_even() as i64
}

/// Round a float to the nearest integer, half-to-even.
pub fn round_whole(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Format a UTC epoch as `HH:MM` in a constant `UTC+offset` zone.
///
/// Offsets outside chrono's accepted range fall back to UTC; an epoch chrono
/// cannot represent renders as `--:--`.
pub fn epoch_to_local_clock(epoch_seconds: i64, utc_offset_hours: i32) -> String {
    let offset = FixedOffset::east_opt(utc_offset_hours.saturating_mul(3600))
        .unwrap_or_else(|| Utc.fix());

    match DateTime::<Utc>::from_timestamp(epoch_seconds, 0) {
        Some(utc) => utc.with_timezone(&offset).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

/// Nearest-octant compass classification: `round(deg / 45) mod 8`.
pub fn degrees_to_compass(deg: i64) -> Direction {
    let octant = (deg as f64 / OCTANT_DEGREES).round_ties_even() as i64;
    Direction::CLOCKWISE[octant.rem_euclid(8) as usize]
}
