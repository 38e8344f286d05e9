#![forbid(unsafe_code)]

/// Fixed denominator of the mission stats bar.
pub const STATS_TOTAL: i64 = 100;
/// Points earned per star when a mission is completed.
pub const STAR_POINTS: i64 = 10;

pub fn star_points(stars: u8) -> i64 {
    i64::from(stars) * STAR_POINTS
}

/// `floor(min(value / max, 1) * 100)`.
///
/// A non-positive `max` or a negative `value` renders as 0%.
pub fn percentage(value: i64, max: i64) -> u8 {
    if max <= 0 || value <= 0 {
        return 0;
    }
    if value >= max {
        return 100;
    }
    let pct = (i128::from(value) * 100) / i128::from(max);
    pct as u8
}
