//! Clamping and fixed-precision rounding shared by every engine.

/// Clamp to the percent scale [0, 100].
#[inline]
pub fn clamp_pct(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// Clamp to the index scale [-1, 1].
#[inline]
pub fn clamp_index(v: f64) -> f64 {
    v.clamp(-1.0, 1.0)
}

/// Round half away from zero to `places` decimals.
#[inline]
pub fn round_dp(v: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (v * scale).round() / scale
}

/// Round to the nearest integer score, half away from zero.
#[inline]
pub fn round_score(v: f64) -> i32 {
    v.round() as i32
}
