//! Spectral vegetation indices from surface reflectance.
//!
//! Both indices carry an ε in the denominator so that all-zero bands give 0
//! rather than NaN, and both are clamped to [-1, 1]. A degenerate denominator
//! (e.g. `nir + red ≈ -ε`) saturates to ±1 instead of failing.

use crate::numeric::clamp_index;

/// Denominator guard shared by NDVI and EVI.
pub const EPSILON: f64 = 0.001;

// MODIS EVI coefficients.
const EVI_GAIN: f64 = 2.5;
const EVI_C1: f64 = 6.0;
const EVI_C2: f64 = 7.5;
const EVI_L: f64 = 1.0;

/// NDVI = (NIR − Red) / (NIR + Red + ε), clamped to [-1, 1].
pub fn ndvi(red: f64, nir: f64) -> f64 {
    saturate((nir - red) / (nir + red + EPSILON))
}

/// EVI = G·(NIR − Red) / (NIR + C1·Red − C2·Blue + L + ε), clamped to [-1, 1].
pub fn evi(red: f64, nir: f64, blue: f64) -> f64 {
    saturate(EVI_GAIN * (nir - red) / (nir + EVI_C1 * red - EVI_C2 * blue + EVI_L + EPSILON))
}

/// Clamp, mapping the 0/0 case to 0.
#[inline]
fn saturate(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        clamp_index(v)
    }
}
