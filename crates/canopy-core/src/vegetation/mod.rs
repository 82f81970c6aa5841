//! Vegetation health from spectral bands.
//!
//! Pipeline:
//!   bands → NDVI / EVI → green-cover remap → density bucket → change vs prior.

pub mod density;
pub mod indices;

use serde::{Deserialize, Serialize};

use crate::error::{finite, index, Result};
use crate::numeric::{clamp_pct, round_dp};

pub use density::VegetationDensity;
use indices::{evi, ndvi};

pub(crate) fn default_blue_band() -> f64 {
    0.1
}

/// Surface reflectance for one ward observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VegetationInput {
    pub red_band: f64,
    pub nir_band: f64,
    #[serde(default = "default_blue_band")]
    pub blue_band: f64,
    /// NDVI of the previous stored observation, if any.
    #[serde(default, rename = "previousNDVI")]
    pub previous_ndvi: Option<f64>,
}

impl VegetationInput {
    pub fn new(red_band: f64, nir_band: f64) -> Self {
        Self {
            red_band,
            nir_band,
            blue_band: default_blue_band(),
            previous_ndvi: None,
        }
    }

    pub fn with_previous(mut self, previous_ndvi: f64) -> Self {
        self.previous_ndvi = Some(previous_ndvi);
        self
    }

    fn validate(&self) -> Result<()> {
        finite("redBand", self.red_band)?;
        finite("nirBand", self.nir_band)?;
        finite("blueBand", self.blue_band)?;
        if let Some(prev) = self.previous_ndvi {
            index("previousNDVI", prev)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VegetationResult {
    /// [-1, 1], 4 dp.
    pub ndvi: f64,
    /// [-1, 1], 4 dp.
    pub evi: f64,
    /// [0, 100], 2 dp.
    pub green_cover_percent: f64,
    pub vegetation_density: VegetationDensity,
    /// `ndvi − previousNDVI`, 4 dp; `None` on a first observation.
    pub change_from_previous: Option<f64>,
}

/// Linear NDVI → cover remap: −0.1 maps to 0 %, 1.0 maps to 100 %.
///
/// Not a physical model; dashboards and stored history depend on this exact
/// mapping.
pub fn green_cover_percent(ndvi: f64) -> f64 {
    clamp_pct((ndvi + 0.1) / 1.1 * 100.0)
}

/// Compute NDVI, EVI, green cover, density, and change for one observation.
///
/// Only non-finite bands (or an out-of-range prior NDVI) are rejected; odd but
/// finite reflectances saturate the clamped indices instead.
pub fn compute_vegetation_health(input: &VegetationInput) -> Result<VegetationResult> {
    input.validate()?;

    let ndvi_raw = ndvi(input.red_band, input.nir_band);
    let evi_raw = evi(input.red_band, input.nir_band, input.blue_band);
    let ndvi = round_dp(ndvi_raw, 4);

    // Change is taken on the reported NDVI so a result fed back as the prior
    // reproduces a change of exactly zero.
    let change_from_previous = input.previous_ndvi.map(|prev| round_dp(ndvi - prev, 4));

    let result = VegetationResult {
        ndvi,
        evi: round_dp(evi_raw, 4),
        green_cover_percent: round_dp(green_cover_percent(ndvi_raw), 2),
        vegetation_density: VegetationDensity::classify(ndvi_raw),
        change_from_previous,
    };
    log::debug!(
        "vegetation: ndvi={} evi={} cover={}% density={}",
        result.ndvi,
        result.evi,
        result.green_cover_percent,
        result.vegetation_density
    );
    Ok(result)
}
