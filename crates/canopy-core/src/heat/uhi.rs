//! Urban-heat-island intensity corrected for land cover.
//!
//! The plain UHI reported by the heat-stress engine is `LST − rural`. This
//! variant subtracts a vegetation cooling term and adds an urbanisation term,
//! both as fractions of the ward area.

use crate::error::{finite, in_range, Result};

const VEGETATION_COOLING: f64 = 0.3;
const URBAN_AMPLIFICATION: f64 = 0.2;

/// `max(0, (lst − rural) − 0.3·vegetation_fraction + 0.2·urban_fraction)`.
///
/// Both fractions must lie in [0, 1].
pub fn adjusted_uhi_intensity(
    land_surface_temp: f64,
    rural_reference_temp: f64,
    vegetation_fraction: f64,
    urban_fraction: f64,
) -> Result<f64> {
    let lst = finite("landSurfaceTemp", land_surface_temp)?;
    let rural = finite("ruralReferenceTemp", rural_reference_temp)?;
    let veg = in_range("vegetationFraction", vegetation_fraction, 0.0, 1.0)?;
    let urban = in_range("urbanFraction", urban_fraction, 0.0, 1.0)?;

    let base = lst - rural;
    Ok((base - veg * VEGETATION_COOLING + urban * URBAN_AMPLIFICATION).max(0.0))
}
