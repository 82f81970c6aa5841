use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Canopy density bucket derived from NDVI.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VegetationDensity {
    Barren,
    Sparse,
    Moderate,
    Dense,
    VeryDense,
}

impl VegetationDensity {
    /// Half-open buckets; a boundary value belongs to the higher bucket.
    ///
    /// | NDVI        | bucket      |
    /// |-------------|-------------|
    /// | < 0.1       | barren      |
    /// | [0.1, 0.2)  | sparse      |
    /// | [0.2, 0.4)  | moderate    |
    /// | [0.4, 0.6)  | dense       |
    /// | ≥ 0.6       | very_dense  |
    pub fn classify(ndvi: f64) -> Self {
        if ndvi < 0.1 {
            Self::Barren
        } else if ndvi < 0.2 {
            Self::Sparse
        } else if ndvi < 0.4 {
            Self::Moderate
        } else if ndvi < 0.6 {
            Self::Dense
        } else {
            Self::VeryDense
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_higher_bucket() {
        assert_eq!(VegetationDensity::classify(0.1), VegetationDensity::Sparse);
        assert_eq!(VegetationDensity::classify(0.2), VegetationDensity::Moderate);
        assert_eq!(VegetationDensity::classify(0.4), VegetationDensity::Dense);
        assert_eq!(VegetationDensity::classify(0.6), VegetationDensity::VeryDense);
        assert_eq!(VegetationDensity::classify(0.099_999), VegetationDensity::Barren);
    }

    /// ✓ Total, ordered partition of [-1, 1].
    #[test]
    fn partition_is_total_and_monotone() {
        let mut prev = VegetationDensity::classify(-1.0);
        assert_eq!(prev, VegetationDensity::Barren);
        for i in 0..=2000 {
            let ndvi = -1.0 + i as f64 * 0.001;
            let d = VegetationDensity::classify(ndvi);
            assert!(d >= prev, "ndvi={ndvi:.3}: {d} after {prev}");
            prev = d;
        }
        assert_eq!(prev, VegetationDensity::VeryDense);
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&VegetationDensity::VeryDense).unwrap();
        assert_eq!(json, "\"very_dense\"");
        assert_eq!(VegetationDensity::VeryDense.to_string(), "very_dense");
    }
}
