//! Validation and configuration errors for the scoring engines.
//!
//! Numeric degeneracy (near-zero denominators) is never an error; the engines
//! absorb it with epsilon guards. Everything here is a caller-side problem:
//! a field that is non-finite, out of range, or a policy table that cannot be
//! read.

use thiserror::Error;

use crate::policy::LandType;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("unknown land type {0:?}")]
    UnknownLandType(String),

    /// The policy table has neither the requested row nor the fallback row.
    #[error("policy has no profile for land type {requested} (fallback {fallback} missing too)")]
    MissingLandProfile {
        requested: LandType,
        fallback: LandType,
    },

    #[error("failed to read policy file: {0}")]
    PolicyIo(#[from] std::io::Error),

    #[error("failed to parse policy: {0}")]
    PolicyParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ScoringError>;

// ── Field checks ──────────────────────────────────────────────────────────────

pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoringError::NonFinite { field, value })
    }
}

pub(crate) fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    let value = finite(field, value)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ScoringError::OutOfRange { field, value, min, max })
    }
}

/// Percent-scale inputs: [0, 100].
pub(crate) fn percent(field: &'static str, value: f64) -> Result<f64> {
    in_range(field, value, 0.0, 100.0)
}

/// NDVI-scale inputs: [-1, 1].
pub(crate) fn index(field: &'static str, value: f64) -> Result<f64> {
    in_range(field, value, -1.0, 1.0)
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<f64> {
    let value = finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ScoringError::NonPositive { field, value })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64> {
    let value = finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ScoringError::Negative { field, value })
    }
}
