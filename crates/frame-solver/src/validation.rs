//! Single-span bending check of the header under a centre point load.

use serde::{Deserialize, Serialize};

use crate::section::SectionProperties;

/// Reported in place of a deflection or stress that cannot be computed.
pub const SENTINEL: f64 = 999.0;

/// Material constants and allowable limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignCriteria {
    /// Young's modulus (ksi).
    pub elastic_modulus: f64,
    /// Yield strength (ksi).
    pub yield_strength: f64,
    /// Deflection limit is `span / deflection_ratio`.
    pub deflection_ratio: f64,
    /// Allowable bending stress is `stress_factor * yield_strength`.
    pub stress_factor: f64,
}

impl Default for DesignCriteria {
    fn default() -> Self {
        Self {
            elastic_modulus: 29000.0,
            yield_strength: 50.0,
            deflection_ratio: 360.0,
            stress_factor: 0.66,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub point_load_lbs: f64,
    /// Midspan deflection (in).
    pub deflection: f64,
    pub limit_deflection: f64,
    /// Extreme-fibre bending stress (ksi).
    pub stress: f64,
    pub limit_stress: f64,
    pub status: ValidationStatus,
}

impl ValidationResult {
    pub fn passed(&self) -> bool {
        self.status == ValidationStatus::Pass
    }
}

/// Simply supported span with a point load at midspan:
/// `δ = P·L³ / (48·E·I)`, `M = P·L / 4`, `fb = M / Sx`.
pub fn validate_header(
    section: &SectionProperties,
    span: f64,
    point_load_lbs: f64,
    criteria: &DesignCriteria,
) -> ValidationResult {
    let p = point_load_lbs / 1000.0;

    let deflection = if section.ix > 0.0 {
        p * span.powi(3) / (48.0 * criteria.elastic_modulus * section.ix)
    } else {
        SENTINEL
    };

    let moment = p * span / 4.0;
    let stress = if section.sx > 0.0 {
        moment / section.sx
    } else {
        SENTINEL
    };

    let limit_deflection = span / criteria.deflection_ratio;
    let limit_stress = criteria.stress_factor * criteria.yield_strength;

    let status = if deflection > limit_deflection || stress > limit_stress {
        ValidationStatus::Fail
    } else {
        ValidationStatus::Pass
    };

    ValidationResult {
        point_load_lbs,
        deflection,
        limit_deflection,
        stress,
        limit_stress,
        status,
    }
}
