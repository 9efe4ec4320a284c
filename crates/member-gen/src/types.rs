use feature_engine::FeatureStep;
use serde::Serialize;
use solid_kernel::KernelSolidHandle;
use steel_types::{Feature, Profile};
use uuid::Uuid;

/// What a member was generated from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "generator", rename_all = "snake_case")]
pub enum MemberKind {
    /// A rolled or tube section extruded to length.
    Section { profile: Profile },
    /// Square frustum standing on the XZ plane.
    TaperedPrism {
        base: f64,
        top: f64,
        height: f64,
        angle_deg: f64,
    },
    /// Flat plate lying in local XY, `thickness` along +Z.
    BasePlate { width: f64, thickness: f64 },
}

/// One physical piece: its recipe, its solid and what the features did.
///
/// Built once per distinct geometry and shared across placements.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: Uuid,
    pub kind: MemberKind,
    /// Extent along local +Z for sections, along X for plates, along Y
    /// for tapered prisms.
    pub length: f64,
    pub features: Vec<Feature>,
    /// Solid after every applied feature.
    pub solid: KernelSolidHandle,
    pub steps: Vec<FeatureStep>,
}

impl Member {
    pub fn profile(&self) -> Option<&Profile> {
        match &self.kind {
            MemberKind::Section { profile } => Some(profile),
            _ => None,
        }
    }

    /// Catalog designation, or a synthesized one for plates and prisms.
    pub fn designation(&self) -> String {
        match &self.kind {
            MemberKind::Section { profile } => profile.designation.clone(),
            MemberKind::TaperedPrism { base, height, .. } => format!("TAPER{}x{}", base, height),
            MemberKind::BasePlate { width, thickness } => {
                format!("PL{}x{}x{}", self.length, width, thickness)
            }
        }
    }

    /// Tag describing which generator built the member.
    pub fn generator_type(&self) -> &'static str {
        match &self.kind {
            MemberKind::Section { profile } => match profile.member_type() {
                "W" => "wide_flange",
                "HSS_RECT" => "rect_hss",
                _ => "round_hss",
            },
            MemberKind::TaperedPrism { .. } => "tapered_prism",
            MemberKind::BasePlate { .. } => "base_plate",
        }
    }

    pub fn member_type(&self) -> &'static str {
        match &self.kind {
            MemberKind::Section { profile } => profile.member_type(),
            MemberKind::TaperedPrism { .. } => "TAPERED",
            MemberKind::BasePlate { .. } => "PLATE",
        }
    }

    /// Weight in pounds, when the profile carries a unit weight.
    pub fn weight_lbs(&self) -> Option<f64> {
        self.profile().and_then(|p| p.weight_for_length(self.length))
    }
}

/// Errors that prevent a member from being generated at all.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerateError {
    #[error("{name} must be positive, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("expected a {expected} profile, got {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("operation error: {0}")]
    Op(#[from] modeling_ops::OpError),

    #[error("kernel error: {0}")]
    Kernel(#[from] solid_kernel::KernelError),
}

pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), GenerateError> {
    if value.is_nan() || value <= 0.0 {
        return Err(GenerateError::InvalidDimension { name, value });
    }
    Ok(())
}
