use serde::{Deserialize, Serialize};
use solid_kernel::KernelSolidHandle;
use steel_types::{Axis, EdgeGroup, FaceName, Profile};

use crate::classify::ClassifyConfig;

/// Orientation and nominal size of the body being classified.
///
/// Members extrude along local +Z, so their "up" is Z and their nominal
/// height is the member length. Free-standing bodies such as the tapered
/// prism stand on Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifyFrame {
    pub up: Axis,
    /// Nominal footprint size, the reference for lateral tolerances.
    pub base: f64,
    /// Nominal extent along `up`.
    pub height: f64,
}

impl ClassifyFrame {
    /// Frame for a member of `length` extruded along local +Z.
    pub fn member(profile: &Profile, length: f64) -> Self {
        Self {
            up: Axis::Z,
            base: profile.width().max(profile.depth()),
            height: length,
        }
    }

    /// Frame for a body standing on the XZ plane.
    pub fn upright(base: f64, height: f64) -> Self {
        Self {
            up: Axis::Y,
            base,
            height,
        }
    }
}

/// Everything a feature needs to know about the body it modifies.
#[derive(Debug, Clone)]
pub struct FeatureContext {
    pub frame: ClassifyFrame,
    /// Cross-section of the member, when the body is a member.
    pub profile: Option<Profile>,
    pub config: ClassifyConfig,
}

impl FeatureContext {
    pub fn member(profile: &Profile, length: f64) -> Self {
        Self {
            frame: ClassifyFrame::member(profile, length),
            profile: Some(profile.clone()),
            config: ClassifyConfig::default(),
        }
    }

    pub fn upright(base: f64, height: f64) -> Self {
        Self {
            frame: ClassifyFrame::upright(base, height),
            profile: None,
            config: ClassifyConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ClassifyConfig) -> Self {
        self.config = config;
        self
    }

    /// Member length (extent along the up axis).
    pub fn length(&self) -> f64 {
        self.frame.height
    }
}

/// What happened to one feature of the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The solid was replaced by the feature's result.
    Applied { created_faces: usize },
    /// Nothing to act on; the solid is unchanged.
    Skipped { reason: String },
    /// `enabled: false`; never attempted.
    Disabled,
    /// The kernel or the parameters rejected the feature; the solid is unchanged.
    Failed { error: String },
}

impl StepOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, StepOutcome::Applied { .. })
    }
}

/// History entry for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStep {
    pub index: usize,
    pub feature_type: &'static str,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Result of folding a feature list over a solid.
#[derive(Debug, Clone)]
pub struct FeatureRun {
    /// Solid left by the last applied feature.
    pub solid: KernelSolidHandle,
    pub steps: Vec<FeatureStep>,
}

impl FeatureRun {
    pub fn applied_count(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_applied()).count()
    }
}

/// Errors from applying a single feature.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FeatureError {
    #[error("no {group:?} edges found")]
    NoMatchingEdges { group: EdgeGroup },

    #[error("no face matches {face:?}")]
    NoMatchingFace { face: FaceName },

    #[error("{feature} needs a member profile")]
    MissingProfile { feature: &'static str },

    #[error("{feature} is not supported on {shape}")]
    Unsupported { feature: &'static str, shape: String },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("operation error: {0}")]
    Op(#[from] modeling_ops::OpError),

    #[error("kernel error: {0}")]
    Kernel(#[from] solid_kernel::KernelError),
}

impl FeatureError {
    /// Errors that mean "nothing to do" rather than "could not do it".
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            FeatureError::NoMatchingEdges { .. } | FeatureError::NoMatchingFace { .. }
        )
    }
}
