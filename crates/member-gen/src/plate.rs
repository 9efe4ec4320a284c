use feature_engine::{ClassifyConfig, ClassifyFrame, FeatureContext};
use modeling_ops::{execute_extrude, Diagnostics, KernelBundle};
use steel_types::sketch::rect_loop;
use steel_types::{Axis, Feature, PlanarProfile};
use tracing::instrument;
use uuid::Uuid;

use crate::types::{require_positive, GenerateError, Member, MemberKind};

/// Flat plate: `length` along X, `width` along Y, centred on the origin,
/// extruded along +Z by `thickness`.
#[instrument(skip(kb, features, diagnostics))]
pub fn generate_base_plate(
    kb: &mut dyn KernelBundle,
    length: f64,
    width: f64,
    thickness: f64,
    features: &[Feature],
    diagnostics: &mut Diagnostics,
) -> Result<Member, GenerateError> {
    require_positive("plate length", length)?;
    require_positive("plate width", width)?;
    require_positive("plate thickness", thickness)?;

    let outline = PlanarProfile::xy(0.0, rect_loop(0.0, 0.0, length, width));
    let solid = execute_extrude(kb, &outline, [0.0, 0.0, 1.0], thickness)?.handle;

    let ctx = FeatureContext {
        frame: ClassifyFrame {
            up: Axis::Z,
            base: length.max(width),
            height: thickness,
        },
        profile: None,
        config: ClassifyConfig::default(),
    };
    let run = feature_engine::apply_features(kb, &solid, features, &ctx, diagnostics);

    Ok(Member {
        id: Uuid::new_v4(),
        kind: MemberKind::BasePlate { width, thickness },
        length,
        features: features.to_vec(),
        solid: run.solid,
        steps: run.steps,
    })
}
