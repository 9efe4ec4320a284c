use modeling_ops::{Diagnostics, KernelBundle};
use solid_kernel::KernelSolidHandle;
use steel_types::{Feature, TopoKind};
use tracing::{debug, info, instrument};

use crate::apply::apply_feature;
use crate::types::{FeatureContext, FeatureRun, FeatureStep, StepOutcome};

/// Fold a feature list over a solid.
///
/// Features run in order, each on the solid left by the previous one. A
/// feature that fails leaves the solid unchanged and the fold continues, so
/// one bad request never discards the rest of the list.
#[instrument(skip_all, fields(features = features.len()))]
pub fn apply_features(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    features: &[Feature],
    ctx: &FeatureContext,
    diagnostics: &mut Diagnostics,
) -> FeatureRun {
    let mut current = solid.clone();
    let mut steps = Vec::with_capacity(features.len());

    for (index, feature) in features.iter().enumerate() {
        let feature_type = feature.type_name();
        let outcome = if !feature.enabled {
            debug!(index, feature_type, "feature disabled");
            StepOutcome::Disabled
        } else {
            match apply_feature(kb, &current, feature, ctx, diagnostics) {
                Ok(result) => {
                    diagnostics.extend(result.diagnostics);
                    current = result.handle;
                    StepOutcome::Applied {
                        created_faces: result.provenance.created_count(TopoKind::Face),
                    }
                }
                Err(e) if e.is_skip() => {
                    diagnostics.warn(feature_type, format!("skipped: {}", e));
                    StepOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
                Err(e) => {
                    diagnostics.warn(feature_type, format!("failed: {}", e));
                    StepOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            }
        };
        steps.push(FeatureStep {
            index,
            feature_type,
            outcome,
        });
    }

    let run = FeatureRun {
        solid: current,
        steps,
    };
    info!(applied = run.applied_count(), "features applied");
    run
}
