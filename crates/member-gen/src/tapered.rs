use feature_engine::FeatureContext;
use modeling_ops::{execute_loft, Diagnostics, KernelBundle};
use steel_types::sketch::rect_loop;
use steel_types::{Feature, PlanarProfile};
use tracing::instrument;
use uuid::Uuid;

use crate::types::{require_positive, GenerateError, Member, MemberKind};

/// Smallest top side a tapered prism may have.
pub const MIN_TOP_SIZE: f64 = 0.001;

/// Side of the top square: the base grows by `tan(angle)` per unit height
/// on each side. Never below `MIN_TOP_SIZE`.
pub fn taper_top_size(base: f64, height: f64, angle_deg: f64) -> f64 {
    (base + 2.0 * height * angle_deg.to_radians().tan()).max(MIN_TOP_SIZE)
}

fn square_on_y(y: f64, side: f64) -> PlanarProfile {
    PlanarProfile::with_axes(
        [0.0, y, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 0.0, 0.0],
        rect_loop(0.0, 0.0, side, side),
    )
}

/// Square frustum standing on the XZ plane, base at y = 0 and top at
/// y = `height`. Negative angles narrow toward the top.
#[instrument(skip(kb, features, diagnostics))]
pub fn generate_tapered_prism(
    kb: &mut dyn KernelBundle,
    base: f64,
    height: f64,
    angle_deg: f64,
    features: &[Feature],
    diagnostics: &mut Diagnostics,
) -> Result<Member, GenerateError> {
    require_positive("base size", base)?;
    require_positive("height", height)?;

    let top = taper_top_size(base, height, angle_deg);
    if top <= MIN_TOP_SIZE {
        diagnostics.warn(
            "tapered_prism",
            format!("taper of {} deg crosses zero over {}, top clamped", angle_deg, height),
        );
    }

    let solid = execute_loft(kb, &square_on_y(0.0, base), &square_on_y(height, top))?.handle;
    let ctx = FeatureContext::upright(base, height);
    let run = feature_engine::apply_features(kb, &solid, features, &ctx, diagnostics);

    Ok(Member {
        id: Uuid::new_v4(),
        kind: MemberKind::TaperedPrism {
            base,
            top,
            height,
            angle_deg,
        },
        length: height,
        features: features.to_vec(),
        solid: run.solid,
        steps: run.steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_angle_is_a_prism() {
        assert_relative_eq!(taper_top_size(4.0, 10.0, 0.0), 4.0);
    }

    #[test]
    fn test_positive_angle_widens() {
        assert_relative_eq!(
            taper_top_size(4.0, 10.0, 45.0),
            24.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_steep_negative_angle_clamps() {
        assert_relative_eq!(taper_top_size(4.0, 10.0, -45.0), MIN_TOP_SIZE);
    }
}
