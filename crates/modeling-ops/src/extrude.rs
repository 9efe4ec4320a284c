use solid_kernel::PlanarProfile;
use tracing::instrument;

use crate::diff::{self, TopoSnapshot};
use crate::kernel_ext::KernelBundle;
use crate::types::{Diagnostics, OpError, OpResult, Provenance};

/// Sweep a planar profile along `direction` by `depth`.
///
/// Every entity of the new solid is reported as created.
#[instrument(level = "debug", skip(kb, profile), fields(points = profile.vertex_count()))]
pub fn execute_extrude(
    kb: &mut dyn KernelBundle,
    profile: &PlanarProfile,
    direction: [f64; 3],
    depth: f64,
) -> Result<OpResult, OpError> {
    if depth.is_nan() || depth <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: format!("extrude depth must be positive, got {}", depth),
        });
    }
    let handle = kb.extrude_profile(profile, direction, depth)?;
    Ok(fresh_solid(kb, handle))
}

/// Ruled solid between two outer loops.
#[instrument(level = "debug", skip(kb, bottom, top))]
pub fn execute_loft(
    kb: &mut dyn KernelBundle,
    bottom: &PlanarProfile,
    top: &PlanarProfile,
) -> Result<OpResult, OpError> {
    if bottom.outer.len() != top.outer.len() {
        return Err(OpError::InvalidParameter {
            reason: format!(
                "loft loops must match: {} vs {} points",
                bottom.outer.len(),
                top.outer.len()
            ),
        });
    }
    let handle = kb.loft_profiles(bottom, top)?;
    Ok(fresh_solid(kb, handle))
}

fn fresh_solid(kb: &dyn KernelBundle, handle: solid_kernel::KernelSolidHandle) -> OpResult {
    let after = diff::snapshot(kb.as_introspect(), &handle);
    let diff_result = diff::diff(&TopoSnapshot::empty(), &after);
    OpResult {
        handle,
        provenance: Provenance {
            created: diff_result.created,
            deleted: diff_result.deleted,
        },
        diagnostics: Diagnostics::default(),
    }
}
