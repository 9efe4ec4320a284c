use solid_kernel::{KernelId, KernelSolidHandle};
use tracing::instrument;

use crate::diff;
use crate::kernel_ext::KernelBundle;
use crate::types::{Diagnostics, OpError, OpResult, Provenance};

/// Execute a fillet operation on specified edges of a solid.
#[instrument(level = "debug", skip(kb, solid, edges), fields(edges = edges.len()))]
pub fn execute_fillet(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    edges: &[KernelId],
    radius: f64,
) -> Result<OpResult, OpError> {
    if radius.is_nan() || radius <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: "fillet radius must be positive".to_string(),
        });
    }
    if edges.is_empty() {
        return Err(OpError::InvalidParameter {
            reason: "no edges to fillet".to_string(),
        });
    }

    let before = diff::snapshot(kb.as_introspect(), solid);
    let handle = kb.fillet_edges(solid, edges, radius)?;
    let after = diff::snapshot(kb.as_introspect(), &handle);
    let diff_result = diff::diff(&before, &after);

    Ok(OpResult {
        handle,
        provenance: Provenance {
            created: diff_result.created,
            deleted: diff_result.deleted,
        },
        diagnostics: Diagnostics::default(),
    })
}
