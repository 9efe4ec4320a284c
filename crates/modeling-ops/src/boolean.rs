use solid_kernel::KernelSolidHandle;
use tracing::instrument;

use crate::diff;
use crate::kernel_ext::KernelBundle;
use crate::types::{Diagnostics, OpError, OpResult, Provenance};

/// Boolean operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanKind {
    Union,
    Subtract,
}

/// Execute a boolean operation between two solids.
#[instrument(level = "debug", skip(kb, body_a, body_b))]
pub fn execute_boolean(
    kb: &mut dyn KernelBundle,
    body_a: &KernelSolidHandle,
    body_b: &KernelSolidHandle,
    kind: BooleanKind,
) -> Result<OpResult, OpError> {
    // The tool body is consumed; only the target's topology counts as "before".
    let before = diff::snapshot(kb.as_introspect(), body_a);

    let handle = match kind {
        BooleanKind::Union => kb.boolean_union(body_a, body_b)?,
        BooleanKind::Subtract => kb.boolean_subtract(body_a, body_b)?,
    };

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

/// Fuse several tool bodies into one, left to right.
pub fn union_all(
    kb: &mut dyn KernelBundle,
    bodies: &[KernelSolidHandle],
) -> Result<KernelSolidHandle, OpError> {
    let (first, rest) = bodies.split_first().ok_or(OpError::InvalidParameter {
        reason: "no bodies to fuse".to_string(),
    })?;
    let mut acc = first.clone();
    for body in rest {
        acc = kb.boolean_union(&acc, body)?;
    }
    Ok(acc)
}
