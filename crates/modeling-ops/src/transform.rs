use solid_kernel::{KernelSolidHandle, Placement};
use tracing::instrument;

use crate::kernel_ext::KernelBundle;
use crate::types::OpError;

/// Copy of `solid` moved by `placement`. The source handle stays valid.
#[instrument(level = "debug", skip(kb, solid))]
pub fn execute_transform(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    placement: &Placement,
) -> Result<KernelSolidHandle, OpError> {
    Ok(kb.transform_solid(solid, placement)?)
}
