use solid_kernel::{BoundingBox, Kernel, KernelIntrospect, KernelSolidHandle};

use crate::types::OpError;

/// Combined trait for operations that need both mutable Kernel access
/// and read-only KernelIntrospect access on the same object.
///
/// This avoids the borrow-checker issue of needing &mut and & on the same value.
pub trait KernelBundle: Kernel + KernelIntrospect {
    fn as_introspect(&self) -> &dyn KernelIntrospect;
}

// Blanket implementation for any type that implements both traits
impl<T: Kernel + KernelIntrospect> KernelBundle for T {
    fn as_introspect(&self) -> &dyn KernelIntrospect {
        self
    }
}

/// Bounding box of a solid; a solid without vertices is an error.
pub fn solid_bounds(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
) -> Result<BoundingBox, OpError> {
    introspect.bounding_box(solid).ok_or(OpError::EmptySolid)
}
