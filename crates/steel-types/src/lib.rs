//! Shared value types for structural member generation: geometry helpers,
//! placements, section profiles, feature requests and topology signatures.

pub mod feature;
pub mod geom;
pub mod placement;
pub mod profile;
pub mod sketch;
pub mod topo;

pub use feature::*;
pub use geom::{Axis, BoundingBox, Vec3};
pub use placement::{Placement, Rotation};
pub use profile::{Profile, Shape, DEFAULT_FILLET_RADIUS};
pub use sketch::PlanarProfile;
pub use topo::*;
