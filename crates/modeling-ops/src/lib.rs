pub mod boolean;
pub mod diff;
pub mod extrude;
pub mod fillet;
pub mod kernel_ext;
pub mod transform;
pub mod types;

pub use boolean::{execute_boolean, union_all, BooleanKind};
pub use diff::{signature_similarity, snapshot, DiffResult, TopoSnapshot};
pub use extrude::{execute_extrude, execute_loft};
pub use fillet::execute_fillet;
pub use kernel_ext::{solid_bounds, KernelBundle};
pub use transform::execute_transform;
pub use types::*;
