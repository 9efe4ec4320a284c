pub mod mock_kernel;
pub mod traits;
#[cfg(feature = "truck")]
pub mod truck_introspect;
#[cfg(feature = "truck")]
pub mod truck_kernel;
pub mod types;

pub use mock_kernel::{MockKernel, MockOp};
pub use traits::*;
#[cfg(feature = "truck")]
pub use truck_kernel::TruckKernel;
pub use types::*;
