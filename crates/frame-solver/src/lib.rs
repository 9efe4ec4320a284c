//! Frame assembly and engineering checks.
//!
//! [`solve`] measures the column footprint, derives the header and
//! connecting-beam spans, builds each distinct member once and places it
//! in every frame of the run. The header of the first frame is checked in
//! bending against [`DesignCriteria`].

pub mod catalog;
pub mod error;
pub mod inputs;
pub mod output;
pub mod section;
pub mod simple_frame;
pub mod solver;
pub mod store;
pub mod validation;

pub use catalog::{BuiltinCatalog, CatalogError, JsonCatalog, ProfileCatalog};
pub use error::SolveError;
pub use inputs::{BasePlateSize, FrameInputs, MemberFeatures};
pub use output::{AnchorSet, AnchorSpace, FrameAssemblyResult, FrameMetadata};
pub use section::{check_wall, profile_wall_check, section_properties, SectionProperties, WallCheck};
pub use simple_frame::{create_simple_frame, SimpleFrameInputs, SimpleFrameMetadata, SimpleFrameResult};
pub use solver::{conn_beam_length, measure_column, solve, ColumnFootprint};
pub use store::{publish, AssetStore, MemoryStore, StoreError, StoredAsset};
pub use validation::{validate_header, DesignCriteria, ValidationResult, ValidationStatus};
