//! Semantic features for member solids.
//!
//! Features name their targets by meaning ("the top face", "the vertical
//! edges") instead of by kernel id. `classify` maps those names onto the
//! current topology, `apply` and `cuts` build each feature, and `pipeline`
//! folds a feature list over a solid while recording what happened.

pub mod apply;
pub mod classify;
pub mod cuts;
pub mod pipeline;
pub mod types;

pub use apply::apply_feature;
pub use classify::{canonical_direction, classify_edges, classify_face, ClassifyConfig, FaceMatch};
pub use cuts::{bolt_positions, CUT_EPS};
pub use pipeline::apply_features;
pub use types::*;
