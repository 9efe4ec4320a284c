//! Procedural member geometry.
//!
//! Every generator builds a base solid in member-local coordinates, then
//! hands it to the feature engine. A base solid that cannot be built is an
//! error; a feature that cannot be applied is only recorded in the member's
//! step history.

pub mod hss;
pub mod metadata;
pub mod plate;
pub mod tapered;
pub mod types;
pub mod wide_flange;

pub use hss::{generate_rect_hss, generate_round_hss};
pub use metadata::member_metadata;
pub use plate::generate_base_plate;
pub use tapered::{generate_tapered_prism, taper_top_size};
pub use types::*;
pub use wide_flange::generate_wide_flange;

use feature_engine::FeatureContext;
use modeling_ops::{Diagnostics, KernelBundle};
use solid_kernel::KernelSolidHandle;
use steel_types::{Feature, Profile, Shape};
use uuid::Uuid;

/// Build a member of `length` from any section profile.
pub fn generate_member(
    kb: &mut dyn KernelBundle,
    profile: &Profile,
    length: f64,
    features: &[Feature],
    diagnostics: &mut Diagnostics,
) -> Result<Member, GenerateError> {
    match profile.shape {
        Shape::WideFlange { .. } => {
            generate_wide_flange(kb, profile, length, features, diagnostics)
        }
        Shape::RectHss { .. } => generate_rect_hss(kb, profile, length, features, diagnostics),
        Shape::RoundHss { .. } => generate_round_hss(kb, profile, length, features, diagnostics),
    }
}

/// Run the feature list on a section's base solid and wrap the result.
pub(crate) fn finish_section(
    kb: &mut dyn KernelBundle,
    profile: &Profile,
    length: f64,
    solid: KernelSolidHandle,
    features: &[Feature],
    diagnostics: &mut Diagnostics,
) -> Member {
    let ctx = FeatureContext::member(profile, length);
    let run = feature_engine::apply_features(kb, &solid, features, &ctx, diagnostics);
    Member {
        id: Uuid::new_v4(),
        kind: MemberKind::Section {
            profile: profile.clone(),
        },
        length,
        features: features.to_vec(),
        solid: run.solid,
        steps: run.steps,
    }
}
