use modeling_ops::{execute_extrude, Diagnostics, KernelBundle};
use steel_types::sketch::{circle_loop, rounded_rect_loop};
use steel_types::{Feature, PlanarProfile, Profile, Shape};
use tracing::instrument;

use crate::types::{require_positive, GenerateError, Member};

/// Smallest inner corner radius kept on a rectangular tube.
const MIN_INNER_RADIUS: f64 = 0.01;

/// Outer and inner corner radii of a rectangular tube.
pub fn corner_radii(wall_thickness: f64, corner_radius: Option<f64>) -> (f64, f64) {
    let outer = corner_radius.unwrap_or(2.0 * wall_thickness);
    (outer, (outer - wall_thickness).max(MIN_INNER_RADIUS))
}

/// Rectangular or square tube with rounded corners, extruded along +Z.
#[instrument(skip(kb, profile, features, diagnostics), fields(designation = %profile.designation))]
pub fn generate_rect_hss(
    kb: &mut dyn KernelBundle,
    profile: &Profile,
    length: f64,
    features: &[Feature],
    diagnostics: &mut Diagnostics,
) -> Result<Member, GenerateError> {
    let Shape::RectHss {
        outer_width,
        outer_height,
        wall_thickness,
        corner_radius,
    } = profile.shape
    else {
        return Err(GenerateError::ShapeMismatch {
            expected: "HSS_RECT",
            found: profile.member_type(),
        });
    };
    require_positive("length", length)?;
    require_positive("outer width", outer_width)?;
    require_positive("outer height", outer_height)?;
    require_positive("wall thickness", wall_thickness)?;
    let (inner_w, inner_h) = (outer_width - 2.0 * wall_thickness, outer_height - 2.0 * wall_thickness);
    require_positive("inner width", inner_w)?;
    require_positive("inner height", inner_h)?;

    let (r_out, r_in) = corner_radii(wall_thickness, corner_radius);
    let section = PlanarProfile::xy(0.0, rounded_rect_loop(outer_width, outer_height, r_out))
        .with_hole(rounded_rect_loop(inner_w, inner_h, r_in));
    let base = execute_extrude(kb, &section, [0.0, 0.0, 1.0], length)?;

    Ok(crate::finish_section(
        kb,
        profile,
        length,
        base.handle,
        features,
        diagnostics,
    ))
}

/// Round tube (pipe), extruded along +Z.
#[instrument(skip(kb, profile, features, diagnostics), fields(designation = %profile.designation))]
pub fn generate_round_hss(
    kb: &mut dyn KernelBundle,
    profile: &Profile,
    length: f64,
    features: &[Feature],
    diagnostics: &mut Diagnostics,
) -> Result<Member, GenerateError> {
    let Shape::RoundHss {
        outer_diameter,
        wall_thickness,
    } = profile.shape
    else {
        return Err(GenerateError::ShapeMismatch {
            expected: "HSS_ROUND",
            found: profile.member_type(),
        });
    };
    require_positive("length", length)?;
    require_positive("outer diameter", outer_diameter)?;
    require_positive("wall thickness", wall_thickness)?;
    let inner = outer_diameter / 2.0 - wall_thickness;
    require_positive("inner radius", inner)?;

    let section = PlanarProfile::xy(0.0, circle_loop(0.0, 0.0, outer_diameter / 2.0))
        .with_hole(circle_loop(0.0, 0.0, inner));
    let base = execute_extrude(kb, &section, [0.0, 0.0, 1.0], length)?;

    Ok(crate::finish_section(
        kb,
        profile,
        length,
        base.handle,
        features,
        diagnostics,
    ))
}
