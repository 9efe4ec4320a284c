//! Fabrication features on member solids: bolt holes, end plates, copes and
//! slots. Member solids run along local +Z from 0 to the member length with
//! the cross-section centred on the Z axis.

use modeling_ops::{execute_boolean, union_all, BooleanKind, Diagnostics, KernelBundle, OpResult};
use solid_kernel::KernelSolidHandle;
use steel_types::geom::{add, scale};
use steel_types::sketch::{circle_loop, rect_loop};
use steel_types::{
    Axis, FaceName, Flange, HoleLocation, HolePosition, MemberEnd, PlanarProfile, Profile, Shape, Vec3,
};

use crate::types::{FeatureContext, FeatureError};

/// Overlap added to cutting tools so they never share a face with the member.
pub const CUT_EPS: f64 = 0.01;
/// Bolt hole clearance over the nominal bolt diameter.
pub const HOLE_CLEARANCE: f64 = 0.0625;
/// Edge distance from a member end to the first bolt.
pub const BOLT_EDGE_DISTANCE: f64 = 2.0;
/// Axial length of a through-plate slot.
pub const PLATE_SLOT_LENGTH: f64 = 3.0;

fn member_profile<'a>(
    ctx: &'a FeatureContext,
    feature: &'static str,
) -> Result<&'a Profile, FeatureError> {
    ctx.profile
        .as_ref()
        .ok_or(FeatureError::MissingProfile { feature })
}

fn unsupported(feature: &'static str, profile: &Profile) -> FeatureError {
    FeatureError::Unsupported {
        feature,
        shape: profile.member_type().to_string(),
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), FeatureError> {
    if value.is_nan() || value <= 0.0 {
        return Err(FeatureError::InvalidParameter {
            reason: format!("{} must be positive, got {}", name, value),
        });
    }
    Ok(())
}

/// Axis-aligned box tool.
fn tool_box(
    kb: &mut dyn KernelBundle,
    min: Vec3,
    max: Vec3,
) -> Result<KernelSolidHandle, FeatureError> {
    let profile = PlanarProfile::xy(
        min[2],
        rect_loop(
            (min[0] + max[0]) / 2.0,
            (min[1] + max[1]) / 2.0,
            max[0] - min[0],
            max[1] - min[1],
        ),
    );
    Ok(kb.extrude_profile(&profile, [0.0, 0.0, 1.0], max[2] - min[2])?)
}

/// Cylinder tool starting at `origin` and running `length` along `direction`.
fn tool_cylinder(
    kb: &mut dyn KernelBundle,
    origin: Vec3,
    direction: Vec3,
    radius: f64,
    length: f64,
) -> Result<KernelSolidHandle, FeatureError> {
    let profile = PlanarProfile::on_plane(origin, direction, circle_loop(0.0, 0.0, radius));
    Ok(kb.extrude_profile(&profile, direction, length)?)
}

fn subtract_tools(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    tools: &[KernelSolidHandle],
) -> Result<OpResult, FeatureError> {
    let tool = union_all(kb, tools)?;
    Ok(execute_boolean(kb, solid, &tool, BooleanKind::Subtract)?)
}

// ── Bolt holes ──────────────────────────────────────────────────────────────

/// Axial positions of a bolt line.
pub fn bolt_positions(length: f64, count: u32, spacing: f64, position: HolePosition) -> Vec<f64> {
    let run = f64::from(count.saturating_sub(1)) * spacing;
    let first = match position {
        HolePosition::Start => BOLT_EDGE_DISTANCE,
        HolePosition::End => length - BOLT_EDGE_DISTANCE - run,
        HolePosition::Center => (length - run) / 2.0,
        HolePosition::At(z) => z,
    };
    (0..count).map(|k| first + f64::from(k) * spacing).collect()
}

/// Angle, in degrees from +X, of a named hole location on a round section.
fn radial_angle(location: HoleLocation) -> Option<f64> {
    match location {
        HoleLocation::Radial { angle_deg } => Some(angle_deg),
        HoleLocation::Web | HoleLocation::Front => Some(90.0),
        HoleLocation::Back => Some(270.0),
        HoleLocation::Right => Some(0.0),
        HoleLocation::Left => Some(180.0),
        HoleLocation::TopFlange | HoleLocation::BottomFlange => None,
    }
}

/// Outward normal and face offset of a named wall of a rectangular tube.
fn rect_wall(location: HoleLocation, width: f64, height: f64) -> Option<(Vec3, f64)> {
    match location {
        HoleLocation::Web | HoleLocation::Front => Some(([0.0, 1.0, 0.0], height / 2.0)),
        HoleLocation::Back => Some(([0.0, -1.0, 0.0], height / 2.0)),
        HoleLocation::Right => Some(([1.0, 0.0, 0.0], width / 2.0)),
        HoleLocation::Left => Some(([-1.0, 0.0, 0.0], width / 2.0)),
        _ => None,
    }
}

/// One cutting cylinder per bolt. Tube walls are cut both ways from the
/// face plane; I-shape webs and flanges are cut straight through.
fn hole_tools(
    kb: &mut dyn KernelBundle,
    profile: &Profile,
    location: HoleLocation,
    radius: f64,
    zs: &[f64],
) -> Result<Vec<KernelSolidHandle>, FeatureError> {
    let mut tools = Vec::new();
    match profile.shape {
        Shape::RectHss {
            outer_width,
            outer_height,
            wall_thickness: t,
            ..
        } => {
            let (n, offset) = rect_wall(location, outer_width, outer_height)
                .ok_or_else(|| unsupported("bolt_holes", profile))?;
            for &z in zs {
                let face = add(scale(n, offset), [0.0, 0.0, z]);
                let origin = add(face, scale(n, 3.0 * t));
                tools.push(tool_cylinder(kb, origin, scale(n, -1.0), radius, 6.0 * t)?);
            }
        }
        Shape::RoundHss {
            outer_diameter,
            wall_thickness: t,
        } => {
            let angle = radial_angle(location)
                .ok_or_else(|| unsupported("bolt_holes", profile))?
                .to_radians();
            let n = [angle.cos(), angle.sin(), 0.0];
            for &z in zs {
                let origin = add(scale(n, outer_diameter / 2.0 + 3.0 * t), [0.0, 0.0, z]);
                tools.push(tool_cylinder(kb, origin, scale(n, -1.0), radius, 6.0 * t)?);
            }
        }
        Shape::WideFlange {
            depth,
            flange_width,
            flange_thickness,
            web_thickness,
            ..
        } => match location {
            HoleLocation::Web => {
                for &z in zs {
                    let origin = [web_thickness / 2.0 + CUT_EPS, 0.0, z];
                    tools.push(tool_cylinder(
                        kb,
                        origin,
                        [-1.0, 0.0, 0.0],
                        radius,
                        web_thickness + 2.0 * CUT_EPS,
                    )?);
                }
            }
            HoleLocation::TopFlange | HoleLocation::BottomFlange => {
                let (y, dir) = if location == HoleLocation::TopFlange {
                    (depth / 2.0 + CUT_EPS, [0.0, -1.0, 0.0])
                } else {
                    (-depth / 2.0 - CUT_EPS, [0.0, 1.0, 0.0])
                };
                // Gage lines midway between the web face and the flange tip.
                let gage = (flange_width + web_thickness) / 4.0;
                for &z in zs {
                    for x in [-gage, gage] {
                        tools.push(tool_cylinder(
                            kb,
                            [x, y, z],
                            dir,
                            radius,
                            flange_thickness + 2.0 * CUT_EPS,
                        )?);
                    }
                }
            }
            _ => return Err(unsupported("bolt_holes", profile)),
        },
    }
    Ok(tools)
}

#[allow(clippy::too_many_arguments)]
pub fn apply_bolt_holes(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    ctx: &FeatureContext,
    location: HoleLocation,
    diameter: f64,
    count: u32,
    spacing: f64,
    position: HolePosition,
    diagnostics: &mut Diagnostics,
) -> Result<OpResult, FeatureError> {
    let profile = member_profile(ctx, "bolt_holes")?;
    require_positive("bolt diameter", diameter)?;
    if count == 0 {
        return Err(FeatureError::InvalidParameter {
            reason: "bolt count must be at least 1".to_string(),
        });
    }
    if count > 1 {
        require_positive("bolt spacing", spacing)?;
    }

    let length = ctx.length();
    let zs = bolt_positions(length, count, spacing, position);
    for z in zs.iter().filter(|z| **z < 0.0 || **z > length) {
        diagnostics.warn(
            "bolt_holes",
            format!("hole at z = {:.3} lies outside the member (length {:.3})", z, length),
        );
    }

    let radius = (diameter + HOLE_CLEARANCE) / 2.0;
    let tools = hole_tools(kb, profile, location, radius, &zs)?;
    subtract_tools(kb, solid, &tools)
}

// ── End plate ───────────────────────────────────────────────────────────────

pub fn apply_end_plate(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    ctx: &FeatureContext,
    end: MemberEnd,
    thickness: f64,
    height: Option<f64>,
    width: Option<f64>,
) -> Result<OpResult, FeatureError> {
    let profile = member_profile(ctx, "end_plate")?;
    let width = width.unwrap_or_else(|| profile.width());
    let height = height.unwrap_or_else(|| profile.depth() + 2.0);
    require_positive("plate thickness", thickness)?;
    require_positive("plate width", width)?;
    require_positive("plate height", height)?;

    let (z0, z1) = match end {
        MemberEnd::Start => (-thickness, 0.0),
        MemberEnd::End => (ctx.length(), ctx.length() + thickness),
    };
    let plate = tool_box(
        kb,
        [-width / 2.0, -height / 2.0, z0],
        [width / 2.0, height / 2.0, z1],
    )?;
    Ok(execute_boolean(kb, solid, &plate, BooleanKind::Union)?)
}

// ── Cope ────────────────────────────────────────────────────────────────────

pub fn apply_cope(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    ctx: &FeatureContext,
    end: MemberEnd,
    flange: Flange,
    depth: f64,
    height: f64,
) -> Result<OpResult, FeatureError> {
    let profile = member_profile(ctx, "cope")?;
    let (d, bf) = match profile.shape {
        Shape::WideFlange {
            depth, flange_width, ..
        } => (depth, flange_width),
        _ => return Err(unsupported("cope", profile)),
    };
    require_positive("cope depth", depth)?;
    if height.is_nan() || height <= 0.0 || height >= d {
        return Err(FeatureError::InvalidParameter {
            reason: format!("cope height {} must lie between 0 and the depth {}", height, d),
        });
    }

    let (y0, y1) = match flange {
        Flange::Top => (d / 2.0 - height, d / 2.0 + CUT_EPS),
        Flange::Bottom => (-d / 2.0 - CUT_EPS, -d / 2.0 + height),
    };
    let length = ctx.length();
    let (z0, z1) = match end {
        MemberEnd::Start => (-CUT_EPS, depth),
        MemberEnd::End => (length - depth, length + CUT_EPS),
    };
    let half = bf / 2.0 + CUT_EPS;
    let tool = tool_box(kb, [-half, y0, z0], [half, y1, z1])?;
    subtract_tools(kb, solid, &[tool])
}

// ── Slots ───────────────────────────────────────────────────────────────────

/// Wall-normal axis, outward sign, face offset and wall thickness of a side face.
fn slot_wall(profile: &Profile, face: FaceName) -> Option<(Axis, f64, f64, f64)> {
    let (axis, sign) = match face {
        FaceName::Front => (Axis::Y, 1.0),
        FaceName::Back => (Axis::Y, -1.0),
        FaceName::Right => (Axis::X, 1.0),
        FaceName::Left => (Axis::X, -1.0),
        FaceName::Top | FaceName::Base => return None,
    };
    match profile.shape {
        Shape::RectHss {
            outer_width,
            outer_height,
            wall_thickness,
            ..
        } => {
            let offset = if axis == Axis::Y {
                outer_height / 2.0
            } else {
                outer_width / 2.0
            };
            Some((axis, sign, offset, wall_thickness))
        }
        Shape::RoundHss {
            outer_diameter,
            wall_thickness,
        } => Some((axis, sign, outer_diameter / 2.0, wall_thickness)),
        Shape::WideFlange {
            depth,
            flange_thickness,
            ..
        } => (axis == Axis::Y).then_some((axis, sign, depth / 2.0, flange_thickness)),
    }
}

/// Box spanning `[face - reach, face + reach]` across a side wall.
fn wall_box(
    axis: Axis,
    sign: f64,
    offset: f64,
    reach: f64,
    half_span: f64,
    z0: f64,
    z1: f64,
) -> (Vec3, Vec3) {
    let (n0, n1) = if sign > 0.0 {
        (offset - reach, offset + reach)
    } else {
        (-offset - reach, -offset + reach)
    };
    match axis {
        Axis::Y => ([-half_span, n0, z0], [half_span, n1, z1]),
        _ => ([n0, -half_span, z0], [n1, half_span, z1]),
    }
}

pub fn apply_slot(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    ctx: &FeatureContext,
    face: FaceName,
    width: f64,
    length: f64,
    z_position: Option<f64>,
) -> Result<OpResult, FeatureError> {
    let profile = member_profile(ctx, "slot")?;
    require_positive("slot width", width)?;
    require_positive("slot length", length)?;
    let (axis, sign, offset, t) =
        slot_wall(profile, face).ok_or_else(|| unsupported("slot", profile))?;

    let zc = z_position.unwrap_or(ctx.length() / 2.0);
    let (min, max) = wall_box(
        axis,
        sign,
        offset,
        2.0 * t,
        width / 2.0,
        zc - length / 2.0,
        zc + length / 2.0,
    );
    let tool = tool_box(kb, min, max)?;
    subtract_tools(kb, solid, &[tool])
}

/// Slot through both long walls of a tube so a gusset plate can pass.
pub fn apply_through_plate_slot(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    ctx: &FeatureContext,
    position: MemberEnd,
    slot_height: Option<f64>,
    plate_thickness: f64,
    diagnostics: &mut Diagnostics,
) -> Result<OpResult, FeatureError> {
    let profile = member_profile(ctx, "through_plate_slot")?;
    let t = match profile.shape {
        Shape::RectHss { wall_thickness, .. } | Shape::RoundHss { wall_thickness, .. } => {
            wall_thickness
        }
        Shape::WideFlange { .. } => return Err(unsupported("through_plate_slot", profile)),
    };
    require_positive("plate thickness", plate_thickness)?;

    let h = profile.depth();
    let slot_height = slot_height.unwrap_or(0.7 * h);
    require_positive("slot height", slot_height)?;
    if slot_height > h {
        diagnostics.warn(
            "through_plate_slot",
            format!("slot height {:.3} exceeds section depth {:.3}", slot_height, h),
        );
    }

    let length = ctx.length();
    let (z0, z1) = match position {
        MemberEnd::Start => (-0.1, PLATE_SLOT_LENGTH),
        MemberEnd::End => (length - PLATE_SLOT_LENGTH, length + 0.1),
    };
    let half_width = (plate_thickness + HOLE_CLEARANCE) / 2.0;

    let mut tools = Vec::new();
    for sign in [1.0, -1.0] {
        let (min, max) = wall_box(Axis::Y, sign, h / 2.0, t, half_width, z0, z1);
        tools.push(tool_box(kb, min, max)?);
    }
    subtract_tools(kb, solid, &tools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bolt_positions_start() {
        let zs = bolt_positions(120.0, 3, 3.0, HolePosition::Start);
        assert_eq!(zs, vec![2.0, 5.0, 8.0]);
    }

    #[test]
    fn test_bolt_positions_end() {
        let zs = bolt_positions(120.0, 2, 3.0, HolePosition::End);
        assert_relative_eq!(zs[0], 115.0);
        assert_relative_eq!(zs[1], 118.0);
    }

    #[test]
    fn test_bolt_positions_center_is_symmetric() {
        let zs = bolt_positions(100.0, 4, 3.0, HolePosition::Center);
        assert_relative_eq!(zs[0] + zs[3], 100.0);
    }

    #[test]
    fn test_bolt_positions_explicit() {
        let zs = bolt_positions(50.0, 1, 3.0, HolePosition::At(12.5));
        assert_eq!(zs, vec![12.5]);
    }

    #[test]
    fn test_radial_angles() {
        assert_eq!(radial_angle(HoleLocation::Web), Some(90.0));
        assert_eq!(radial_angle(HoleLocation::Back), Some(270.0));
        assert_eq!(
            radial_angle(HoleLocation::Radial { angle_deg: 45.0 }),
            Some(45.0)
        );
        assert_eq!(radial_angle(HoleLocation::TopFlange), None);
    }

    #[test]
    fn test_wall_box_back_face() {
        let (min, max) = wall_box(Axis::Y, -1.0, 3.0, 0.5, 1.0, 0.0, 4.0);
        assert_eq!(min, [-1.0, -3.5, 0.0]);
        assert_eq!(max, [1.0, -2.5, 4.0]);
    }

    #[test]
    fn test_wide_flange_has_no_side_slot_wall() {
        let w = Profile::wide_flange("W10x33", 9.73, 7.96, 0.435, 0.29);
        assert!(slot_wall(&w, FaceName::Left).is_none());
        let (axis, _, offset, t) = slot_wall(&w, FaceName::Front).unwrap();
        assert_eq!(axis, Axis::Y);
        assert_relative_eq!(offset, 4.865);
        assert_relative_eq!(t, 0.435);
    }
}
