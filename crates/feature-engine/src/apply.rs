use modeling_ops::{
    execute_boolean, execute_fillet, BooleanKind, Diagnostics, KernelBundle, OpResult,
};
use solid_kernel::KernelSolidHandle;
use steel_types::geom::{add, scale};
use steel_types::sketch::{circle_loop, rect_loop};
use steel_types::{EdgeGroup, FaceName, Feature, FeatureKind, PlanarProfile, SketchOp, SketchProfile};

use crate::classify::{classify_edges, classify_face};
use crate::cuts::{self, CUT_EPS};
use crate::types::{FeatureContext, FeatureError};

/// Apply one feature to `solid`, returning the replacement solid.
///
/// `enabled` is not consulted here; the pipeline decides what runs.
pub fn apply_feature(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    feature: &Feature,
    ctx: &FeatureContext,
    diagnostics: &mut Diagnostics,
) -> Result<OpResult, FeatureError> {
    match feature.kind {
        FeatureKind::Fillet { edges, radius } => apply_fillet(kb, solid, ctx, edges, radius),
        FeatureKind::Sketch {
            face,
            profile,
            operation,
            amount,
            center,
        } => apply_sketch(
            kb,
            solid,
            ctx,
            face,
            profile,
            operation,
            amount,
            center,
            diagnostics,
        ),
        FeatureKind::BoltHoles {
            location,
            diameter,
            count,
            spacing,
            position,
        } => cuts::apply_bolt_holes(
            kb,
            solid,
            ctx,
            location,
            diameter,
            count,
            spacing,
            position,
            diagnostics,
        ),
        FeatureKind::EndPlate {
            end,
            thickness,
            height,
            width,
        } => cuts::apply_end_plate(kb, solid, ctx, end, thickness, height, width),
        FeatureKind::Cope {
            end,
            flange,
            depth,
            height,
        } => cuts::apply_cope(kb, solid, ctx, end, flange, depth, height),
        FeatureKind::Slot {
            face,
            width,
            length,
            z_position,
        } => cuts::apply_slot(kb, solid, ctx, face, width, length, z_position),
        FeatureKind::ThroughPlateSlot {
            position,
            slot_height,
            plate_thickness,
        } => cuts::apply_through_plate_slot(
            kb,
            solid,
            ctx,
            position,
            slot_height,
            plate_thickness,
            diagnostics,
        ),
    }
}

/// Round every edge of a classified group.
pub fn apply_fillet(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    ctx: &FeatureContext,
    group: EdgeGroup,
    radius: f64,
) -> Result<OpResult, FeatureError> {
    let edges = classify_edges(kb.as_introspect(), solid, group, &ctx.frame, &ctx.config);
    if edges.is_empty() {
        return Err(FeatureError::NoMatchingEdges { group });
    }
    Ok(execute_fillet(kb, solid, &edges, radius)?)
}

/// Draw a circle or rectangle on a classified face and cut it into the body
/// or extrude it out of the body.
#[allow(clippy::too_many_arguments)]
pub fn apply_sketch(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    ctx: &FeatureContext,
    face: FaceName,
    profile: SketchProfile,
    operation: SketchOp,
    amount: f64,
    center: [f64; 2],
    diagnostics: &mut Diagnostics,
) -> Result<OpResult, FeatureError> {
    if amount.is_nan() || amount == 0.0 {
        return Err(FeatureError::InvalidParameter {
            reason: "sketch amount must be non-zero".to_string(),
        });
    }
    let outline = match profile {
        SketchProfile::Circle { radius } if radius > 0.0 => {
            circle_loop(center[0], center[1], radius)
        }
        SketchProfile::Rectangle { width, height } if width > 0.0 && height > 0.0 => {
            rect_loop(center[0], center[1], width, height)
        }
        _ => {
            return Err(FeatureError::InvalidParameter {
                reason: format!("sketch profile {:?} has a non-positive size", profile),
            })
        }
    };

    let hit = classify_face(
        kb.as_introspect(),
        solid,
        face,
        &ctx.frame,
        &ctx.config,
        diagnostics,
    )
    .ok_or(FeatureError::NoMatchingFace { face })?;
    let n = hit.normal;
    let depth = amount.abs();

    match operation {
        SketchOp::Cut => {
            let origin = add(hit.centroid, scale(n, CUT_EPS));
            let sketch = PlanarProfile::on_plane(origin, n, outline);
            let tool = kb.extrude_profile(&sketch, scale(n, -1.0), depth + 2.0 * CUT_EPS)?;
            Ok(execute_boolean(kb, solid, &tool, BooleanKind::Subtract)?)
        }
        SketchOp::Extrude => {
            let sketch = PlanarProfile::on_plane(hit.centroid, n, outline);
            let boss = kb.extrude_profile(&sketch, n, depth)?;
            Ok(execute_boolean(kb, solid, &boss, BooleanKind::Union)?)
        }
    }
}
