//! Repeated portal frame: two columns on base plates, a header between
//! them, optional connecting beams between consecutive frames.
//!
//! Frame coordinates are Y up, X across the span, and successive frames
//! step along -Z. Members are built once and shared by every placement.

use std::collections::BTreeMap;
use std::sync::Arc;

use member_gen::{generate_base_plate, generate_member, Member};
use modeling_ops::{execute_transform, solid_bounds, Diagnostics, KernelBundle};
use steel_types::{Axis, Placement, Profile, Rotation, Vec3};
use tracing::{debug, info, instrument};

use crate::error::SolveError;
use crate::inputs::FrameInputs;
use crate::output::{AnchorSet, AnchorSpace, Assembly, FrameAssemblyResult, FrameMetadata};
use crate::section::{profile_wall_check, section_properties};
use crate::validation::validate_header;

/// Connecting beams with less clear span than this use the full spacing.
pub const MIN_CONN_BEAM_LENGTH: f64 = 1.0;

/// Plan-view extent of a column after its orientation spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnFootprint {
    /// Reach across the span (frame X).
    pub half_width: f64,
    /// Reach along the frame line (frame Z).
    pub half_depth: f64,
}

/// Build a probe column, spin it about its axis by `orientation` degrees
/// and measure how far it reaches from the axis.
pub fn measure_column(
    kb: &mut dyn KernelBundle,
    profile: &Profile,
    height: f64,
    orientation: f64,
    diagnostics: &mut Diagnostics,
) -> Result<ColumnFootprint, SolveError> {
    let probe = generate_member(kb, profile, height, &[], diagnostics)
        .map_err(SolveError::generate("column"))?;
    let spin = Placement::new([0.0; 3], Rotation::about_z(orientation));
    let spun = execute_transform(kb, &probe.solid, &spin)?;
    let bb = solid_bounds(kb.as_introspect(), &spun)?;
    Ok(ColumnFootprint {
        half_width: bb.half_extent_from_origin(Axis::X),
        half_depth: bb.half_extent_from_origin(Axis::Y),
    })
}

/// Clear length of a connecting beam between column faces, or the full
/// spacing when the columns leave less than `MIN_CONN_BEAM_LENGTH`.
pub fn conn_beam_length(spacing: f64, col_half_depth: f64) -> f64 {
    let clear = spacing - 2.0 * col_half_depth;
    if clear < MIN_CONN_BEAM_LENGTH {
        spacing
    } else {
        clear
    }
}

fn start_end(length: f64) -> AnchorSet {
    AnchorSet::local([("start", [0.0, 0.0, 0.0]), ("end", [0.0, 0.0, length])])
}

#[instrument(skip_all, fields(width = inputs.width, height = inputs.height, num_frames = inputs.num_frames))]
pub fn solve(
    inputs: &FrameInputs,
    kb: &mut dyn KernelBundle,
    diagnostics: &mut Diagnostics,
) -> Result<FrameAssemblyResult, SolveError> {
    let col_profile = inputs
        .col_profile
        .as_ref()
        .ok_or(SolveError::MissingProfile { role: "column" })?;
    let header_profile = inputs
        .header_profile
        .as_ref()
        .ok_or(SolveError::MissingProfile { role: "header" })?;
    if inputs.num_frames == 0 {
        return Err(SolveError::NoFrames);
    }

    let footprint = measure_column(
        kb,
        col_profile,
        inputs.height,
        inputs.col_orientation,
        diagnostics,
    )?;

    let header_length = inputs.width - 2.0 * footprint.half_width - 2.0 * inputs.gap;
    if header_length <= 0.0 {
        return Err(SolveError::WidthTooNarrow {
            width: inputs.width,
            col_half_width: footprint.half_width,
        });
    }

    let bp = inputs.bp_size;
    let col_length = inputs.height - bp.thickness;
    if col_length <= 0.0 {
        return Err(SolveError::HeightTooLow {
            height: inputs.height,
            bp_thickness: bp.thickness,
        });
    }

    let features = &inputs.features;
    let base_plate = Arc::new(
        generate_base_plate(
            kb,
            bp.length,
            bp.width,
            bp.thickness,
            &features.base_plate,
            diagnostics,
        )
        .map_err(SolveError::generate("base plate"))?,
    );
    let column = Arc::new(
        generate_member(kb, col_profile, col_length, &features.column, diagnostics)
            .map_err(SolveError::generate("column"))?,
    );
    let header = Arc::new(
        generate_member(kb, header_profile, header_length, &features.header, diagnostics)
            .map_err(SolveError::generate("header"))?,
    );

    let conn_beam = match &inputs.conn_beam_profile {
        Some(profile) if inputs.num_frames > 1 => {
            let clear = inputs.frame_spacing - 2.0 * footprint.half_depth;
            if clear < MIN_CONN_BEAM_LENGTH {
                diagnostics.warn(
                    "frame_solver",
                    format!(
                        "connecting beam clear span below {}, using frame spacing {}",
                        MIN_CONN_BEAM_LENGTH, inputs.frame_spacing
                    ),
                );
            }
            let length = conn_beam_length(inputs.frame_spacing, footprint.half_depth);
            let member = generate_member(kb, profile, length, &features.conn_beam, diagnostics)
                .map_err(SolveError::generate("connecting beam"))?;
            Some((Arc::new(member), profile.depth()))
        }
        Some(_) => {
            debug!("single frame, connecting beam profile ignored");
            None
        }
        None => None,
    };

    let header_center_y = inputs.height - header_profile.depth() / 2.0;
    let mut asm = Assembly::default();
    layout_frames(
        &mut asm,
        inputs,
        &FrameMembers {
            base_plate: &base_plate,
            column: &column,
            header: &header,
            conn_beam: conn_beam.as_ref().map(|(m, d)| (m, *d)),
        },
        header_center_y,
    );

    let header_section = section_properties(header_profile);
    let validation = validate_header(
        &header_section,
        header_length,
        inputs.point_load_lbs,
        &inputs.criteria,
    );
    info!(
        header_length,
        deflection = validation.deflection,
        stress = validation.stress,
        status = ?validation.status,
        "frame solved"
    );

    let mut wall_checks = BTreeMap::new();
    let roles = [
        ("column", Some(col_profile)),
        ("header", Some(header_profile)),
        ("conn_beam", conn_beam.as_ref().and(inputs.conn_beam_profile.as_ref())),
    ];
    for (role, profile) in roles {
        if let Some(check) = profile.and_then(profile_wall_check) {
            wall_checks.insert(role.to_string(), check);
        }
    }

    Ok(FrameAssemblyResult {
        parts: asm.parts,
        transforms: asm.transforms,
        anchors: asm.anchors,
        metadata: FrameMetadata {
            header_length,
            col_length,
            header_center_y,
            conn_beam_length: conn_beam.as_ref().map_or(0.0, |(m, _)| m.length),
            col_half_width: footprint.half_width,
            col_half_depth: footprint.half_depth,
            col_orientation: inputs.col_orientation,
            gap: inputs.gap,
            num_frames: inputs.num_frames,
            header_section,
            validation,
            wall_checks,
        },
    })
}

struct FrameMembers<'a> {
    base_plate: &'a Arc<Member>,
    column: &'a Arc<Member>,
    header: &'a Arc<Member>,
    /// Beam and its section depth.
    conn_beam: Option<(&'a Arc<Member>, f64)>,
}

fn layout_frames(
    asm: &mut Assembly,
    inputs: &FrameInputs,
    members: &FrameMembers<'_>,
    header_center_y: f64,
) {
    let n = inputs.num_frames;
    let spacing = inputs.frame_spacing;
    let half = inputs.width / 2.0;
    let bp_t = inputs.bp_size.thickness;
    let header_length = members.header.length;

    let bp_rot = Rotation::about_x(-90.0);
    let col_rot = Rotation::about_z(inputs.col_orientation).then(&Rotation::about_x(-90.0));
    let header_rot = Rotation::about_y(90.0);
    let beam_rot = Rotation::about_y(180.0);

    let plate_anchors = AnchorSet::local([
        ("bottom_face", [0.0, 0.0, 0.0]),
        ("top_face", [0.0, 0.0, bp_t]),
    ]);
    let column_anchors = AnchorSet::local([
        ("base", [0.0, 0.0, 0.0]),
        ("top", [0.0, 0.0, members.column.length]),
    ]);
    let header_anchors = start_end(header_length);

    for i in 0..n {
        let z = -(i as f64) * spacing;
        let sfx = if n > 1 { format!("_{}", i) } else { String::new() };
        let mut frame_points: BTreeMap<String, Vec3> = BTreeMap::new();

        let sides = [
            ("left", -half, inputs.skip_start_col_left),
            ("right", half, inputs.skip_start_col_right),
        ];
        for (side, x, skip) in sides {
            if i == 0 && skip {
                debug!(side, "start column skipped");
                continue;
            }
            asm.place(
                format!("base_plate_{}{}", side, sfx),
                members.base_plate,
                Placement::new([x, 0.0, z], bp_rot),
                &plate_anchors,
            );
            asm.place(
                format!("column_{}{}", side, sfx),
                members.column,
                Placement::new([x, bp_t, z], col_rot),
                &column_anchors,
            );
            frame_points.insert(format!("column_{}_top", side), [x, inputs.height, z]);
        }

        asm.place(
            format!("header{}", sfx),
            members.header,
            Placement::new([-header_length / 2.0, header_center_y, z], header_rot),
            &header_anchors,
        );
        frame_points.insert("header_start".to_string(), [-header_length / 2.0, header_center_y, z]);
        frame_points.insert("header_end".to_string(), [header_length / 2.0, header_center_y, z]);
        asm.anchors.insert(
            format!("frame{}", sfx),
            AnchorSet {
                space: AnchorSpace::Global,
                points: frame_points,
            },
        );

        if let Some((beam, depth)) = members.conn_beam {
            if i + 1 < n {
                let beam_anchors = start_end(beam.length);
                // Runs from this frame's column face toward the next frame.
                let start_z = z - spacing / 2.0 + beam.length / 2.0;
                let y = inputs.height - depth / 2.0;
                for (side, x) in [("left", -half), ("right", half)] {
                    asm.place(
                        format!("conn_beam_{}_{}", side, i),
                        beam,
                        Placement::new([x, y, start_z], beam_rot),
                        &beam_anchors,
                    );
                }
            }
        }
    }

    debug!(parts = asm.parts.len(), "frames laid out");
}
