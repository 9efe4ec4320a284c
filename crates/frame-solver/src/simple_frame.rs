//! Single two-column frame laid out from its centre lines: columns run the
//! full height from the base plates, the header hangs between them at the
//! top. Every anchor is in frame coordinates.

use std::collections::BTreeMap;
use std::sync::Arc;

use member_gen::{generate_base_plate, generate_member, Member};
use modeling_ops::{Diagnostics, KernelBundle};
use serde::{Deserialize, Serialize};
use steel_types::{Placement, Profile, Rotation};
use tracing::instrument;

use crate::error::SolveError;
use crate::inputs::BasePlateSize;
use crate::output::{AnchorSet, Assembly};

/// Clearance between each header end and the column face.
pub const HEADER_CLEARANCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleFrameInputs {
    pub column: Profile,
    pub header: Profile,
    pub width: f64,
    pub height: f64,
    #[serde(default = "simple_base_plate")]
    pub bp_size: BasePlateSize,
    /// Spin both columns 90 degrees about their own axis.
    #[serde(default)]
    pub rotate_columns: bool,
}

fn simple_base_plate() -> BasePlateSize {
    BasePlateSize {
        length: 12.0,
        width: 12.0,
        thickness: 0.75,
    }
}

impl SimpleFrameInputs {
    pub fn new(column: Profile, header: Profile, width: f64, height: f64) -> Self {
        Self {
            column,
            header,
            width,
            height,
            bp_size: simple_base_plate(),
            rotate_columns: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleFrameMetadata {
    pub width: f64,
    pub height: f64,
    pub header_length: f64,
    pub col_length: f64,
    pub header_center_y: f64,
}

#[derive(Debug, Clone)]
pub struct SimpleFrameResult {
    pub parts: BTreeMap<String, Arc<Member>>,
    pub transforms: BTreeMap<String, Placement>,
    pub anchors: BTreeMap<String, AnchorSet>,
    pub metadata: SimpleFrameMetadata,
}

#[instrument(skip_all, fields(width = inputs.width, height = inputs.height))]
pub fn create_simple_frame(
    inputs: &SimpleFrameInputs,
    kb: &mut dyn KernelBundle,
    diagnostics: &mut Diagnostics,
) -> Result<SimpleFrameResult, SolveError> {
    let half = inputs.width / 2.0;
    let bp = inputs.bp_size;

    let col_length = inputs.height - bp.thickness;
    if col_length <= 0.0 {
        return Err(SolveError::HeightTooLow {
            height: inputs.height,
            bp_thickness: bp.thickness,
        });
    }
    let header_length = inputs.width - inputs.column.depth() - 2.0 * HEADER_CLEARANCE;
    if header_length <= 0.0 {
        return Err(SolveError::WidthTooNarrow {
            width: inputs.width,
            col_half_width: inputs.column.depth() / 2.0,
        });
    }
    let header_center_y = inputs.height - inputs.header.depth() / 2.0;

    let base_plate = Arc::new(
        generate_base_plate(kb, bp.length, bp.width, bp.thickness, &[], diagnostics)
            .map_err(SolveError::generate("base plate"))?,
    );
    let column = Arc::new(
        generate_member(kb, &inputs.column, col_length, &[], diagnostics)
            .map_err(SolveError::generate("column"))?,
    );
    let header = Arc::new(
        generate_member(kb, &inputs.header, header_length, &[], diagnostics)
            .map_err(SolveError::generate("header"))?,
    );

    let stand_up = Rotation::about_x(-90.0);
    let col_rot = if inputs.rotate_columns {
        Rotation::about_z(90.0).then(&stand_up)
    } else {
        stand_up
    };

    let mut asm = Assembly::default();
    for (side, x) in [("left", -half), ("right", half)] {
        asm.place(
            format!("base_plate_{}", side),
            &base_plate,
            Placement::new([x, 0.0, 0.0], stand_up),
            &AnchorSet::global([
                ("bottom_face", [x, 0.0, 0.0]),
                ("top_face", [x, bp.thickness, 0.0]),
            ]),
        );
        asm.place(
            format!("column_{}", side),
            &column,
            Placement::new([x, bp.thickness, 0.0], col_rot),
            &AnchorSet::global([
                ("start", [x, bp.thickness, 0.0]),
                ("end", [x, inputs.height, 0.0]),
            ]),
        );
    }

    let start_x = -header_length / 2.0;
    asm.place(
        "header".to_string(),
        &header,
        Placement::new([start_x, header_center_y, 0.0], Rotation::about_y(90.0)),
        &AnchorSet::global([
            ("start", [start_x, header_center_y, 0.0]),
            ("end", [-start_x, header_center_y, 0.0]),
        ]),
    );

    Ok(SimpleFrameResult {
        parts: asm.parts,
        transforms: asm.transforms,
        anchors: asm.anchors,
        metadata: SimpleFrameMetadata {
            width: inputs.width,
            height: inputs.height,
            header_length,
            col_length,
            header_center_y,
        },
    })
}
