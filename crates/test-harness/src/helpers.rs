//! Helper functions: error type, fixture profiles, scenario inputs, bounds math.

use frame_solver::{FrameInputs, SimpleFrameInputs};
use steel_types::{BoundingBox, Profile};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("frame not found: {name}")]
    FrameNotFound { name: String },

    #[error("member not found: {name}")]
    MemberNotFound { name: String },

    #[error("part {part} not found in frame {frame}")]
    PartNotFound { frame: String, part: String },

    #[error("solid has no geometry: {name}")]
    EmptySolid { name: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("solve error: {0}")]
    Solve(#[from] frame_solver::SolveError),

    #[error("generate error: {0}")]
    Generate(#[from] member_gen::GenerateError),

    #[error("operation error: {0}")]
    Op(#[from] modeling_ops::OpError),

    #[error("store error: {0}")]
    Store(#[from] frame_solver::StoreError),
}

// ── Fixture Profiles ────────────────────────────────────────────────────────

pub fn w10x33() -> Profile {
    Profile::wide_flange("W10x33", 9.73, 7.96, 0.435, 0.29).with_weight(33.0)
}

pub fn w10x49() -> Profile {
    Profile::wide_flange("W10x49", 10.0, 10.0, 0.56, 0.34).with_weight(49.0)
}

pub fn w12x14() -> Profile {
    Profile::wide_flange("W12x14", 11.9, 3.97, 0.225, 0.2).with_weight(14.0)
}

pub fn w12x26() -> Profile {
    Profile::wide_flange("W12x26", 12.2, 6.49, 0.38, 0.23).with_weight(26.0)
}

pub fn hss6x6x3_8() -> Profile {
    Profile::rect_hss("HSS6x6x3/8", 6.0, 6.0, 0.349).with_weight(27.48)
}

pub fn pipe6() -> Profile {
    Profile::round_hss("HSS6.625x0.280", 6.625, 0.261)
}

// ── Scenario Inputs ─────────────────────────────────────────────────────────

/// 100 x 100 portal, W10x49 throughout, square columns.
pub fn scenario_a() -> FrameInputs {
    FrameInputs::new(w10x49(), w10x49()).with_span(100.0, 100.0)
}

/// Scenario A with W12x14 members and columns spun 90 degrees.
pub fn scenario_b() -> FrameInputs {
    let mut inputs = FrameInputs::new(w12x14(), w12x14()).with_span(100.0, 100.0);
    inputs.col_orientation = 90.0;
    inputs
}

/// 240 wide, 120 tall W10x49 portal with the given centre load.
pub fn scenario_c(point_load_lbs: f64) -> FrameInputs {
    let mut inputs = FrameInputs::new(w10x49(), w10x49()).with_span(240.0, 120.0);
    inputs.point_load_lbs = point_load_lbs;
    inputs
}

/// W10x33 columns under a W12x26 header, 120 x 120.
pub fn scenario_d() -> SimpleFrameInputs {
    SimpleFrameInputs::new(w10x33(), w12x26(), 120.0, 120.0)
}

/// Scenario D with the columns spun 90 degrees.
pub fn scenario_e() -> SimpleFrameInputs {
    let mut inputs = scenario_d();
    inputs.rotate_columns = true;
    inputs
}

// ── Bounds Math ─────────────────────────────────────────────────────────────

/// Smallest box containing every input box, or `None` for no boxes.
pub fn union_bounds<'a>(boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Option<BoundingBox> {
    boxes
        .into_iter()
        .fold(None, |acc: Option<BoundingBox>, b| match acc {
            Some(a) => Some(a.union(b)),
            None => Some(*b),
        })
}

/// Largest per-axis distance between two points.
pub fn max_axis_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    (0..3).map(|i| (a[i] - b[i]).abs()).fold(0.0, f64::max)
}
