//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets a test collect all failures in one pass.

use std::collections::BTreeMap;
use std::sync::Arc;

use feature_engine::StepOutcome;
use frame_solver::{FrameAssemblyResult, ValidationStatus};
use member_gen::Member;
use serde::Serialize;
use solid_kernel::{KernelIntrospect, KernelSolidHandle};

use crate::helpers::max_axis_distance;

/// Positional tolerance for anchor comparisons (in).
pub const ANCHOR_TOL: f64 = 1e-6;

/// The result of a single oracle check.
#[derive(Debug, Clone, Serialize)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }
}

// ── Solid Oracles ───────────────────────────────────────────────────────────

/// Check that a solid has faces and a non-degenerate bounding box.
pub fn check_solid_present(
    introspect: &dyn KernelIntrospect,
    name: &str,
    solid: &KernelSolidHandle,
) -> OracleVerdict {
    let faces = introspect.list_faces(solid).len();
    match introspect.bounding_box(solid) {
        Some(bb) if faces > 0 && (0..3).all(|i| bb.max[i] > bb.min[i]) => OracleVerdict::pass(
            "solid_present",
            format!("{}: {} faces, size {:?}", name, faces, bb.size()),
        ),
        Some(bb) => OracleVerdict::fail(
            "solid_present",
            format!("{}: {} faces, degenerate size {:?}", name, faces, bb.size()),
        ),
        None => OracleVerdict::fail("solid_present", format!("{}: no geometry", name)),
    }
}

/// Check that no requested feature failed on a member.
pub fn check_feature_steps(name: &str, member: &Member) -> OracleVerdict {
    let failed: Vec<String> = member
        .steps
        .iter()
        .filter_map(|s| match &s.outcome {
            StepOutcome::Failed { error } => {
                Some(format!("#{} {}: {}", s.index, s.feature_type, error))
            }
            _ => None,
        })
        .collect();

    if failed.is_empty() {
        OracleVerdict::pass(
            "feature_steps",
            format!("{}: {} steps, none failed", name, member.steps.len()),
        )
    } else {
        OracleVerdict::fail(
            "feature_steps",
            format!("{}: {} failed: {}", name, failed.len(), failed.join("; ")),
        )
    }
}

// ── Frame Oracles ───────────────────────────────────────────────────────────

/// Check that every column base sits on the top face of its base plate.
pub fn check_columns_seated(result: &FrameAssemblyResult) -> OracleVerdict {
    let mut worst: f64 = 0.0;
    let mut problems = Vec::new();
    let mut count = 0;

    for name in result.parts.keys().filter(|n| n.starts_with("column_")) {
        let plate = name.replacen("column_", "base_plate_", 1);
        let base = result.anchor_position(name, "base");
        let top = result.anchor_position(&plate, "top_face");
        match (base, top) {
            (Some(b), Some(t)) => {
                let d = max_axis_distance(b, t);
                worst = worst.max(d);
                if d > ANCHOR_TOL {
                    problems.push(format!("{} is {:.4} off {}", name, d, plate));
                }
                count += 1;
            }
            _ => problems.push(format!("{} or {} lacks anchors", name, plate)),
        }
    }

    if problems.is_empty() {
        OracleVerdict::pass_val(
            "columns_seated",
            format!("{} columns seated on their plates", count),
            worst,
        )
    } else {
        OracleVerdict::fail_val("columns_seated", problems.join("; "), worst)
    }
}

/// Check that all column tops are at one elevation.
pub fn check_column_tops_level(result: &FrameAssemblyResult) -> OracleVerdict {
    let tops: Vec<f64> = result
        .parts
        .keys()
        .filter(|n| n.starts_with("column_"))
        .filter_map(|n| result.anchor_position(n, "top"))
        .map(|p| p[1])
        .collect();

    let lo = tops.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = tops.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if tops.is_empty() {
        return OracleVerdict::fail("column_tops_level", "no column tops".to_string());
    }

    let spread = hi - lo;
    if spread <= ANCHOR_TOL {
        OracleVerdict::pass_val(
            "column_tops_level",
            format!("{} column tops at y = {:.4}", tops.len(), hi),
            spread,
        )
    } else {
        OracleVerdict::fail_val(
            "column_tops_level",
            format!("column tops range from {:.4} to {:.4}", lo, hi),
            spread,
        )
    }
}

/// Check the clearance between each header end and the adjacent column face.
pub fn check_header_clearance(result: &FrameAssemblyResult) -> OracleVerdict {
    let meta = &result.metadata;
    let mut worst: f64 = 0.0;
    let mut checked = 0;

    for (name, set) in result.anchors.iter().filter(|(n, _)| n.starts_with("frame")) {
        let (Some(start), Some(end)) = (set.get("header_start"), set.get("header_end")) else {
            return OracleVerdict::fail(
                "header_clearance",
                format!("{} has no header anchors", name),
            );
        };
        if let Some(left) = set.get("column_left_top") {
            let gap = start[0] - left[0] - meta.col_half_width;
            worst = worst.max((gap - meta.gap).abs());
            checked += 1;
        }
        if let Some(right) = set.get("column_right_top") {
            let gap = right[0] - end[0] - meta.col_half_width;
            worst = worst.max((gap - meta.gap).abs());
            checked += 1;
        }
    }

    if worst <= ANCHOR_TOL {
        OracleVerdict::pass_val(
            "header_clearance",
            format!("{} header ends clear by {}", checked, meta.gap),
            worst,
        )
    } else {
        OracleVerdict::fail_val(
            "header_clearance",
            format!("clearance off by up to {:.4} (expected {})", worst, meta.gap),
            worst,
        )
    }
}

/// Check that successive headers are equally spaced along -Z.
pub fn check_uniform_spacing(result: &FrameAssemblyResult) -> OracleVerdict {
    let n = result.metadata.num_frames;
    if n < 2 {
        return OracleVerdict::pass("uniform_spacing", "single frame".to_string());
    }

    let mut zs = Vec::with_capacity(n);
    for i in 0..n {
        match result.transforms.get(&format!("header_{}", i)) {
            Some(t) => zs.push(t.position[2]),
            None => {
                return OracleVerdict::fail("uniform_spacing", format!("header_{} missing", i))
            }
        }
    }

    let steps: Vec<f64> = zs.windows(2).map(|w| w[0] - w[1]).collect();
    let first = steps[0];
    let worst = steps
        .iter()
        .map(|s| (s - first).abs())
        .fold(0.0, f64::max);

    if first > 0.0 && worst <= ANCHOR_TOL {
        OracleVerdict::pass_val(
            "uniform_spacing",
            format!("{} frames, {} apart", n, first),
            first,
        )
    } else {
        OracleVerdict::fail_val(
            "uniform_spacing",
            format!("frame steps along -Z: {:?}", steps),
            worst,
        )
    }
}

/// Role of a part: its name without side and frame suffix.
fn part_role(name: &str) -> &str {
    ["base_plate", "column", "header", "conn_beam"]
        .into_iter()
        .find(|role| name.starts_with(role))
        .unwrap_or(name)
}

/// Check that every placement of a role shares one member.
pub fn check_shared_members(result: &FrameAssemblyResult) -> OracleVerdict {
    let mut by_role: BTreeMap<&str, Vec<&Arc<Member>>> = BTreeMap::new();
    for (name, member) in &result.parts {
        by_role.entry(part_role(name)).or_default().push(member);
    }

    let unshared: Vec<String> = by_role
        .iter()
        .filter(|(_, members)| members.windows(2).any(|w| !Arc::ptr_eq(w[0], w[1])))
        .map(|(role, members)| format!("{} ({} copies)", role, members.len()))
        .collect();

    if unshared.is_empty() {
        OracleVerdict::pass(
            "shared_members",
            format!(
                "{} parts share {} members",
                result.parts.len(),
                by_role.len()
            ),
        )
    } else {
        OracleVerdict::fail(
            "shared_members",
            format!("separately built: {}", unshared.join(", ")),
        )
    }
}

/// Check that the reported status agrees with the reported numbers.
pub fn check_validation_consistent(result: &FrameAssemblyResult) -> OracleVerdict {
    let v = &result.metadata.validation;
    let within = v.deflection <= v.limit_deflection && v.stress <= v.limit_stress;
    let expected = if within {
        ValidationStatus::Pass
    } else {
        ValidationStatus::Fail
    };

    let detail = format!(
        "deflection {:.4}/{:.4}, stress {:.3}/{:.3}, status {:?}",
        v.deflection, v.limit_deflection, v.stress, v.limit_stress, v.status
    );
    if v.status == expected {
        OracleVerdict::pass("validation_consistent", detail)
    } else {
        OracleVerdict::fail("validation_consistent", detail)
    }
}

// ── Composite ───────────────────────────────────────────────────────────────

/// Run every frame oracle plus the per-member checks on each distinct member.
pub fn run_frame_oracles(
    introspect: &dyn KernelIntrospect,
    result: &FrameAssemblyResult,
) -> Vec<OracleVerdict> {
    let mut verdicts = vec![
        check_columns_seated(result),
        check_column_tops_level(result),
        check_header_clearance(result),
        check_uniform_spacing(result),
        check_shared_members(result),
        check_validation_consistent(result),
    ];

    let mut seen: Vec<&Arc<Member>> = Vec::new();
    for (name, member) in &result.parts {
        if seen.iter().any(|m| Arc::ptr_eq(m, member)) {
            continue;
        }
        seen.push(member);
        verdicts.push(check_solid_present(introspect, name, &member.solid));
        verdicts.push(check_feature_steps(name, member));
    }
    verdicts
}
