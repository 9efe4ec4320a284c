//! Assertion helpers with diagnostic output.
//!
//! Every failure states the context, the expected value and the actual value.

use steel_types::{BoundingBox, Vec3};

use crate::helpers::{max_axis_distance, HarnessError};
use crate::oracle::OracleVerdict;

/// Assert two points agree on every axis within `tol`.
pub fn assert_point_near(actual: Vec3, expected: Vec3, tol: f64, ctx: &str) -> Result<(), HarnessError> {
    let d = max_axis_distance(actual, expected);
    if d <= tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] expected ({:.4}, {:.4}, {:.4}), got ({:.4}, {:.4}, {:.4}) (off by {:.4}, tol={})",
                ctx, expected[0], expected[1], expected[2], actual[0], actual[1], actual[2], d, tol,
            ),
        })
    }
}

/// Assert a bounding box matches expected corners within tolerance.
pub fn assert_bounds(
    actual: &BoundingBox,
    expected_min: Vec3,
    expected_max: Vec3,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    for i in 0..3 {
        if (actual.min[i] - expected_min[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box min[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected_min[i], actual.min[i], tol,
                ),
            });
        }
        if (actual.max[i] - expected_max[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box max[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected_max[i], actual.max[i], tol,
                ),
            });
        }
    }
    Ok(())
}

/// Assert the part names are exactly `expected`, in any order.
pub fn assert_part_names<'a>(
    actual: impl IntoIterator<Item = &'a str>,
    expected: &[&str],
    ctx: &str,
) -> Result<(), HarnessError> {
    let mut actual: Vec<&str> = actual.into_iter().collect();
    let mut expected = expected.to_vec();
    actual.sort_unstable();
    expected.sort_unstable();

    if actual == expected {
        return Ok(());
    }
    let missing: Vec<&str> = expected
        .iter()
        .filter(|n| !actual.contains(*n))
        .copied()
        .collect();
    let extra: Vec<&str> = actual
        .iter()
        .filter(|n| !expected.contains(*n))
        .copied()
        .collect();
    Err(HarnessError::AssertionFailed {
        detail: format!(
            "[{}] part names differ. Missing: [{}] Extra: [{}]",
            ctx,
            missing.join(", "),
            extra.join(", "),
        ),
    })
}

/// Assert every verdict passed; the error lists all failures.
pub fn assert_all_pass(verdicts: &[OracleVerdict], ctx: &str) -> Result<(), HarnessError> {
    let failed: Vec<String> = verdicts
        .iter()
        .filter(|v| !v.passed)
        .map(|v| format!("{}: {}", v.oracle_name, v.detail))
        .collect();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::OracleFailure {
            oracle: ctx.to_string(),
            detail: failed.join("; "),
        })
    }
}
