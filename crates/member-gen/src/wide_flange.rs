use modeling_ops::{execute_extrude, execute_fillet, Diagnostics, KernelBundle};
use solid_kernel::{KernelId, KernelIntrospect, KernelSolidHandle, TopoKind};
use steel_types::{BoundingBox, Feature, PlanarProfile, Profile, Shape};
use tracing::instrument;

use crate::types::{require_positive, GenerateError, Member};

/// Longitudinal fillet edges must span this fraction of the member.
const FILLET_EDGE_SPAN: f64 = 0.8;
/// Lateral and web-face tolerance when picking fillet edges.
const FILLET_EDGE_TOL: f64 = 0.1;

/// Bottom flange, web and top flange as one 12-vertex outline, centred on
/// the origin with depth along Y.
pub fn i_shape_outline(depth: f64, flange_width: f64, flange_thickness: f64, web_thickness: f64) -> Vec<[f64; 2]> {
    let (hd, hb, hw, tf) = (depth / 2.0, flange_width / 2.0, web_thickness / 2.0, flange_thickness);
    vec![
        [-hb, -hd],
        [hb, -hd],
        [hb, -hd + tf],
        [hw, -hd + tf],
        [hw, hd - tf],
        [hb, hd - tf],
        [hb, hd],
        [-hb, hd],
        [-hb, hd - tf],
        [-hw, hd - tf],
        [-hw, -hd + tf],
        [-hb, -hd + tf],
    ]
}

/// The four longitudinal edges where the web meets the flanges.
pub fn web_flange_edges(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    length: f64,
    web_thickness: f64,
) -> Vec<KernelId> {
    introspect
        .compute_all_signatures(solid, TopoKind::Edge)
        .into_iter()
        .filter(|(_, sig)| sig.is_sharp_edge())
        .filter_map(|(id, sig)| sig.bbox.map(|b| (id, BoundingBox::from_array(b))))
        .filter(|(_, bb)| {
            let size = bb.size();
            let cx = bb.center()[0];
            size[2] >= FILLET_EDGE_SPAN * length
                && size[0] < FILLET_EDGE_TOL
                && size[1] < FILLET_EDGE_TOL
                && (cx.abs() - web_thickness / 2.0).abs() < FILLET_EDGE_TOL
        })
        .map(|(id, _)| id)
        .collect()
}

/// Wide-flange member extruded along +Z. A positive `k` rounds the
/// web-flange corners; if the kernel cannot, the member stays sharp and a
/// warning is recorded.
#[instrument(skip(kb, profile, features, diagnostics), fields(designation = %profile.designation))]
pub fn generate_wide_flange(
    kb: &mut dyn KernelBundle,
    profile: &Profile,
    length: f64,
    features: &[Feature],
    diagnostics: &mut Diagnostics,
) -> Result<Member, GenerateError> {
    let Shape::WideFlange {
        depth,
        flange_width,
        flange_thickness,
        web_thickness,
        fillet_radius,
    } = profile.shape
    else {
        return Err(GenerateError::ShapeMismatch {
            expected: "W",
            found: profile.member_type(),
        });
    };
    require_positive("length", length)?;
    require_positive("depth", depth)?;
    require_positive("flange width", flange_width)?;
    require_positive("flange thickness", flange_thickness)?;
    require_positive("web thickness", web_thickness)?;
    if 2.0 * flange_thickness >= depth {
        return Err(GenerateError::InvalidDimension {
            name: "clear web depth",
            value: depth - 2.0 * flange_thickness,
        });
    }
    if web_thickness >= flange_width {
        return Err(GenerateError::InvalidDimension {
            name: "flange outstand",
            value: flange_width - web_thickness,
        });
    }

    let outline = i_shape_outline(depth, flange_width, flange_thickness, web_thickness);
    let base = execute_extrude(kb, &PlanarProfile::xy(0.0, outline), [0.0, 0.0, 1.0], length)?;
    let mut solid = base.handle;

    if fillet_radius > 0.0 {
        let edges = web_flange_edges(kb.as_introspect(), &solid, length, web_thickness);
        if edges.is_empty() {
            diagnostics.warn("wide_flange", "no web-flange edges found for the k fillet");
        } else {
            match execute_fillet(kb, &solid, &edges, fillet_radius) {
                Ok(result) => solid = result.handle,
                Err(e) => diagnostics.warn(
                    "wide_flange",
                    format!("k fillet of {} skipped: {}", fillet_radius, e),
                ),
            }
        }
    }

    Ok(crate::finish_section(
        kb,
        profile,
        length,
        solid,
        features,
        diagnostics,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use steel_types::sketch::signed_area;

    #[test]
    fn test_outline_area_matches_section() {
        let pts = i_shape_outline(9.73, 7.96, 0.435, 0.29);
        assert_eq!(pts.len(), 12);
        let expected = 2.0 * 7.96 * 0.435 + (9.73 - 2.0 * 0.435) * 0.29;
        assert!((signed_area(&pts).abs() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_outline_is_symmetric() {
        let pts = i_shape_outline(12.0, 6.0, 0.5, 0.25);
        for p in &pts {
            assert!(pts
                .iter()
                .any(|q| (q[0] + p[0]).abs() < 1e-12 && (q[1] - p[1]).abs() < 1e-12));
        }
    }
}
