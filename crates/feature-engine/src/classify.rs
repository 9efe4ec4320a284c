use serde::{Deserialize, Serialize};
use solid_kernel::{KernelId, KernelIntrospect, KernelSolidHandle, TopoKind};
use steel_types::geom::{dot, scale};
use steel_types::{Axis, BoundingBox, EdgeGroup, FaceName, Vec3};

use modeling_ops::Diagnostics;

use crate::types::ClassifyFrame;

/// Scores closer than this are treated as a tie.
const SCORE_TIE: f64 = 1e-6;

/// Tolerances used to map semantic names onto topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// A vertical edge spans more than this fraction of the height.
    pub vertical_fraction: f64,
    /// ...and wanders less than this fraction of the base laterally.
    pub lateral_fraction: f64,
    /// Distance from the base/top level that still counts as on it.
    pub level_tolerance: f64,
    /// Best face score below this raises a warning.
    pub face_warn_score: f64,
    /// Best `top` score below this means no face matches.
    pub face_reject_score: f64,
    /// Scale `level_tolerance` by the frame's base size.
    pub relative_to_base: bool,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            vertical_fraction: 0.5,
            lateral_fraction: 0.3,
            level_tolerance: 0.1,
            face_warn_score: 0.5,
            face_reject_score: 0.1,
            relative_to_base: false,
        }
    }
}

impl ClassifyConfig {
    fn level_tolerance(&self, frame: &ClassifyFrame) -> f64 {
        if self.relative_to_base {
            self.level_tolerance * frame.base
        } else {
            self.level_tolerance
        }
    }
}

/// Edges of `solid` that belong to `group`, in kernel order.
///
/// `All` is every edge the kernel lists. The positional groups only
/// consider sharp edges, so rounds left by an earlier fillet are skipped.
pub fn classify_edges(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    group: EdgeGroup,
    frame: &ClassifyFrame,
    config: &ClassifyConfig,
) -> Vec<KernelId> {
    if group == EdgeGroup::All {
        return introspect.list_edges(solid);
    }

    let up = frame.up;
    let (lat_a, lat_b) = up.lateral();
    let tol = config.level_tolerance(frame);

    introspect
        .compute_all_signatures(solid, TopoKind::Edge)
        .into_iter()
        .filter(|(_, sig)| sig.is_sharp_edge())
        .filter_map(|(id, sig)| sig.bbox.map(|b| (id, BoundingBox::from_array(b))))
        .filter(|(_, bb)| match group {
            EdgeGroup::All => true,
            EdgeGroup::Vertical => {
                bb.extent(up) > config.vertical_fraction * frame.height
                    && bb.extent(lat_a) < config.lateral_fraction * frame.base
                    && bb.extent(lat_b) < config.lateral_fraction * frame.base
            }
            EdgeGroup::Base => bb.center()[up.index()].abs() < tol,
            EdgeGroup::Top => (bb.center()[up.index()] - frame.height).abs() < tol,
        })
        .map(|(id, _)| id)
        .collect()
}

/// Outward direction a named face should face, for a body whose up axis is `up`.
pub fn canonical_direction(face: FaceName, up: Axis) -> Vec3 {
    let (top, front, right) = match up {
        Axis::Y => (Axis::Y, Axis::Z, Axis::X),
        Axis::Z => (Axis::Z, Axis::Y, Axis::X),
        Axis::X => (Axis::X, Axis::Z, Axis::Y),
    };
    match face {
        FaceName::Top => top.unit(),
        FaceName::Base => scale(top.unit(), -1.0),
        FaceName::Front => front.unit(),
        FaceName::Back => scale(front.unit(), -1.0),
        FaceName::Right => right.unit(),
        FaceName::Left => scale(right.unit(), -1.0),
    }
}

/// A face picked for a semantic name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMatch {
    pub face: KernelId,
    /// Alignment of the face normal with the canonical direction, in [-1, 1].
    pub score: f64,
    pub centroid: Vec3,
    pub normal: Vec3,
}

/// Face whose normal best matches the canonical direction of `name`.
///
/// Equal scores go to the face lying furthest along the direction, so the
/// outside wall wins over a parallel inner wall. A weak best match is
/// reported through `diagnostics`; a very weak `top` match yields `None`.
pub fn classify_face(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    name: FaceName,
    frame: &ClassifyFrame,
    config: &ClassifyConfig,
    diagnostics: &mut Diagnostics,
) -> Option<FaceMatch> {
    let dir = canonical_direction(name, frame.up);

    let best = introspect
        .compute_all_signatures(solid, TopoKind::Face)
        .into_iter()
        .filter_map(|(id, sig)| {
            let normal = sig.normal?;
            let centroid = sig.centroid?;
            Some(FaceMatch {
                face: id,
                score: dot(normal, dir),
                centroid,
                normal,
            })
        })
        .reduce(|best, cand| {
            if cand.score > best.score + SCORE_TIE {
                cand
            } else if (cand.score - best.score).abs() <= SCORE_TIE
                && dot(cand.centroid, dir) > dot(best.centroid, dir)
            {
                cand
            } else {
                best
            }
        })?;

    if name == FaceName::Top && best.score < config.face_reject_score {
        diagnostics.warn(
            "classify",
            format!("no face points {:?} (best score {:.2})", name, best.score),
        );
        return None;
    }
    if best.score < config.face_warn_score {
        diagnostics.warn(
            "classify",
            format!("weak match for {:?} face (score {:.2})", name, best.score),
        );
    }
    Some(best)
}
