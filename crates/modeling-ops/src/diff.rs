use std::collections::{BTreeSet, HashMap, HashSet};

use solid_kernel::{KernelId, KernelIntrospect, KernelSolidHandle};
use steel_types::{TopoKind, TopoSignature};

use crate::types::EntityRecord;

/// Minimum similarity for a vanished entity to be paired with a new one.
const MATCH_THRESHOLD: f64 = 0.7;
/// Centroid distance at which proximity stops contributing to similarity.
const CENTROID_FALLOFF: f64 = 10.0;

/// A snapshot of the topology of a solid at a point in time.
#[derive(Debug, Clone)]
pub struct TopoSnapshot {
    pub faces: Vec<(KernelId, TopoSignature)>,
    pub edges: Vec<(KernelId, TopoSignature)>,
    pub vertices: Vec<(KernelId, TopoSignature)>,
}

impl TopoSnapshot {
    pub fn empty() -> Self {
        Self {
            faces: Vec::new(),
            edges: Vec::new(),
            vertices: Vec::new(),
        }
    }
}

/// Take a topology snapshot of a solid for diffing.
pub fn snapshot(introspect: &dyn KernelIntrospect, solid: &KernelSolidHandle) -> TopoSnapshot {
    TopoSnapshot {
        faces: introspect.compute_all_signatures(solid, TopoKind::Face),
        edges: introspect.compute_all_signatures(solid, TopoKind::Edge),
        vertices: introspect.compute_all_signatures(solid, TopoKind::Vertex),
    }
}

/// Result of diffing two topology snapshots.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Entities present in `after` but not in `before`.
    pub created: Vec<EntityRecord>,
    /// Entities present in `before` but not in `after`.
    pub deleted: Vec<EntityRecord>,
    /// (before, after) pairs judged to be the same entity.
    pub survived: Vec<(KernelId, KernelId)>,
}

/// Diff two topology snapshots. Kernels re-id topology on every operation,
/// so entities are paired by signature when their ids differ.
/// Output order follows kernel id order.
pub fn diff(before: &TopoSnapshot, after: &TopoSnapshot) -> DiffResult {
    let mut result = DiffResult::default();
    diff_kind(&before.faces, &after.faces, TopoKind::Face, &mut result);
    diff_kind(&before.edges, &after.edges, TopoKind::Edge, &mut result);
    diff_kind(&before.vertices, &after.vertices, TopoKind::Vertex, &mut result);
    result
}

fn diff_kind(
    before: &[(KernelId, TopoSignature)],
    after: &[(KernelId, TopoSignature)],
    kind: TopoKind,
    result: &mut DiffResult,
) {
    let before_map: HashMap<KernelId, &TopoSignature> =
        before.iter().map(|(id, sig)| (*id, sig)).collect();
    let after_map: HashMap<KernelId, &TopoSignature> =
        after.iter().map(|(id, sig)| (*id, sig)).collect();
    let before_ids: BTreeSet<KernelId> = before_map.keys().copied().collect();
    let after_ids: BTreeSet<KernelId> = after_map.keys().copied().collect();

    for &id in before_ids.intersection(&after_ids) {
        result.survived.push((id, id));
    }

    let gone: Vec<KernelId> = before_ids.difference(&after_ids).copied().collect();
    let new: Vec<KernelId> = after_ids.difference(&before_ids).copied().collect();
    let mut matched_before: HashSet<KernelId> = HashSet::new();
    let mut matched_after: HashSet<KernelId> = HashSet::new();

    // Greedy: each vanished entity takes its best unclaimed candidate.
    for &gone_id in &gone {
        let gone_sig = before_map[&gone_id];
        let best = new
            .iter()
            .filter(|id| !matched_after.contains(*id))
            .map(|&id| (id, signature_similarity(gone_sig, after_map[&id])))
            .filter(|(_, sim)| *sim > MATCH_THRESHOLD)
            .fold(None::<(KernelId, f64)>, |best, cand| match best {
                Some(b) if b.1 >= cand.1 => Some(b),
                _ => Some(cand),
            });
        if let Some((matched, _)) = best {
            result.survived.push((gone_id, matched));
            matched_before.insert(gone_id);
            matched_after.insert(matched);
        }
    }

    for &id in gone.iter().filter(|id| !matched_before.contains(*id)) {
        result.deleted.push(EntityRecord {
            kernel_id: id,
            kind,
            signature: before_map[&id].clone(),
        });
    }
    for &id in new.iter().filter(|id| !matched_after.contains(*id)) {
        result.created.push(EntityRecord {
            kernel_id: id,
            kind,
            signature: after_map[&id].clone(),
        });
    }
}

fn relative_closeness(a: f64, b: f64) -> f64 {
    let max = a.abs().max(b.abs());
    if max > 1e-12 {
        1.0 - ((a - b).abs() / max).min(1.0)
    } else {
        1.0
    }
}

/// Compute similarity between two topology signatures (0.0 to 1.0).
/// Higher means more similar. Used for signature-based matching.
pub fn signature_similarity(a: &TopoSignature, b: &TopoSignature) -> f64 {
    let mut score = 0.0;
    let mut weight = 0.0;

    if let (Some(st_a), Some(st_b)) = (&a.surface_type, &b.surface_type) {
        weight += 3.0;
        if st_a == st_b {
            score += 3.0;
        }
    }

    if let (Some(area_a), Some(area_b)) = (a.area, b.area) {
        weight += 2.0;
        score += 2.0 * relative_closeness(area_a, area_b);
    }

    if let (Some(c_a), Some(c_b)) = (a.centroid, b.centroid) {
        weight += 2.0;
        let dist = ((c_a[0] - c_b[0]).powi(2) + (c_a[1] - c_b[1]).powi(2) + (c_a[2] - c_b[2]).powi(2))
            .sqrt();
        score += 2.0 * (1.0 - (dist / CENTROID_FALLOFF).min(1.0));
    }

    if let (Some(n_a), Some(n_b)) = (a.normal, b.normal) {
        weight += 2.0;
        let dot = n_a[0] * n_b[0] + n_a[1] * n_b[1] + n_a[2] * n_b[2];
        score += 2.0 * ((dot + 1.0) / 2.0).max(0.0);
    }

    if let (Some(len_a), Some(len_b)) = (a.length, b.length) {
        weight += 2.0;
        score += 2.0 * relative_closeness(len_a, len_b);
    }

    if weight > 0.0 {
        score / weight
    } else {
        0.0
    }
}
