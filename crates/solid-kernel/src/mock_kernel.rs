//! MockKernel — deterministic polyhedral test double implementing Kernel + KernelIntrospect.
//!
//! Solids are explicit vertex/edge/face lists built from the input profiles, so
//! bounding boxes, face normals and edge extents match the requested geometry.
//! Booleans are approximate: union concatenates both topologies and subtraction
//! appends the tool as inward-facing void faces when the bodies overlap.

use std::collections::{HashMap, HashSet};

use steel_types::geom::{add, cross, dot, length, midpoint, normalize, scale, sub, Vec3};

use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;

const LINE: &str = "line";
const TANGENT: &str = "tangent";
const ARC: &str = "arc";
const PLANAR: &str = "planar";
const CYLINDRICAL: &str = "cylindrical";

/// Kernel operations that can be forced to fail in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    Extrude,
    Loft,
    Union,
    Subtract,
    Fillet,
    Transform,
}

/// A mock vertex with known position.
#[derive(Debug, Clone)]
struct MockVertex {
    id: KernelId,
    position: Vec3,
    /// Boundary of a subtracted void; excluded from the envelope.
    void: bool,
}

/// A straight mock edge. `curve` is the reported curve type.
#[derive(Debug, Clone)]
struct MockEdge {
    id: KernelId,
    start: KernelId,
    end: KernelId,
    points: [Vec3; 2],
    curve: &'static str,
}

/// A mock face with its outer outline for bounding-box queries.
#[derive(Debug, Clone)]
struct MockFace {
    id: KernelId,
    edges: Vec<KernelId>,
    outline: Vec<Vec3>,
    normal: Vec3,
    centroid: Vec3,
    area: f64,
    surface_type: &'static str,
}

#[derive(Debug, Clone, Default)]
struct MockSolid {
    vertices: Vec<MockVertex>,
    edges: Vec<MockEdge>,
    faces: Vec<MockFace>,
}

/// Geometry planned for one filleted edge before topology is rebuilt.
struct FilletPlan {
    edge: KernelId,
    start: Vec3,
    end: Vec3,
    sides: [(KernelId, Vec3); 2],
    normal: Vec3,
}

/// Deterministic test double for the geometry kernel.
/// Implements both Kernel and KernelIntrospect.
pub struct MockKernel {
    next_id: u64,
    next_handle: u64,
    solids: HashMap<u64, MockSolid>,
    /// Entity id -> owning solid handle.
    owner: HashMap<KernelId, u64>,
    failing: HashSet<MockOp>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            next_handle: 1,
            solids: HashMap::new(),
            owner: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    /// Make every later call of `op` return an error.
    pub fn fail_on(&mut self, op: MockOp) {
        self.failing.insert(op);
    }

    pub fn clear_failures(&mut self) {
        self.failing.clear();
    }

    /// Number of solids created in this session.
    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    fn check(&self, op: MockOp) -> Result<(), KernelError> {
        if self.failing.contains(&op) {
            return Err(match op {
                MockOp::Fillet => KernelError::FilletFailed {
                    reason: "injected failure".to_string(),
                },
                MockOp::Union | MockOp::Subtract => KernelError::BooleanFailed {
                    reason: "injected failure".to_string(),
                },
                MockOp::Loft => KernelError::LoftFailed {
                    reason: "injected failure".to_string(),
                },
                MockOp::Extrude | MockOp::Transform => KernelError::Other {
                    message: format!("injected failure in {:?}", op),
                },
            });
        }
        Ok(())
    }

    fn alloc_id(&mut self) -> KernelId {
        let id = KernelId(self.next_id);
        self.next_id += 1;
        id
    }

    fn alloc_handle(&mut self) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn store(&mut self, solid: MockSolid) -> KernelSolidHandle {
        let handle = self.alloc_handle();
        let ids = solid
            .vertices
            .iter()
            .map(|v| v.id)
            .chain(solid.edges.iter().map(|e| e.id))
            .chain(solid.faces.iter().map(|f| f.id));
        for id in ids {
            self.owner.insert(id, handle.id());
        }
        self.solids.insert(handle.id(), solid);
        handle
    }

    fn get(&self, handle: &KernelSolidHandle) -> Result<&MockSolid, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or(KernelError::EntityNotFound {
                id: KernelId(handle.id()),
            })
    }

    fn owning_solid(&self, entity: KernelId) -> Option<&MockSolid> {
        self.owner
            .get(&entity)
            .and_then(|h| self.solids.get(h))
    }

    fn add_vertex(&mut self, solid: &mut MockSolid, position: Vec3) -> (KernelId, Vec3) {
        let id = self.alloc_id();
        solid.vertices.push(MockVertex {
            id,
            position,
            void: false,
        });
        (id, position)
    }

    fn add_edge(
        &mut self,
        solid: &mut MockSolid,
        a: (KernelId, Vec3),
        b: (KernelId, Vec3),
        curve: &'static str,
    ) -> KernelId {
        let id = self.alloc_id();
        solid.edges.push(MockEdge {
            id,
            start: a.0,
            end: b.0,
            points: [a.1, b.1],
            curve,
        });
        id
    }

    fn add_face(
        &mut self,
        solid: &mut MockSolid,
        edges: Vec<KernelId>,
        outline: Vec<Vec3>,
        normal: Vec3,
        area: f64,
        surface_type: &'static str,
    ) -> KernelId {
        let id = self.alloc_id();
        let centroid = average(&outline);
        solid.faces.push(MockFace {
            id,
            edges,
            outline,
            normal,
            centroid,
            area,
            surface_type,
        });
        id
    }

    /// Swept prism: per loop, bottom ring, top ring and one side face per segment.
    fn build_prism(&mut self, profile: &PlanarProfile, dir: Vec3, depth: f64) -> MockSolid {
        let offset = scale(dir, depth);
        let mut solid = MockSolid::default();
        let mut bottom_edges = Vec::new();
        let mut top_edges = Vec::new();
        let mut bottom_outline = Vec::new();
        let mut top_outline = Vec::new();

        for (loop_index, lp) in std::iter::once(&profile.outer)
            .chain(profile.holes.iter())
            .enumerate()
        {
            let base: Vec<Vec3> = lp.iter().map(|&uv| profile.to_world(uv)).collect();
            let n = base.len();
            let b: Vec<_> = base
                .iter()
                .map(|&p| self.add_vertex(&mut solid, p))
                .collect();
            let t: Vec<_> = base
                .iter()
                .map(|&p| self.add_vertex(&mut solid, add(p, offset)))
                .collect();
            let be: Vec<_> = (0..n)
                .map(|i| self.add_edge(&mut solid, b[i], b[(i + 1) % n], LINE))
                .collect();
            let te: Vec<_> = (0..n)
                .map(|i| self.add_edge(&mut solid, t[i], t[(i + 1) % n], LINE))
                .collect();
            let le: Vec<_> = (0..n)
                .map(|i| self.add_edge(&mut solid, b[i], t[i], LINE))
                .collect();

            for i in 0..n {
                let j = (i + 1) % n;
                let d = sub(b[j].1, b[i].1);
                // Loops are oriented so material lies to the left of travel.
                let normal = normalize(cross(d, profile.normal));
                self.add_face(
                    &mut solid,
                    vec![be[i], le[j], te[i], le[i]],
                    vec![b[i].1, b[j].1, t[j].1, t[i].1],
                    normal,
                    length(d) * depth,
                    PLANAR,
                );
            }

            if loop_index == 0 {
                bottom_outline = b.iter().map(|v| v.1).collect();
                top_outline = t.iter().map(|v| v.1).collect();
            }
            bottom_edges.extend(be);
            top_edges.extend(te);
        }

        let cap_area = profile.area() * dot(dir, profile.normal).abs();
        self.add_face(
            &mut solid,
            bottom_edges,
            bottom_outline,
            scale(dir, -1.0),
            cap_area,
            PLANAR,
        );
        self.add_face(&mut solid, top_edges, top_outline, dir, cap_area, PLANAR);
        solid
    }

    /// Ruled loft between two outer loops. Side normals are oriented away from
    /// the loft centre, which is correct for convex sections.
    fn build_loft(&mut self, bottom: &PlanarProfile, top: &PlanarProfile) -> MockSolid {
        let bp: Vec<Vec3> = bottom.outer.iter().map(|&uv| bottom.to_world(uv)).collect();
        let tp: Vec<Vec3> = top.outer.iter().map(|&uv| top.to_world(uv)).collect();
        let n = bp.len();
        let centre = midpoint(average(&bp), average(&tp));
        let axis = normalize(sub(average(&tp), average(&bp)));

        let mut solid = MockSolid::default();
        let b: Vec<_> = bp.iter().map(|&p| self.add_vertex(&mut solid, p)).collect();
        let t: Vec<_> = tp.iter().map(|&p| self.add_vertex(&mut solid, p)).collect();
        let be: Vec<_> = (0..n)
            .map(|i| self.add_edge(&mut solid, b[i], b[(i + 1) % n], LINE))
            .collect();
        let te: Vec<_> = (0..n)
            .map(|i| self.add_edge(&mut solid, t[i], t[(i + 1) % n], LINE))
            .collect();
        let le: Vec<_> = (0..n)
            .map(|i| self.add_edge(&mut solid, b[i], t[i], LINE))
            .collect();

        for i in 0..n {
            let j = (i + 1) % n;
            let outline = vec![b[i].1, b[j].1, t[j].1, t[i].1];
            let mut normal = normalize(cross(sub(b[j].1, b[i].1), sub(t[i].1, b[i].1)));
            if dot(normal, sub(average(&outline), centre)) < 0.0 {
                normal = scale(normal, -1.0);
            }
            let area = 0.5 * length(cross(sub(t[j].1, b[i].1), sub(t[i].1, b[j].1)));
            self.add_face(&mut solid, vec![be[i], le[j], te[i], le[i]], outline, normal, area, PLANAR);
        }

        let bottom_area = steel_types::sketch::signed_area(&bottom.outer).abs();
        let top_area = steel_types::sketch::signed_area(&top.outer).abs();
        self.add_face(&mut solid, be, bp, scale(axis, -1.0), bottom_area, PLANAR);
        self.add_face(&mut solid, te, tp, axis, top_area, PLANAR);
        solid
    }

    /// Copy topology under fresh ids, mapping points and directions.
    fn copy_into(
        &mut self,
        out: &mut MockSolid,
        src: &MockSolid,
        point: &dyn Fn(Vec3) -> Vec3,
        direction: &dyn Fn(Vec3) -> Vec3,
        void: bool,
    ) {
        let mut id_map: HashMap<KernelId, KernelId> = HashMap::new();
        for v in &src.vertices {
            let id = self.alloc_id();
            id_map.insert(v.id, id);
            out.vertices.push(MockVertex {
                id,
                position: point(v.position),
                void: v.void || void,
            });
        }
        for e in &src.edges {
            let id = self.alloc_id();
            id_map.insert(e.id, id);
            out.edges.push(MockEdge {
                id,
                start: id_map.get(&e.start).copied().unwrap_or(e.start),
                end: id_map.get(&e.end).copied().unwrap_or(e.end),
                points: [point(e.points[0]), point(e.points[1])],
                curve: e.curve,
            });
        }
        for f in &src.faces {
            let id = self.alloc_id();
            out.faces.push(MockFace {
                id,
                edges: f
                    .edges
                    .iter()
                    .filter_map(|eid| id_map.get(eid).copied())
                    .collect(),
                outline: f.outline.iter().map(|&p| point(p)).collect(),
                normal: direction(f.normal),
                centroid: point(f.centroid),
                area: f.area,
                surface_type: f.surface_type,
            });
        }
    }

    fn plan_fillet(
        source: &MockSolid,
        edge_id: KernelId,
        radius: f64,
    ) -> Result<FilletPlan, KernelError> {
        let edge = source
            .edges
            .iter()
            .find(|e| e.id == edge_id)
            .ok_or_else(|| KernelError::FilletFailed {
                reason: format!("edge {:?} not found in solid", edge_id),
            })?;
        let faces: Vec<&MockFace> = source
            .faces
            .iter()
            .filter(|f| f.edges.contains(&edge_id))
            .collect();
        if faces.len() != 2 {
            return Err(KernelError::FilletFailed {
                reason: format!(
                    "edge {:?} borders {} faces, expected 2",
                    edge_id,
                    faces.len()
                ),
            });
        }

        let [start, end] = edge.points;
        let axis = normalize(sub(end, start));
        let mid = midpoint(start, end);
        let mut sides = [(faces[0].id, [0.0; 3]), (faces[1].id, [0.0; 3])];
        for (slot, face) in sides.iter_mut().zip(&faces) {
            let v = sub(face.centroid, mid);
            let v = sub(v, scale(axis, dot(v, axis)));
            let reach = length(v);
            if radius > 2.0 * reach {
                return Err(KernelError::FilletFailed {
                    reason: format!(
                        "radius {} exceeds adjacent face width {:.4}",
                        radius,
                        2.0 * reach
                    ),
                });
            }
            slot.1 = normalize(v);
        }

        Ok(FilletPlan {
            edge: edge_id,
            start,
            end,
            sides,
            normal: normalize(add(faces[0].normal, faces[1].normal)),
        })
    }

    /// Replace each edge with a cylindrical face bounded by two tangent edges
    /// and two end arcs.
    fn fillet_solid(
        &mut self,
        source: &MockSolid,
        edges: &[KernelId],
        radius: f64,
    ) -> Result<MockSolid, KernelError> {
        let mut seen = HashSet::new();
        let targets: Vec<KernelId> = edges.iter().copied().filter(|e| seen.insert(*e)).collect();
        let plans = targets
            .iter()
            .map(|&e| Self::plan_fillet(source, e, radius))
            .collect::<Result<Vec<_>, _>>()?;

        let mut id_map: HashMap<KernelId, KernelId> = HashMap::new();
        let mut out = MockSolid::default();
        for v in &source.vertices {
            let id = self.alloc_id();
            id_map.insert(v.id, id);
            out.vertices.push(MockVertex {
                id,
                position: v.position,
                void: v.void,
            });
        }
        for e in source.edges.iter().filter(|e| !seen.contains(&e.id)) {
            let id = self.alloc_id();
            id_map.insert(e.id, id);
            out.edges.push(MockEdge {
                id,
                start: id_map.get(&e.start).copied().unwrap_or(e.start),
                end: id_map.get(&e.end).copied().unwrap_or(e.end),
                points: e.points,
                curve: e.curve,
            });
        }
        let mut face_index: HashMap<KernelId, usize> = HashMap::new();
        for f in &source.faces {
            let id = self.alloc_id();
            face_index.insert(f.id, out.faces.len());
            out.faces.push(MockFace {
                id,
                edges: f
                    .edges
                    .iter()
                    .filter_map(|eid| id_map.get(eid).copied())
                    .collect(),
                outline: f.outline.clone(),
                normal: f.normal,
                centroid: f.centroid,
                area: f.area,
                surface_type: f.surface_type,
            });
        }

        for plan in &plans {
            let [(face_a, dir_a), (face_b, dir_b)] = plan.sides;
            let a0 = self.add_vertex(&mut out, add(plan.start, scale(dir_a, radius)));
            let a1 = self.add_vertex(&mut out, add(plan.end, scale(dir_a, radius)));
            let c0 = self.add_vertex(&mut out, add(plan.start, scale(dir_b, radius)));
            let c1 = self.add_vertex(&mut out, add(plan.end, scale(dir_b, radius)));
            let ta = self.add_edge(&mut out, a0, a1, TANGENT);
            let tb = self.add_edge(&mut out, c0, c1, TANGENT);
            let arc_start = self.add_edge(&mut out, a0, c0, ARC);
            let arc_end = self.add_edge(&mut out, a1, c1, ARC);
            let edge_len = length(sub(plan.end, plan.start));
            self.add_face(
                &mut out,
                vec![ta, arc_end, tb, arc_start],
                vec![a0.1, a1.1, c1.1, c0.1],
                plan.normal,
                edge_len * radius * std::f64::consts::FRAC_PI_2,
                CYLINDRICAL,
            );
            for (face, tangent) in [(face_a, ta), (face_b, tb)] {
                if let Some(&i) = face_index.get(&face) {
                    out.faces[i].edges.push(tangent);
                }
            }
            tracing::trace!(edge = ?plan.edge, radius, "mock fillet edge");
        }
        Ok(out)
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn average(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return [0.0; 3];
    }
    let sum = points.iter().fold([0.0; 3], |acc, &p| add(acc, p));
    scale(sum, 1.0 / points.len() as f64)
}

fn bbox_of(solid: &MockSolid) -> Option<BoundingBox> {
    BoundingBox::from_points(
        solid
            .vertices
            .iter()
            .filter(|v| !v.void)
            .map(|v| v.position),
    )
}

fn validate_profile(profile: &PlanarProfile) -> Result<(), KernelError> {
    if profile.outer.len() < 3 {
        return Err(KernelError::InvalidProfile {
            reason: format!("outer loop has {} points, need at least 3", profile.outer.len()),
        });
    }
    if profile.holes.iter().any(|h| h.len() < 3) {
        return Err(KernelError::InvalidProfile {
            reason: "hole loop has fewer than 3 points".to_string(),
        });
    }
    if profile.area() <= 0.0 {
        return Err(KernelError::InvalidProfile {
            reason: format!("profile encloses no area ({})", profile.area()),
        });
    }
    Ok(())
}

impl Kernel for MockKernel {
    fn extrude_profile(
        &mut self,
        profile: &PlanarProfile,
        direction: [f64; 3],
        depth: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.check(MockOp::Extrude)?;
        validate_profile(profile)?;
        if length(direction) < 1e-12 {
            return Err(KernelError::Other {
                message: "extrude direction has zero length".to_string(),
            });
        }
        if depth <= 0.0 {
            return Err(KernelError::Other {
                message: format!("extrude depth must be positive, got {}", depth),
            });
        }
        let solid = self.build_prism(profile, normalize(direction), depth);
        Ok(self.store(solid))
    }

    fn loft_profiles(
        &mut self,
        bottom: &PlanarProfile,
        top: &PlanarProfile,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.check(MockOp::Loft)?;
        validate_profile(bottom)?;
        validate_profile(top)?;
        if bottom.outer.len() != top.outer.len() {
            return Err(KernelError::LoftFailed {
                reason: format!(
                    "loop sizes differ: {} vs {}",
                    bottom.outer.len(),
                    top.outer.len()
                ),
            });
        }
        if length(sub(top.origin, bottom.origin)) < 1e-9 {
            return Err(KernelError::LoftFailed {
                reason: "profiles are coplanar".to_string(),
            });
        }
        let solid = self.build_loft(bottom, top);
        Ok(self.store(solid))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.check(MockOp::Union)?;
        let solid_a = self.get(a)?.clone();
        let solid_b = self.get(b)?.clone();

        let mut merged = MockSolid::default();
        self.copy_into(&mut merged, &solid_a, &|p| p, &|n| n, false);
        self.copy_into(&mut merged, &solid_b, &|p| p, &|n| n, false);
        Ok(self.store(merged))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.check(MockOp::Subtract)?;
        let solid_a = self.get(a)?.clone();
        let solid_b = self.get(b)?.clone();

        let mut result = MockSolid::default();
        self.copy_into(&mut result, &solid_a, &|p| p, &|n| n, false);
        let overlaps = match (bbox_of(&solid_a), bbox_of(&solid_b)) {
            (Some(ba), Some(bb)) => ba.overlaps(&bb, 0.0),
            _ => false,
        };
        if overlaps {
            // The tool's boundary becomes the wall of the void.
            self.copy_into(&mut result, &solid_b, &|p| p, &|n| scale(n, -1.0), true);
        }
        Ok(self.store(result))
    }

    fn fillet_edges(
        &mut self,
        solid: &KernelSolidHandle,
        edges: &[KernelId],
        radius: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.check(MockOp::Fillet)?;
        if radius <= 0.0 {
            return Err(KernelError::FilletFailed {
                reason: "radius must be positive".to_string(),
            });
        }
        if edges.is_empty() {
            return Err(KernelError::FilletFailed {
                reason: "no edges selected".to_string(),
            });
        }
        let source = self.get(solid)?.clone();
        let result = self.fillet_solid(&source, edges, radius)?;
        Ok(self.store(result))
    }

    fn transform_solid(
        &mut self,
        solid: &KernelSolidHandle,
        placement: &Placement,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.check(MockOp::Transform)?;
        let source = self.get(solid)?.clone();
        let mut moved = MockSolid::default();
        self.copy_into(
            &mut moved,
            &source,
            &|p| placement.apply_point(p),
            &|n| placement.apply_vector(n),
            false,
        );
        Ok(self.store(moved))
    }
}

impl KernelIntrospect for MockKernel {
    fn list_faces(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        self.solids
            .get(&solid.id())
            .map(|s| s.faces.iter().map(|f| f.id).collect())
            .unwrap_or_default()
    }

    fn list_edges(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        self.solids
            .get(&solid.id())
            .map(|s| s.edges.iter().map(|e| e.id).collect())
            .unwrap_or_default()
    }

    fn list_vertices(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        self.solids
            .get(&solid.id())
            .map(|s| s.vertices.iter().map(|v| v.id).collect())
            .unwrap_or_default()
    }

    fn face_edges(&self, face: KernelId) -> Vec<KernelId> {
        self.owning_solid(face)
            .and_then(|s| s.faces.iter().find(|f| f.id == face))
            .map(|f| f.edges.clone())
            .unwrap_or_default()
    }

    fn edge_faces(&self, edge: KernelId) -> Vec<KernelId> {
        self.owning_solid(edge)
            .map(|s| {
                s.faces
                    .iter()
                    .filter(|f| f.edges.contains(&edge))
                    .map(|f| f.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature {
        let Some(solid) = self.owning_solid(entity) else {
            return TopoSignature::empty();
        };
        match kind {
            TopoKind::Face => solid
                .faces
                .iter()
                .find(|f| f.id == entity)
                .map(|f| TopoSignature {
                    surface_type: Some(f.surface_type.to_string()),
                    area: Some(f.area),
                    centroid: Some(f.centroid),
                    normal: Some(f.normal),
                    bbox: BoundingBox::from_points(f.outline.iter().copied())
                        .map(|b| b.to_array()),
                    length: None,
                }),
            TopoKind::Edge => solid.edges.iter().find(|e| e.id == entity).map(|e| {
                let [a, b] = e.points;
                TopoSignature {
                    surface_type: Some(e.curve.to_string()),
                    area: None,
                    centroid: Some(midpoint(a, b)),
                    normal: None,
                    bbox: BoundingBox::from_points([a, b]).map(|bb| bb.to_array()),
                    length: Some(length(sub(b, a))),
                }
            }),
            TopoKind::Vertex => solid
                .vertices
                .iter()
                .find(|v| v.id == entity)
                .map(|v| TopoSignature {
                    surface_type: Some("point".to_string()),
                    area: None,
                    centroid: Some(v.position),
                    normal: None,
                    bbox: Some([
                        v.position[0],
                        v.position[1],
                        v.position[2],
                        v.position[0],
                        v.position[1],
                        v.position[2],
                    ]),
                    length: None,
                }),
        }
        .unwrap_or_else(TopoSignature::empty)
    }

    fn bounding_box(&self, solid: &KernelSolidHandle) -> Option<BoundingBox> {
        self.solids.get(&solid.id()).and_then(bbox_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use steel_types::sketch::{circle_loop, rect_loop};
    use steel_types::Rotation;

    fn make_box(kernel: &mut MockKernel, w: f64, h: f64, d: f64) -> KernelSolidHandle {
        let profile = PlanarProfile::xy(0.0, rect_loop(w / 2.0, h / 2.0, w, h));
        kernel.extrude_profile(&profile, [0.0, 0.0, 1.0], d).unwrap()
    }

    fn sharp_edge_count(kernel: &MockKernel, solid: &KernelSolidHandle) -> usize {
        kernel
            .compute_all_signatures(solid, TopoKind::Edge)
            .iter()
            .filter(|(_, s)| s.is_sharp_edge())
            .count()
    }

    #[test]
    fn test_extrude_rect_produces_box_topology() {
        let mut kernel = MockKernel::new();
        let handle = make_box(&mut kernel, 2.0, 3.0, 5.0);

        assert_eq!(kernel.list_vertices(&handle).len(), 8, "Box should have 8 vertices");
        assert_eq!(kernel.list_edges(&handle).len(), 12, "Box should have 12 edges");
        assert_eq!(kernel.list_faces(&handle).len(), 6, "Box should have 6 faces");

        let bb = kernel.bounding_box(&handle).unwrap();
        assert_eq!(bb.min, [0.0, 0.0, 0.0]);
        assert_eq!(bb.max, [2.0, 3.0, 5.0]);
    }

    #[test]
    fn test_euler_formula_box() {
        let mut kernel = MockKernel::new();
        let handle = make_box(&mut kernel, 1.0, 1.0, 1.0);

        let v = kernel.list_vertices(&handle).len() as i64;
        let e = kernel.list_edges(&handle).len() as i64;
        let f = kernel.list_faces(&handle).len() as i64;

        // Euler's formula for genus-0: V - E + F = 2
        assert_eq!(v - e + f, 2, "Euler formula V-E+F=2 must hold for a box");
    }

    #[test]
    fn test_deterministic_ids() {
        let mut k1 = MockKernel::new();
        let mut k2 = MockKernel::new();
        let h1 = make_box(&mut k1, 1.0, 2.0, 3.0);
        let h2 = make_box(&mut k2, 1.0, 2.0, 3.0);

        assert_eq!(k1.list_faces(&h1), k2.list_faces(&h2));
        assert_eq!(k1.list_edges(&h1), k2.list_edges(&h2));
    }

    #[test]
    fn test_box_face_normals_point_outward() {
        let mut kernel = MockKernel::new();
        let handle = make_box(&mut kernel, 2.0, 2.0, 2.0);
        let centre = [1.0, 1.0, 1.0];
        for (_, sig) in kernel.compute_all_signatures(&handle, TopoKind::Face) {
            let n = sig.normal.unwrap();
            let c = sig.centroid.unwrap();
            assert!(dot(n, sub(c, centre)) > 0.0, "normal {:?} at {:?}", n, c);
            assert_relative_eq!(sig.area.unwrap(), 4.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_face_edges_returns_4_edges_per_box_face() {
        let mut kernel = MockKernel::new();
        let handle = make_box(&mut kernel, 1.0, 1.0, 1.0);
        for face in kernel.list_faces(&handle) {
            assert_eq!(kernel.face_edges(face).len(), 4);
        }
    }

    #[test]
    fn test_edge_faces_each_edge_has_two_faces() {
        let mut kernel = MockKernel::new();
        let handle = make_box(&mut kernel, 1.0, 1.0, 1.0);
        for edge in kernel.list_edges(&handle) {
            assert_eq!(kernel.edge_faces(edge).len(), 2, "edge {:?}", edge);
        }
    }

    #[test]
    fn test_extrude_with_hole_normals_face_into_void() {
        let mut kernel = MockKernel::new();
        let profile = PlanarProfile::xy(0.0, rect_loop(0.0, 0.0, 4.0, 4.0))
            .with_hole(rect_loop(0.0, 0.0, 2.0, 2.0));
        let handle = kernel.extrude_profile(&profile, [0.0, 0.0, 1.0], 3.0).unwrap();

        assert_eq!(kernel.list_faces(&handle).len(), 4 + 4 + 2);
        for (_, sig) in kernel.compute_all_signatures(&handle, TopoKind::Face) {
            let c = sig.centroid.unwrap();
            let n = sig.normal.unwrap();
            if c[0].abs() < 1.01 && c[1].abs() < 1.01 && n[2] == 0.0 {
                // inner wall: normal points toward the axis
                assert!(dot(n, [c[0], c[1], 0.0]) < 0.0);
            }
        }
    }

    #[test]
    fn test_loft_square_frustum() {
        let mut kernel = MockKernel::new();
        let bottom = PlanarProfile::with_axes([0.0; 3], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0], rect_loop(0.0, 0.0, 4.0, 4.0));
        let top = PlanarProfile::with_axes([0.0, 3.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0], rect_loop(0.0, 0.0, 2.0, 2.0));
        let handle = kernel.loft_profiles(&bottom, &top).unwrap();

        assert_eq!(kernel.list_vertices(&handle).len(), 8);
        assert_eq!(kernel.list_edges(&handle).len(), 12);
        assert_eq!(kernel.list_faces(&handle).len(), 6);
        let bb = kernel.bounding_box(&handle).unwrap();
        assert_relative_eq!(bb.min[1], 0.0);
        assert_relative_eq!(bb.max[1], 3.0);
        assert_relative_eq!(bb.extent(steel_types::Axis::X), 4.0);

        for (_, sig) in kernel.compute_all_signatures(&handle, TopoKind::Face) {
            let n = sig.normal.unwrap();
            let c = sig.centroid.unwrap();
            assert!(dot(n, sub(c, [0.0, 1.5, 0.0])) > 0.0);
        }
    }

    #[test]
    fn test_loft_rejects_mismatched_loops() {
        let mut kernel = MockKernel::new();
        let bottom = PlanarProfile::xy(0.0, rect_loop(0.0, 0.0, 1.0, 1.0));
        let top = PlanarProfile::xy(1.0, circle_loop(0.0, 0.0, 0.5));
        let err = kernel.loft_profiles(&bottom, &top).unwrap_err();
        assert!(matches!(err, KernelError::LoftFailed { .. }));
    }

    #[test]
    fn test_degenerate_profile_rejected() {
        let mut kernel = MockKernel::new();
        let flat = PlanarProfile::xy(0.0, vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
        let err = kernel.extrude_profile(&flat, [0.0, 0.0, 1.0], 1.0).unwrap_err();
        assert!(matches!(err, KernelError::InvalidProfile { .. }));
    }

    #[test]
    fn test_boolean_union_combines_topology() {
        let mut kernel = MockKernel::new();
        let a = make_box(&mut kernel, 1.0, 1.0, 1.0);
        let b = make_box(&mut kernel, 2.0, 2.0, 2.0);
        let u = kernel.boolean_union(&a, &b).unwrap();

        assert_eq!(kernel.list_faces(&u).len(), 12);
        assert_eq!(kernel.bounding_box(&u).unwrap().max, [2.0, 2.0, 2.0]);
        // inputs untouched
        assert_eq!(kernel.list_faces(&a).len(), 6);
    }

    #[test]
    fn test_subtract_overlapping_tool_adds_void_faces() {
        let mut kernel = MockKernel::new();
        let a = make_box(&mut kernel, 4.0, 4.0, 4.0);
        let tool_profile = PlanarProfile::xy(-1.0, circle_loop(2.0, 2.0, 0.5));
        let tool = kernel.extrude_profile(&tool_profile, [0.0, 0.0, 1.0], 6.0).unwrap();
        let r = kernel.boolean_subtract(&a, &tool).unwrap();

        assert!(kernel.list_faces(&r).len() > 6);
        // the void does not grow the envelope beyond the body
        let bb = kernel.bounding_box(&r).unwrap();
        assert_eq!(bb.min, [0.0, 0.0, 0.0]);
        assert_eq!(bb.max, [4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_subtract_disjoint_tool_is_a_copy() {
        let mut kernel = MockKernel::new();
        let a = make_box(&mut kernel, 1.0, 1.0, 1.0);
        let far = PlanarProfile::xy(10.0, rect_loop(0.0, 0.0, 1.0, 1.0));
        let tool = kernel.extrude_profile(&far, [0.0, 0.0, 1.0], 1.0).unwrap();
        let r = kernel.boolean_subtract(&a, &tool).unwrap();

        assert_eq!(kernel.list_faces(&r).len(), 6);
        assert_ne!(kernel.list_faces(&r), kernel.list_faces(&a));
    }

    #[test]
    fn test_fillet_single_edge() {
        let mut kernel = MockKernel::new();
        let handle = make_box(&mut kernel, 2.0, 2.0, 4.0);
        let edges = kernel.list_edges(&handle);
        let before_sharp = sharp_edge_count(&kernel, &handle);

        let filleted = kernel.fillet_edges(&handle, &[edges[8]], 0.2).unwrap();

        // V+4, E-1+4, F+1
        assert_eq!(kernel.list_vertices(&filleted).len(), 12);
        assert_eq!(kernel.list_edges(&filleted).len(), 15);
        assert_eq!(kernel.list_faces(&filleted).len(), 7);
        assert_eq!(sharp_edge_count(&kernel, &filleted), before_sharp - 1);

        let cylindrical = kernel
            .compute_all_signatures(&filleted, TopoKind::Face)
            .into_iter()
            .filter(|(_, s)| s.surface_type.as_deref() == Some("cylindrical"))
            .count();
        assert_eq!(cylindrical, 1);
    }

    #[test]
    fn test_fillet_multiple_edges() {
        let mut kernel = MockKernel::new();
        let handle = make_box(&mut kernel, 2.0, 2.0, 4.0);
        let edges = kernel.list_edges(&handle);
        let filleted = kernel.fillet_edges(&handle, &edges[8..12], 0.2).unwrap();

        assert_eq!(kernel.list_faces(&filleted).len(), 10);
        assert_eq!(sharp_edge_count(&kernel, &filleted), 8);
    }

    #[test]
    fn test_fillet_invalid_radius() {
        let mut kernel = MockKernel::new();
        let handle = make_box(&mut kernel, 1.0, 1.0, 1.0);
        let edges = kernel.list_edges(&handle);
        assert!(kernel.fillet_edges(&handle, &[edges[0]], 0.0).is_err());
        // wider than the adjacent 1x1 faces
        assert!(kernel.fillet_edges(&handle, &[edges[0]], 1.5).is_err());
    }

    #[test]
    fn test_fillet_invalid_edge() {
        let mut kernel = MockKernel::new();
        let handle = make_box(&mut kernel, 1.0, 1.0, 1.0);
        let err = kernel
            .fillet_edges(&handle, &[KernelId(99999)], 0.1)
            .unwrap_err();
        assert!(matches!(err, KernelError::FilletFailed { .. }));
    }

    #[test]
    fn test_transform_moves_bounding_box() {
        let mut kernel = MockKernel::new();
        let handle = make_box(&mut kernel, 2.0, 4.0, 10.0);
        let placement = Placement::new([5.0, 0.0, 0.0], Rotation::about_x(-90.0));
        let moved = kernel.transform_solid(&handle, &placement).unwrap();

        let bb = kernel.bounding_box(&moved).unwrap();
        assert_eq!(bb.min, [5.0, 0.0, -4.0]);
        assert_eq!(bb.max, [7.0, 10.0, 0.0]);
        // original unchanged
        assert_eq!(kernel.bounding_box(&handle).unwrap().max, [2.0, 4.0, 10.0]);
    }

    #[test]
    fn test_injected_failure() {
        let mut kernel = MockKernel::new();
        let handle = make_box(&mut kernel, 1.0, 1.0, 1.0);
        let edges = kernel.list_edges(&handle);
        kernel.fail_on(MockOp::Fillet);
        assert!(kernel.fillet_edges(&handle, &[edges[0]], 0.1).is_err());
        kernel.clear_failures();
        assert!(kernel.fillet_edges(&handle, &[edges[0]], 0.1).is_ok());
    }

    #[test]
    fn test_edge_signature_reports_bbox_and_length() {
        let mut kernel = MockKernel::new();
        let handle = make_box(&mut kernel, 1.0, 1.0, 7.0);
        let longest = kernel
            .compute_all_signatures(&handle, TopoKind::Edge)
            .into_iter()
            .map(|(_, s)| s)
            .filter(|s| s.length == Some(7.0))
            .collect::<Vec<_>>();
        assert_eq!(longest.len(), 4);
        let bb = BoundingBox::from_array(longest[0].bbox.unwrap());
        assert_relative_eq!(bb.extent(steel_types::Axis::Z), 7.0);
        assert_relative_eq!(bb.extent(steel_types::Axis::X), 0.0);
    }
}
