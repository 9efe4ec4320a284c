//! KernelIntrospect for TruckKernel.
//!
//! Truck entities carry no stable integer ids, so ids are derived from the
//! owning handle and the entity's position in the shell iteration order:
//! faces `handle*10000 + i`, edges `+1000 + i`, vertices `+2000 + i`.

use std::collections::HashSet;

use crate::traits::KernelIntrospect;
use crate::truck_kernel::TruckKernel;
use crate::types::*;

use truck_modeling::geometry::{Curve, Surface};
use truck_modeling::topology::{Edge, Face, Shell, Solid, Vertex};

const FACE_BASE: u64 = 0;
const EDGE_BASE: u64 = 1000;
const VERTEX_BASE: u64 = 2000;

fn entity_id(handle: u64, base: u64, idx: usize) -> KernelId {
    KernelId(handle * 10000 + base + idx as u64)
}

fn split_id(id: KernelId, base: u64) -> (KernelSolidHandle, usize) {
    (
        KernelSolidHandle(id.0 / 10000),
        (id.0 % 10000).saturating_sub(base) as usize,
    )
}

fn unique_edges(shell: &Shell) -> Vec<Edge> {
    let mut seen = HashSet::new();
    shell.edge_iter().filter(|e| seen.insert(e.id())).collect()
}

fn unique_vertices(shell: &Shell) -> Vec<Vertex> {
    let mut seen = HashSet::new();
    shell.vertex_iter().filter(|v| seen.insert(v.id())).collect()
}

fn first_shell(solid: &Solid) -> Option<&Shell> {
    solid.boundaries().first()
}

fn to_arr(p: truck_modeling::Point3) -> [f64; 3] {
    [p[0], p[1], p[2]]
}

impl TruckKernel {
    fn shell_of(&self, handle: &KernelSolidHandle) -> Option<&Shell> {
        self.get_solid(handle).and_then(first_shell)
    }
}

impl KernelIntrospect for TruckKernel {
    fn list_faces(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        self.shell_of(solid)
            .map(|shell| {
                (0..shell.face_iter().count())
                    .map(|i| entity_id(solid.id(), FACE_BASE, i))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn list_edges(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        self.shell_of(solid)
            .map(|shell| {
                (0..unique_edges(shell).len())
                    .map(|i| entity_id(solid.id(), EDGE_BASE, i))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn list_vertices(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        self.shell_of(solid)
            .map(|shell| {
                (0..unique_vertices(shell).len())
                    .map(|i| entity_id(solid.id(), VERTEX_BASE, i))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn face_edges(&self, face: KernelId) -> Vec<KernelId> {
        let (handle, idx) = split_id(face, FACE_BASE);
        let Some(shell) = self.shell_of(&handle) else {
            return Vec::new();
        };
        let Some(target) = shell.face_iter().nth(idx) else {
            return Vec::new();
        };
        let edges = unique_edges(shell);
        target
            .boundaries()
            .iter()
            .flat_map(|w| w.edge_iter())
            .filter_map(|e| edges.iter().position(|u| u.id() == e.id()))
            .map(|i| entity_id(handle.id(), EDGE_BASE, i))
            .collect()
    }

    fn edge_faces(&self, edge: KernelId) -> Vec<KernelId> {
        let (handle, idx) = split_id(edge, EDGE_BASE);
        let Some(shell) = self.shell_of(&handle) else {
            return Vec::new();
        };
        let Some(target) = unique_edges(shell).get(idx).map(|e| e.id()) else {
            return Vec::new();
        };
        shell
            .face_iter()
            .enumerate()
            .filter(|(_, f)| {
                f.boundaries()
                    .iter()
                    .flat_map(|w| w.edge_iter())
                    .any(|e| e.id() == target)
            })
            .map(|(i, _)| entity_id(handle.id(), FACE_BASE, i))
            .collect()
    }

    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature {
        let sig = match kind {
            TopoKind::Face => {
                let (handle, idx) = split_id(entity, FACE_BASE);
                self.shell_of(&handle)
                    .and_then(|s| s.face_iter().nth(idx).map(face_signature))
            }
            TopoKind::Edge => {
                let (handle, idx) = split_id(entity, EDGE_BASE);
                self.shell_of(&handle)
                    .and_then(|s| unique_edges(s).get(idx).map(edge_signature))
            }
            TopoKind::Vertex => {
                let (handle, idx) = split_id(entity, VERTEX_BASE);
                self.shell_of(&handle)
                    .and_then(|s| unique_vertices(s).get(idx).map(vertex_signature))
            }
        };
        sig.unwrap_or_else(TopoSignature::empty)
    }

    fn bounding_box(&self, solid: &KernelSolidHandle) -> Option<BoundingBox> {
        let shell = self.shell_of(solid)?;
        BoundingBox::from_points(unique_vertices(shell).iter().map(|v| to_arr(v.point())))
    }
}

fn face_signature(face: &Face) -> TopoSignature {
    let points: Vec<[f64; 3]> = face
        .boundaries()
        .iter()
        .flat_map(|w| w.vertex_iter())
        .map(|v| to_arr(v.point()))
        .collect();
    let bbox = BoundingBox::from_points(points.iter().copied());
    let centroid = (!points.is_empty()).then(|| {
        let n = points.len() as f64;
        let sum = points.iter().fold([0.0; 3], |acc, p| {
            [acc[0] + p[0], acc[1] + p[1], acc[2] + p[2]]
        });
        [sum[0] / n, sum[1] / n, sum[2] / n]
    });

    let surface = face.oriented_surface();
    let (surface_type, normal) = match &surface {
        Surface::Plane(plane) => {
            let n = plane.normal();
            ("planar", Some([n[0], n[1], n[2]]))
        }
        Surface::RevolutedCurve(_) => ("revolved", None),
        Surface::BSplineSurface(_) | Surface::NurbsSurface(_) => ("nurbs", None),
    };

    TopoSignature {
        surface_type: Some(surface_type.to_string()),
        area: None,
        centroid,
        normal,
        bbox: bbox.map(|b| b.to_array()),
        length: None,
    }
}

fn edge_signature(edge: &Edge) -> TopoSignature {
    let front = to_arr(edge.front().point());
    let back = to_arr(edge.back().point());
    let curve = match edge.oriented_curve() {
        Curve::Line(_) => "line",
        _ => "curve",
    };
    let d = [back[0] - front[0], back[1] - front[1], back[2] - front[2]];

    TopoSignature {
        surface_type: Some(curve.to_string()),
        area: None,
        centroid: Some([
            (front[0] + back[0]) / 2.0,
            (front[1] + back[1]) / 2.0,
            (front[2] + back[2]) / 2.0,
        ]),
        normal: None,
        bbox: BoundingBox::from_points([front, back]).map(|b| b.to_array()),
        length: Some((d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()),
    }
}

fn vertex_signature(vertex: &Vertex) -> TopoSignature {
    let p = to_arr(vertex.point());
    TopoSignature {
        surface_type: Some("point".to_string()),
        area: None,
        centroid: Some(p),
        normal: None,
        bbox: Some([p[0], p[1], p[2], p[0], p[1], p[2]]),
        length: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Kernel;
    use steel_types::sketch::rect_loop;

    fn make_box(kernel: &mut TruckKernel, w: f64, h: f64, d: f64) -> KernelSolidHandle {
        let profile = PlanarProfile::xy(0.0, rect_loop(w / 2.0, h / 2.0, w, h));
        kernel.extrude_profile(&profile, [0.0, 0.0, 1.0], d).unwrap()
    }

    #[test]
    fn test_introspect_box_counts() {
        let mut kernel = TruckKernel::new();
        let handle = make_box(&mut kernel, 2.0, 3.0, 4.0);

        assert_eq!(kernel.list_faces(&handle).len(), 6, "Box should have 6 faces");
        assert_eq!(kernel.list_edges(&handle).len(), 12, "Box should have 12 edges");
        assert_eq!(kernel.list_vertices(&handle).len(), 8, "Box should have 8 vertices");
    }

    #[test]
    fn test_introspect_face_edges_box() {
        let mut kernel = TruckKernel::new();
        let handle = make_box(&mut kernel, 1.0, 1.0, 1.0);
        for face in kernel.list_faces(&handle) {
            assert_eq!(kernel.face_edges(face).len(), 4, "Each box face should have 4 edges");
        }
    }

    #[test]
    fn test_introspect_face_signature() {
        let mut kernel = TruckKernel::new();
        let handle = make_box(&mut kernel, 1.0, 1.0, 1.0);
        for face in kernel.list_faces(&handle) {
            let sig = kernel.compute_signature(face, TopoKind::Face);
            assert_eq!(sig.surface_type.as_deref(), Some("planar"));
            assert!(sig.centroid.is_some());
            assert!(sig.normal.is_some());
        }
    }

    #[test]
    fn test_introspect_bounding_box() {
        let mut kernel = TruckKernel::new();
        let handle = make_box(&mut kernel, 2.0, 3.0, 4.0);
        let bb = kernel.bounding_box(&handle).unwrap();
        assert_eq!(bb.max, [2.0, 3.0, 4.0]);
    }
}
