//! TruckKernel — real geometry kernel wrapping truck's API.

use crate::traits::Kernel;
use crate::types::*;
use std::collections::HashMap;

// Import truck types selectively to avoid shadowing std::result::Result
use truck_modeling::builder;
use truck_modeling::topology::{Edge, Face, Shell, Solid, Wire};
use truck_modeling::{InnerSpace, Matrix4, Point3, Vector3};

/// Tolerance handed to truck's boolean operations.
const BOOLEAN_TOLERANCE: f64 = 0.05;

/// Real geometry kernel backed by the truck BREP library.
pub struct TruckKernel {
    next_handle: u64,
    solids: HashMap<u64, Solid>,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
        }
    }

    fn alloc_handle(&mut self) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    pub(crate) fn store_solid(&mut self, solid: Solid) -> KernelSolidHandle {
        let handle = self.alloc_handle();
        self.solids.insert(handle.id(), solid);
        handle
    }

    pub(crate) fn get_solid(&self, handle: &KernelSolidHandle) -> Option<&Solid> {
        self.solids.get(&handle.id())
    }

    fn cloned(&self, handle: &KernelSolidHandle) -> Result<Solid, KernelError> {
        self.solids
            .get(&handle.id())
            .cloned()
            .ok_or(KernelError::EntityNotFound {
                id: KernelId(handle.id()),
            })
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

/// Closed polyline wire through the given points, with shared vertices.
fn polyline_wire(pts: &[Point3]) -> Wire {
    let n = pts.len();
    let vertices: Vec<_> = pts.iter().map(|&p| builder::vertex(p)).collect();
    let edges: Vec<Edge> = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            Edge::new(
                &vertices[i],
                &vertices[j],
                truck_modeling::geometry::Curve::Line(truck_modeling::geometry::Line(
                    pts[i], pts[j],
                )),
            )
        })
        .collect();
    Wire::from_iter(edges)
}

fn loop_points(profile: &PlanarProfile, pts: &[[f64; 2]]) -> Vec<Point3> {
    pts.iter()
        .map(|&uv| {
            let p = profile.to_world(uv);
            Point3::new(p[0], p[1], p[2])
        })
        .collect()
}

fn planar_face(profile: &PlanarProfile) -> Result<Face, KernelError> {
    if profile.outer.len() < 3 {
        return Err(KernelError::InvalidProfile {
            reason: "Profile has fewer than 3 points".to_string(),
        });
    }
    let mut wires = vec![polyline_wire(&loop_points(profile, &profile.outer))];
    for hole in &profile.holes {
        wires.push(polyline_wire(&loop_points(profile, hole)));
    }
    builder::try_attach_plane(&wires).map_err(|e| KernelError::InvalidProfile {
        reason: format!("Failed to create planar face: {}", e),
    })
}

fn placement_matrix(placement: &Placement) -> Matrix4 {
    let m = placement.rotation.matrix;
    let t = placement.position;
    // cgmath constructors take columns in order.
    Matrix4::new(
        m[0][0], m[1][0], m[2][0], 0.0, //
        m[0][1], m[1][1], m[2][1], 0.0, //
        m[0][2], m[1][2], m[2][2], 0.0, //
        t[0], t[1], t[2], 1.0,
    )
}

impl Kernel for TruckKernel {
    fn extrude_profile(
        &mut self,
        profile: &PlanarProfile,
        direction: [f64; 3],
        depth: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let dir = Vector3::new(direction[0], direction[1], direction[2]);
        if dir.magnitude() < 1e-12 {
            return Err(KernelError::Other {
                message: "extrude direction has zero length".to_string(),
            });
        }
        let face = planar_face(profile)?;
        let solid = builder::tsweep(&face, dir.normalize() * depth);
        Ok(self.store_solid(solid))
    }

    fn loft_profiles(
        &mut self,
        bottom: &PlanarProfile,
        top: &PlanarProfile,
    ) -> Result<KernelSolidHandle, KernelError> {
        if bottom.outer.len() != top.outer.len() {
            return Err(KernelError::LoftFailed {
                reason: format!(
                    "loop sizes differ: {} vs {}",
                    bottom.outer.len(),
                    top.outer.len()
                ),
            });
        }
        let wire0 = polyline_wire(&loop_points(bottom, &bottom.outer));
        let wire1 = polyline_wire(&loop_points(top, &top.outer));
        let sides: Shell = builder::try_wire_homotopy(&wire0, &wire1).map_err(|e| {
            KernelError::LoftFailed {
                reason: format!("wire homotopy failed: {}", e),
            }
        })?;
        let cap0 = builder::try_attach_plane(&[wire0]).map_err(|e| KernelError::LoftFailed {
            reason: format!("bottom cap: {}", e),
        })?;
        let cap1 = builder::try_attach_plane(&[wire1]).map_err(|e| KernelError::LoftFailed {
            reason: format!("top cap: {}", e),
        })?;

        let mut shell: Shell = sides;
        shell.push(cap0.inverse());
        shell.push(cap1);
        let solid = Solid::try_new(vec![shell]).map_err(|e| KernelError::LoftFailed {
            reason: format!("loft shell is not closed: {}", e),
        })?;
        Ok(self.store_solid(solid))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid_a = self.cloned(a)?;
        let solid_b = self.cloned(b)?;

        let result = truck_shapeops::or(&solid_a, &solid_b, BOOLEAN_TOLERANCE).ok_or_else(|| {
            KernelError::BooleanFailed {
                reason: "truck or() returned None".to_string(),
            }
        })?;
        Ok(self.store_solid(result))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid_a = self.cloned(a)?;
        let mut solid_b = self.cloned(b)?;

        // Subtraction = A ∩ ¬B. not() mutates in place.
        solid_b.not();
        let result = truck_shapeops::and(&solid_a, &solid_b, BOOLEAN_TOLERANCE).ok_or_else(|| {
            KernelError::BooleanFailed {
                reason: "truck and() returned None for subtraction".to_string(),
            }
        })?;
        Ok(self.store_solid(result))
    }

    fn fillet_edges(
        &mut self,
        _solid: &KernelSolidHandle,
        _edges: &[KernelId],
        _radius: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        Err(KernelError::NotSupported {
            operation: "fillet_edges".to_string(),
        })
    }

    fn transform_solid(
        &mut self,
        solid: &KernelSolidHandle,
        placement: &Placement,
    ) -> Result<KernelSolidHandle, KernelError> {
        let source = self.cloned(solid)?;
        let moved = builder::transformed(&source, placement_matrix(placement));
        Ok(self.store_solid(moved))
    }
}
