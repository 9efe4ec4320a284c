use serde::{Deserialize, Serialize};

/// The kind of topological entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TopoKind {
    Vertex,
    Edge,
    Face,
}

/// Geometric signature of a topological entity, as reported by the kernel.
/// Feature classification works entirely from these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopoSignature {
    /// Surface type for faces (planar, cylindrical, ...) or curve type for
    /// edges (line for sharp edges, tangent for fillet boundaries).
    pub surface_type: Option<String>,
    /// Surface area (for faces).
    pub area: Option<f64>,
    /// Centroid position [x, y, z].
    pub centroid: Option<[f64; 3]>,
    /// Outward-pointing normal at centroid (for faces).
    pub normal: Option<[f64; 3]>,
    /// Axis-aligned bounding box [min_x, min_y, min_z, max_x, max_y, max_z].
    pub bbox: Option<[f64; 6]>,
    /// Edge length (for edges).
    pub length: Option<f64>,
}

impl TopoSignature {
    pub fn empty() -> Self {
        Self {
            surface_type: None,
            area: None,
            centroid: None,
            normal: None,
            bbox: None,
            length: None,
        }
    }

    /// True for an edge left sharp by the last operation.
    pub fn is_sharp_edge(&self) -> bool {
        self.surface_type.as_deref() == Some("line")
    }
}
