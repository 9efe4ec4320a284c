use serde::{Deserialize, Serialize};

use crate::geom::{add, cross, normalize, scale, tangent_x_from_normal, Vec3};

/// Segments used when a circle or arc is approximated by a polygon.
pub const CIRCLE_SEGMENTS: usize = 32;
/// Segments per quarter-circle corner of a rounded rectangle.
pub const CORNER_SEGMENTS: usize = 4;

/// A closed planar region: one outer loop and any number of hole loops,
/// given as 2-D polygon vertices in the plane's (x, y) frame.
///
/// Loops are normalised on construction: the outer loop runs
/// counter-clockwise about the plane normal and holes run clockwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanarProfile {
    pub origin: Vec3,
    pub normal: Vec3,
    pub x_axis: Vec3,
    pub outer: Vec<[f64; 2]>,
    #[serde(default)]
    pub holes: Vec<Vec<[f64; 2]>>,
}

/// Signed area of a polygon (positive when counter-clockwise).
pub fn signed_area(pts: &[[f64; 2]]) -> f64 {
    let n = pts.len();
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += pts[i][0] * pts[j][1] - pts[j][0] * pts[i][1];
    }
    sum / 2.0
}

fn oriented(mut pts: Vec<[f64; 2]>, ccw: bool) -> Vec<[f64; 2]> {
    if (signed_area(&pts) > 0.0) != ccw {
        pts.reverse();
    }
    pts
}

pub fn rect_loop(cx: f64, cy: f64, width: f64, height: f64) -> Vec<[f64; 2]> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    vec![
        [cx - hw, cy - hh],
        [cx + hw, cy - hh],
        [cx + hw, cy + hh],
        [cx - hw, cy + hh],
    ]
}

pub fn circle_loop(cx: f64, cy: f64, radius: f64) -> Vec<[f64; 2]> {
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let a = std::f64::consts::TAU * i as f64 / CIRCLE_SEGMENTS as f64;
            [cx + radius * a.cos(), cy + radius * a.sin()]
        })
        .collect()
}

/// Rectangle with quarter-circle corners. A radius at or below zero gives
/// a plain rectangle; the radius is capped at half the shorter side.
pub fn rounded_rect_loop(width: f64, height: f64, radius: f64) -> Vec<[f64; 2]> {
    let r = radius.min(width / 2.0).min(height / 2.0);
    if r <= 0.0 {
        return rect_loop(0.0, 0.0, width, height);
    }
    let (hw, hh) = (width / 2.0 - r, height / 2.0 - r);
    let corners = [(hw, -hh, -90.0), (hw, hh, 0.0), (-hw, hh, 90.0), (-hw, -hh, 180.0)];
    let mut pts = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (cx, cy, start) in corners {
        for k in 0..=CORNER_SEGMENTS {
            let a = (start + 90.0 * k as f64 / CORNER_SEGMENTS as f64).to_radians();
            pts.push([cx + r * a.cos(), cy + r * a.sin()]);
        }
    }
    pts
}

impl PlanarProfile {
    /// Profile on the plane through `origin` with normal `normal`, using
    /// the deterministic in-plane X axis for that normal.
    pub fn on_plane(origin: Vec3, normal: Vec3, outer: Vec<[f64; 2]>) -> Self {
        let normal = normalize(normal);
        Self::with_axes(origin, normal, tangent_x_from_normal(normal), outer)
    }

    pub fn with_axes(origin: Vec3, normal: Vec3, x_axis: Vec3, outer: Vec<[f64; 2]>) -> Self {
        Self {
            origin,
            normal: normalize(normal),
            x_axis: normalize(x_axis),
            outer: oriented(outer, true),
            holes: Vec::new(),
        }
    }

    /// Profile in the local XY plane at height `z`, normal +Z.
    pub fn xy(z: f64, outer: Vec<[f64; 2]>) -> Self {
        Self::with_axes([0.0, 0.0, z], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0], outer)
    }

    pub fn with_hole(mut self, hole: Vec<[f64; 2]>) -> Self {
        self.holes.push(oriented(hole, false));
        self
    }

    pub fn y_axis(&self) -> Vec3 {
        cross(self.normal, self.x_axis)
    }

    /// Map a plane-local (u, v) coordinate to model space.
    pub fn to_world(&self, uv: [f64; 2]) -> Vec3 {
        add(
            self.origin,
            add(scale(self.x_axis, uv[0]), scale(self.y_axis(), uv[1])),
        )
    }

    /// Enclosed area: outer loop minus holes.
    pub fn area(&self) -> f64 {
        signed_area(&self.outer).abs() - self.holes.iter().map(|h| signed_area(h).abs()).sum::<f64>()
    }

    pub fn vertex_count(&self) -> usize {
        self.outer.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }
}
