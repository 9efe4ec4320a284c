use serde::{Deserialize, Serialize};

/// A point or direction in model space (inches).
pub type Vec3 = [f64; 3];

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn length(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    scale(add(a, b), 0.5)
}

/// Unit vector along `a`, or +Z when `a` is degenerate.
pub fn normalize(a: Vec3) -> Vec3 {
    let len = length(a);
    if len < 1e-12 {
        return [0.0, 0.0, 1.0];
    }
    scale(a, 1.0 / len)
}

/// Deterministic in-plane X axis for a plane with the given normal.
pub fn tangent_x_from_normal(n: Vec3) -> Vec3 {
    let up = if n[0].abs() < 0.9 {
        [1.0, 0.0, 0.0]
    } else {
        [0.0, 1.0, 0.0]
    };
    let cx = cross(n, up);
    if length(cx) < 1e-12 {
        return [1.0, 0.0, 0.0];
    }
    normalize(cx)
}

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vec3 {
        let mut v = [0.0; 3];
        v[self.index()] = 1.0;
        v
    }

    /// The two axes perpendicular to this one, in right-handed order.
    pub fn lateral(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::Z, Axis::X),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bb.include(p);
        }
        Some(bb)
    }

    /// Box from the `[min_x, min_y, min_z, max_x, max_y, max_z]` layout
    /// used by topology signatures.
    pub fn from_array(a: [f64; 6]) -> Self {
        Self {
            min: [a[0], a[1], a[2]],
            max: [a[3], a[4], a[5]],
        }
    }

    pub fn to_array(&self) -> [f64; 6] {
        [
            self.min[0],
            self.min[1],
            self.min[2],
            self.max[0],
            self.max[1],
            self.max[2],
        ]
    }

    pub fn include(&mut self, p: Vec3) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        out.include(other.min);
        out.include(other.max);
        out
    }

    pub fn center(&self) -> Vec3 {
        midpoint(self.min, self.max)
    }

    pub fn size(&self) -> Vec3 {
        sub(self.max, self.min)
    }

    pub fn extent(&self, axis: Axis) -> f64 {
        self.max[axis.index()] - self.min[axis.index()]
    }

    /// Largest absolute coordinate reached along `axis`.
    pub fn half_extent_from_origin(&self, axis: Axis) -> f64 {
        let i = axis.index();
        self.min[i].abs().max(self.max[i].abs())
    }

    /// True when the boxes share volume, allowing `tol` of slack.
    pub fn overlaps(&self, other: &BoundingBox, tol: f64) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] + tol && other.min[i] <= self.max[i] + tol)
    }

    /// The eight corner points.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            [a[0], a[1], a[2]],
            [b[0], a[1], a[2]],
            [b[0], b[1], a[2]],
            [a[0], b[1], a[2]],
            [a[0], a[1], b[2]],
            [b[0], a[1], b[2]],
            [b[0], b[1], b[2]],
            [a[0], b[1], b[2]],
        ]
    }
}
