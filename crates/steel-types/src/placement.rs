use serde::{Deserialize, Serialize};

use crate::geom::{add, Vec3};

/// A rotation stored as a row-major 3×3 matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub matrix: [[f64; 3]; 3],
}

/// Sine and cosine of an angle in degrees. Quarter turns are exact so that
/// rotated bounding boxes do not pick up 1e-17 noise.
fn sin_cos_deg(deg: f64) -> (f64, f64) {
    let r = deg.rem_euclid(360.0);
    let quarter = r / 90.0;
    if (quarter - quarter.round()).abs() < 1e-12 {
        match quarter.round() as i64 % 4 {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        }
    } else {
        let rad = deg.to_radians();
        (rad.sin(), rad.cos())
    }
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        matrix: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub fn about_x(deg: f64) -> Self {
        let (s, c) = sin_cos_deg(deg);
        Self {
            matrix: [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]],
        }
    }

    pub fn about_y(deg: f64) -> Self {
        let (s, c) = sin_cos_deg(deg);
        Self {
            matrix: [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]],
        }
    }

    pub fn about_z(deg: f64) -> Self {
        let (s, c) = sin_cos_deg(deg);
        Self {
            matrix: [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Composite rotation: `self` is applied first, then `next`.
    pub fn then(&self, next: &Rotation) -> Rotation {
        let a = &next.matrix;
        let b = &self.matrix;
        let mut m = [[0.0; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
            }
        }
        Rotation { matrix: m }
    }

    pub fn apply(&self, v: Vec3) -> Vec3 {
        let m = &self.matrix;
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        ]
    }

    pub fn approx_eq(&self, other: &Rotation, tol: f64) -> bool {
        self.matrix
            .iter()
            .flatten()
            .zip(other.matrix.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tol)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rigid placement: rotate about the local origin, then translate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Rotation,
}

impl Placement {
    pub fn new(position: Vec3, rotation: Rotation) -> Self {
        Self { position, rotation }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    /// Pure translation.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Rotation::IDENTITY,
        }
    }

    pub fn apply_point(&self, p: Vec3) -> Vec3 {
        add(self.rotation.apply(p), self.position)
    }

    pub fn apply_vector(&self, v: Vec3) -> Vec3 {
        self.rotation.apply(v)
    }

    /// Composite placement: `self` is applied first, then `outer`.
    pub fn then(&self, outer: &Placement) -> Placement {
        Placement {
            position: outer.apply_point(self.position),
            rotation: self.rotation.then(&outer.rotation),
        }
    }
}
