use crate::constraints::Boundary;
use crate::geometry::primitives::Point;
use serde::{Deserialize, Serialize};

/// Per-axis affine scaling of the design variables: `scaled = (physical - ref0) / (reference - ref0)`.
///
/// The scale factor is kept strictly positive so that the sign conventions of the residuals survive the scaling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignVarScaling {
    pub ref0: (f64, f64),
    pub reference: (f64, f64),
}

impl DesignVarScaling {
    pub fn identity() -> Self {
        Self {
            ref0: (0.0, 0.0),
            reference: (1.0, 1.0),
        }
    }

    /// `ref0` at the minimum, `reference` at the mean of the boundary vertices, per axis
    pub fn from_boundary(boundary: &Boundary) -> Self {
        let bbox = boundary.bbox();
        let mean = boundary.shape.vertex_mean();
        Self {
            ref0: (bbox.x_min, bbox.y_min),
            reference: (mean.0, mean.1),
        }
    }

    /// Scale factors `(reference - ref0)` per axis, falling back to 1 where they are degenerate
    pub fn factors(&self) -> (f64, f64) {
        let factor = |r0: f64, r: f64| match r - r0 {
            f if f.is_finite() && f > 0.0 => f,
            _ => 1.0,
        };
        (
            factor(self.ref0.0, self.reference.0),
            factor(self.ref0.1, self.reference.1),
        )
    }

    pub fn is_identity(&self) -> bool {
        self.ref0 == (0.0, 0.0) && self.factors() == (1.0, 1.0)
    }

    /// Scaled design vector `[x_0, ..., x_{n-1}, y_0, ..., y_{n-1}]`
    pub fn to_scaled(&self, xs: &[f64], ys: &[f64]) -> Vec<f64> {
        let (fx, fy) = self.factors();
        xs.iter()
            .map(|x| (x - self.ref0.0) / fx)
            .chain(ys.iter().map(|y| (y - self.ref0.1) / fy))
            .collect()
    }

    /// Physical coordinates from a scaled design vector
    pub fn to_physical(&self, x: &[f64]) -> (Vec<f64>, Vec<f64>) {
        debug_assert!(x.len() % 2 == 0);
        let (fx, fy) = self.factors();
        let n = x.len() / 2;
        let xs = x[..n].iter().map(|v| v * fx + self.ref0.0).collect();
        let ys = x[n..].iter().map(|v| v * fy + self.ref0.1).collect();
        (xs, ys)
    }

    /// Physical position of turbine `i` in a scaled design vector
    pub fn turbine_position(&self, x: &[f64], i: usize) -> Point {
        let (fx, fy) = self.factors();
        let n = x.len() / 2;
        Point(x[i] * fx + self.ref0.0, x[n + i] * fy + self.ref0.1)
    }

    /// Factor to multiply a physical derivative with to obtain the derivative w.r.t. scaled column `col`
    pub fn chain_factor(&self, col: usize, n_wt: usize) -> f64 {
        let (fx, fy) = self.factors();
        match col < n_wt {
            true => fx,
            false => fy,
        }
    }
}
