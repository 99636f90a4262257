use farmlayout::geometry::primitives::Rect;
use farmlayout::problem::LayoutProblem;

mod random_search;
mod slsqp;

#[doc(inline)]
pub use random_search::{RandomSearchDriver, RandomizeTurbinePosition, XyStep};
#[doc(inline)]
pub use slsqp::SlsqpDriver;

/// Finite box of the scaled design variables in which the drivers search.
///
/// The problem's own bounds are kept where they are finite.
/// Unbounded variables fall back to the bounding box of the boundary and the current layout,
/// widened on every side by the largest of its extents.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRegion {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl SearchRegion {
    pub fn new(problem: &LayoutProblem) -> Self {
        let n_wt = problem.n_wt();
        let mut points = problem.boundary().vertices.clone();
        points.extend(problem.turbine_positions());
        let bbox = Rect::bounding_box(&points).unwrap_or(problem.boundary().bbox());
        let margin = match f64::max(bbox.width(), bbox.height()) {
            m if m > 0.0 => m,
            _ => 1.0,
        };
        //[x_lo, x_hi, y_lo, y_hi]
        let fallback = problem.scaling().to_scaled(
            &[bbox.x_min - margin, bbox.x_max + margin],
            &[bbox.y_min - margin, bbox.y_max + margin],
        );

        //bounds at the extremes of the float range are sentinels for unbounded variables
        let is_bound = |b: f64| b.is_finite() && b.abs() < f64::MAX;
        let (lower, upper) = problem.design_var_bounds();
        let axis = |k: usize| if k < n_wt { 0 } else { 2 };

        Self {
            lower: lower
                .iter()
                .enumerate()
                .map(|(k, &b)| if is_bound(b) { b } else { fallback[axis(k)] })
                .collect(),
            upper: upper
                .iter()
                .enumerate()
                .map(|(k, &b)| if is_bound(b) { b } else { fallback[axis(k) + 1] })
                .collect(),
        }
    }

    /// `(lower, upper)` per design variable
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        self.lower.iter().copied().zip(self.upper.iter().copied()).collect()
    }

    pub fn contains(&self, x: &[f64]) -> bool {
        x.iter()
            .zip(self.bounds())
            .all(|(v, (lo, hi))| (lo..=hi).contains(v))
    }
}
