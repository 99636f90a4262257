use anyhow::{Result, ensure};
use itertools::Itertools;
use ndarray::{Array1, Array2};

/// Minimum spacing between every unordered pair of turbines, expressed on squared distances.
///
/// Residual of pair `(i, j)`: `(x_i - x_j)² + (y_i - y_j)² - min_spacing²`, feasible iff `>= 0`.
/// Pairs are enumerated lexicographically (`(0,1), (0,2), ..., (1,2), ...`), the order drivers index residuals by.
#[derive(Clone, Debug, PartialEq)]
pub struct SpacingConstraint {
    pub n_wt: usize,
    pub min_spacing: f64,
}

impl SpacingConstraint {
    pub fn new(n_wt: usize, min_spacing: f64) -> Result<Self> {
        ensure!(
            min_spacing.is_finite() && min_spacing > 0.0,
            "minimum spacing must be strictly positive and finite, got {min_spacing}"
        );
        Ok(Self { n_wt, min_spacing })
    }

    /// Number of residuals: `n_wt * (n_wt - 1) / 2`
    pub fn n_constraints(&self) -> usize {
        self.n_wt * self.n_wt.saturating_sub(1) / 2
    }

    /// All unordered pairs `(i, j)` with `i < j`, in residual order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.n_wt).tuple_combinations()
    }

    /// Position of the pair `{i, j}` in the residual vector
    pub fn pair_index(&self, i: usize, j: usize) -> usize {
        let (i, j) = (i.min(j), i.max(j));
        assert!(i != j && j < self.n_wt, "invalid pair ({i}, {j}) for {} turbines", self.n_wt);
        //pairs starting at 0..i precede this one
        i * self.n_wt - i * (i + 1) / 2 + (j - i - 1)
    }

    pub fn residuals(&self, xs: &[f64], ys: &[f64]) -> Array1<f64> {
        debug_assert!(xs.len() == self.n_wt && ys.len() == self.n_wt);
        let sq_min = self.min_spacing.powi(2);
        self.pairs()
            .map(|(i, j)| (xs[i] - xs[j]).powi(2) + (ys[i] - ys[j]).powi(2) - sq_min)
            .collect()
    }

    /// Jacobian of [SpacingConstraint::residuals]: one row per pair,
    /// columns ordered `[x_0, ..., x_{n-1}, y_0, ..., y_{n-1}]`.
    pub fn jacobian(&self, xs: &[f64], ys: &[f64]) -> Array2<f64> {
        debug_assert!(xs.len() == self.n_wt && ys.len() == self.n_wt);
        let n = self.n_wt;
        let mut jac = Array2::zeros((self.n_constraints(), 2 * n));
        for (row, (i, j)) in self.pairs().enumerate() {
            let dx = 2.0 * (xs[i] - xs[j]);
            let dy = 2.0 * (ys[i] - ys[j]);
            jac[[row, i]] = dx;
            jac[[row, j]] = -dx;
            jac[[row, n + i]] = dy;
            jac[[row, n + j]] = -dy;
        }
        jac
    }
}
