use log::{info, warn};
use ndarray::{Array1, Array2, ArrayView2, s};
use serde::Serialize;

/// Relative error above which an analytic gradient is flagged
pub const DEFAULT_TOL: f64 = 1e-3;

/// Relative step of the central finite differences
pub const FD_STEP: f64 = 1e-6;

/// Central finite difference Jacobian of `f` at `x`: one row per output, one column per input.
pub fn fd_jacobian(f: impl Fn(&[f64]) -> Array1<f64>, x: &[f64]) -> Array2<f64> {
    let mut xp = x.to_vec();
    let mut columns = Vec::with_capacity(x.len());
    for k in 0..x.len() {
        let h = FD_STEP * f64::max(1.0, x[k].abs());
        xp[k] = x[k] + h;
        let f_plus = f(&xp);
        xp[k] = x[k] - h;
        let f_min = f(&xp);
        xp[k] = x[k];
        columns.push((f_plus - f_min) / (2.0 * h));
    }
    let m = columns.first().map_or(0, |c| c.len());
    let mut jac = Array2::zeros((m, x.len()));
    for (k, column) in columns.into_iter().enumerate() {
        jac.column_mut(k).assign(&column);
    }
    jac
}

/// Central finite difference gradient of a scalar function
pub fn fd_gradient(f: impl Fn(&[f64]) -> f64, x: &[f64]) -> Array1<f64> {
    fd_jacobian(|x| Array1::from_elem(1, f(x)), x).row(0).to_owned()
}

/// `‖fd - analytic‖ / ‖fd‖` (Frobenius norms), absolute error if the finite difference Jacobian vanishes
pub fn relative_error(analytic: ArrayView2<f64>, fd: ArrayView2<f64>) -> f64 {
    let abs_err = (&fd - &analytic).mapv(|v| v * v).sum().sqrt();
    let fd_norm = fd.mapv(|v| v * v).sum().sqrt();
    match fd_norm {
        0.0 => abs_err,
        _ => abs_err / fd_norm,
    }
}

/// Comparison of one analytic derivative block against finite differences
#[derive(Debug, Clone, Serialize)]
pub struct GradientCheck {
    pub component: String,
    /// The variables the derivative is taken w.r.t. (`x` or `y`)
    pub wrt: String,
    pub rel_error: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradientReport {
    pub tol: f64,
    pub checks: Vec<GradientCheck>,
}

impl GradientReport {
    pub fn new(tol: f64) -> Self {
        Self {
            tol,
            checks: vec![],
        }
    }

    /// Splits the Jacobians of `component` (columns `[x.., y..]`) into an `x` and a `y` block and compares them.
    /// Mismatches are logged as warnings, never raised.
    pub fn check(&mut self, component: &str, analytic: &Array2<f64>, fd: &Array2<f64>) {
        assert_eq!(analytic.dim(), fd.dim());
        let n_wt = analytic.ncols() / 2;
        for (wrt, cols) in [("x", s![.., ..n_wt]), ("y", s![.., n_wt..])] {
            let rel_error = relative_error(analytic.slice(&cols), fd.slice(&cols));
            let passed = rel_error <= self.tol;
            if !passed {
                warn!(
                    "[GRAD] mismatch between finite difference and analytic derivative of '{component}' w.r.t. '{wrt}': {rel_error:.3e} > {:.1e}",
                    self.tol
                );
            }
            self.checks.push(GradientCheck {
                component: component.to_string(),
                wrt: wrt.to_string(),
                rel_error,
                passed,
            });
        }
    }

    /// Check with the largest relative error
    pub fn worst(&self) -> Option<&GradientCheck> {
        self.checks
            .iter()
            .max_by(|a, b| a.rel_error.total_cmp(&b.rel_error))
    }

    /// Worst check of a single component
    pub fn worst_of(&self, component: &str) -> Option<&GradientCheck> {
        self.checks
            .iter()
            .filter(|c| c.component == component)
            .max_by(|a, b| a.rel_error.total_cmp(&b.rel_error))
    }

    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn log_summary(&self) {
        for c in self.checks.iter() {
            info!(
                "[GRAD] {:<10} w.r.t. {}: rel. error {:.3e} ({})",
                c.component,
                c.wrt,
                c.rel_error,
                if c.passed { "ok" } else { "MISMATCH" }
            );
        }
    }
}
