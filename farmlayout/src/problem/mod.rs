/// The cost contract and a closure based implementation
pub mod cost;

/// Contracts of the external optimization driver and the iteration recorder
pub mod driver;

mod layout;
mod scaling;

#[doc(inline)]
pub use cost::{CostComponent, CostModel};
#[doc(inline)]
pub use driver::{
    Driver, DriverConfig, DriverResult, HistoryRecorder, IterationRecord, NoRecorder, Recorder,
};
#[doc(inline)]
pub use layout::Layout;
#[doc(inline)]
pub use scaling::DesignVarScaling;

use crate::constraints::{Boundary, SpacingConstraint};
use crate::geometry::primitives::Point;
use crate::grad_check::{GradientReport, fd_gradient, fd_jacobian};
use crate::shuffle::{ShuffleConfig, ShuffleResult, shuffle_positions};
use anyhow::{Result, bail, ensure};
use log::{debug, info, warn};
use ndarray::{Array1, Array2, Axis, concatenate, s};
use rand::Rng;
use std::time::Instant;

/// Named vector of constraint residuals with its bounds: `lower <= residual <= upper`
#[derive(Clone, Debug)]
pub struct ConstraintBlock {
    pub name: &'static str,
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
}

/// Objective and constraint residuals at one design vector
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub objective: f64,
    pub spacing: Array1<f64>,
    pub boundary: Array1<f64>,
}

impl Evaluation {
    /// All residuals, in the order of [LayoutProblem::constraint_blocks]
    pub fn constraints(&self) -> Array1<f64> {
        concatenate![Axis(0), self.spacing, self.boundary]
    }

    /// Largest violation of a lower bound of zero, 0 when feasible
    pub fn max_violation(&self) -> f64 {
        self.spacing
            .iter()
            .chain(self.boundary.iter())
            .fold(0.0, |acc: f64, &r| acc.max(-r))
    }
}

/// Derivatives w.r.t. the scaled design vector
#[derive(Clone, Debug)]
pub struct Jacobians {
    pub objective: Array1<f64>,
    pub spacing: Array2<f64>,
    pub boundary: Array2<f64>,
}

impl Jacobians {
    /// Jacobian of all residuals, rows in the order of [Evaluation::constraints]
    pub fn constraints(&self) -> Array2<f64> {
        concatenate![Axis(0), self.spacing, self.boundary]
    }
}

/// Layout optimization problem: turbine coordinates as design variables, a cost to minimize,
/// a spacing and a boundary constraint.
///
/// The design vector seen by drivers is `[x_0, ..., x_{n-1}, y_0, ..., y_{n-1}]`, scaled by [DesignVarScaling].
pub struct LayoutProblem {
    layout: Layout,
    boundary: Boundary,
    cost: Box<dyn CostModel>,
    spacing: SpacingConstraint,
    scaling: DesignVarScaling,
    var_bound: f64,
    driver_config: DriverConfig,
    last_run: Option<DriverResult>,
}

impl LayoutProblem {
    /// Assembles the problem. All configuration errors surface here, before any driver iteration.
    pub fn new(
        layout: Layout,
        boundary: Boundary,
        cost: Box<dyn CostModel>,
        min_spacing: f64,
        driver_config: &DriverConfig,
    ) -> Result<Self> {
        let n_wt = layout.n_wt();
        ensure!(n_wt > 0, "layout contains no turbines");
        ensure!(
            layout.xs.len() == layout.ys.len(),
            "layout has {} x and {} y coordinates",
            layout.xs.len(),
            layout.ys.len()
        );
        ensure!(layout.is_finite(), "layout contains non-finite coordinates");
        if cost.n_wt() != n_wt {
            bail!(
                "cost model is defined for {} turbines, layout has {n_wt}",
                cost.n_wt()
            );
        }
        ensure!(boundary.n_vertices() > 0, "boundary has no vertices");
        let spacing = SpacingConstraint::new(n_wt, min_spacing)?;

        //scaling and finite bound sentinels disturb some drivers
        let (scaling, var_bound) = match driver_config.scaling_sensitive {
            true => (DesignVarScaling::identity(), f64::INFINITY),
            false => (DesignVarScaling::from_boundary(&boundary), f64::MAX),
        };

        info!(
            "[PROB] {} turbines, {} spacing and {} boundary constraints, {:?} boundary with {} vertices, driver: {}",
            n_wt,
            spacing.n_constraints(),
            boundary.n_constraints(n_wt),
            boundary.btype,
            boundary.n_vertices(),
            driver_config.optimizer
        );
        debug!("[PROB] design variable scaling: {scaling:?}");

        let n_outside = boundary.report_violations(&layout.xs, &layout.ys);
        if n_outside > 0 {
            warn!("[PROB] {n_outside} turbines of the initial layout lie outside the boundary");
        }

        Ok(Self {
            layout,
            boundary,
            cost,
            spacing,
            scaling,
            var_bound,
            driver_config: driver_config.clone(),
            last_run: None,
        })
    }

    pub fn n_wt(&self) -> usize {
        self.layout.n_wt()
    }

    pub fn n_design_vars(&self) -> usize {
        2 * self.n_wt()
    }

    /// Scaled design vector of the current layout
    pub fn design_vector(&self) -> Array1<f64> {
        Array1::from(self.scaling.to_scaled(&self.layout.xs, &self.layout.ys))
    }

    /// Updates the layout from a scaled design vector
    pub fn set_design_vector(&mut self, x: &[f64]) {
        assert_eq!(x.len(), self.n_design_vars());
        let (xs, ys) = self.scaling.to_physical(x);
        self.layout.xs = xs;
        self.layout.ys = ys;
    }

    /// Lower and upper bounds of the scaled design variables
    pub fn design_var_bounds(&self) -> (Array1<f64>, Array1<f64>) {
        let n = self.n_design_vars();
        (
            Array1::from_elem(n, -self.var_bound),
            Array1::from_elem(n, self.var_bound),
        )
    }

    /// The spacing and the boundary residuals, both bounded below by zero
    pub fn constraint_blocks(&self) -> Vec<ConstraintBlock> {
        let block = |name, n| ConstraintBlock {
            name,
            lower: Array1::zeros(n),
            upper: Array1::from_elem(n, f64::INFINITY),
        };
        vec![
            block("spacing", self.spacing.n_constraints()),
            block("boundary", self.boundary.n_constraints(self.n_wt())),
        ]
    }

    /// Objective and residuals at the scaled design vector `x`
    pub fn evaluate(&self, x: &[f64]) -> Evaluation {
        assert_eq!(x.len(), self.n_design_vars());
        let (xs, ys) = self.scaling.to_physical(x);
        Evaluation {
            objective: self.cost.cost(&xs, &ys),
            spacing: self.spacing.residuals(&xs, &ys),
            boundary: self.boundary.distances(&xs, &ys),
        }
    }

    /// Objective alone at the scaled design vector `x`
    pub fn objective(&self, x: &[f64]) -> f64 {
        assert_eq!(x.len(), self.n_design_vars());
        let (xs, ys) = self.scaling.to_physical(x);
        self.cost.cost(&xs, &ys)
    }

    /// Derivatives of objective and residuals w.r.t. the scaled design vector `x`
    pub fn evaluate_gradients(&self, x: &[f64]) -> Jacobians {
        assert_eq!(x.len(), self.n_design_vars());
        let (xs, ys) = self.scaling.to_physical(x);
        let (dx, dy) = self.physical_cost_gradient(&xs, &ys);

        let mut objective: Array1<f64> = dx.into_iter().chain(dy).collect();
        let mut spacing = self.spacing.jacobian(&xs, &ys);
        let mut boundary = self.boundary.jacobian(&xs, &ys);

        if !self.scaling.is_identity() {
            let n_wt = self.n_wt();
            for (k, d) in objective.iter_mut().enumerate() {
                *d *= self.scaling.chain_factor(k, n_wt);
            }
            for jac in [&mut spacing, &mut boundary] {
                for (k, mut col) in jac.axis_iter_mut(Axis(1)).enumerate() {
                    col *= self.scaling.chain_factor(k, n_wt);
                }
            }
        }

        Jacobians {
            objective,
            spacing,
            boundary,
        }
    }

    /// Analytic cost gradient, or central finite differences if the cost model has none
    fn physical_cost_gradient(&self, xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
        match self.cost.gradient(xs, ys) {
            Some((dx, dy)) => {
                assert!(
                    dx.len() == xs.len() && dy.len() == ys.len(),
                    "cost gradient has the wrong size"
                );
                (dx, dy)
            }
            None => {
                let n = xs.len();
                let v = [xs, ys].concat();
                let grad = fd_gradient(
                    |v| {
                        let (xs, ys) = v.split_at(n);
                        self.cost.cost(xs, ys)
                    },
                    &v,
                );
                (grad.slice(s![..n]).to_vec(), grad.slice(s![n..]).to_vec())
            }
        }
    }

    /// Snapshot handed to a [Recorder], in physical coordinates
    pub fn iteration_record(&self, iteration: usize, x: &[f64], eval: &Evaluation) -> IterationRecord {
        let (xs, ys) = self.scaling.to_physical(x);
        IterationRecord {
            iteration,
            xs,
            ys,
            objective: eval.objective,
            constraints: eval.constraints().to_vec(),
        }
    }

    /// Cost of the current layout
    pub fn evaluate_layout(&self) -> (f64, Layout) {
        let start = Instant::now();
        let cost = self.cost();
        info!("[PROB] evaluated in {:.3}s", start.elapsed().as_secs_f64());
        (cost, self.layout.clone())
    }

    /// Cost gradient `(dcost/dx, dcost/dy)` of the current layout, in physical coordinates
    pub fn cost_gradients(&self) -> (Vec<f64>, Vec<f64>) {
        let start = Instant::now();
        let grad = self.physical_cost_gradient(&self.layout.xs, &self.layout.ys);
        info!(
            "[PROB] gradients evaluated in {:.3}s",
            start.elapsed().as_secs_f64()
        );
        grad
    }

    pub fn optimize(&mut self, driver: &mut dyn Driver) -> Result<(f64, Layout)> {
        self.optimize_with_recorder(driver, &mut NoRecorder)
    }

    /// Runs `driver` from the current layout and moves the turbines to its final iterate.
    pub fn optimize_with_recorder(
        &mut self,
        driver: &mut dyn Driver,
        recorder: &mut dyn Recorder,
    ) -> Result<(f64, Layout)> {
        let start = Instant::now();
        let x0 = self.design_vector();
        let result = driver.run(self, x0, recorder)?;
        self.set_design_vector(&result.x.to_vec());

        let cost = self.cost();
        info!(
            "[PROB] optimized by {} in {:.3}s, {} iterations, cost: {:.6}",
            driver.name(),
            start.elapsed().as_secs_f64(),
            result.n_iter,
            cost
        );
        if !result.converged {
            warn!("[PROB] {} did not converge: {}", driver.name(), result.message);
        }
        self.last_run = Some(result);

        Ok((cost, self.layout.clone()))
    }

    /// Diagnostics of the last [LayoutProblem::optimize] call
    pub fn last_run(&self) -> Option<&DriverResult> {
        self.last_run.as_ref()
    }

    /// Compares analytic derivatives against central finite differences at the current layout.
    /// Only the cost is checked unless `all` is set, in which case the spacing and boundary constraints are checked too.
    /// Mismatches above `tol` are flagged in the report and logged, they never abort.
    pub fn check_gradients(&self, all: bool, tol: f64) -> GradientReport {
        let (xs, ys) = (&self.layout.xs, &self.layout.ys);
        let n = self.n_wt();
        let v = [xs.as_slice(), ys.as_slice()].concat();
        let mut report = GradientReport::new(tol);

        match self.cost.gradient(xs, ys) {
            Some((dx, dy)) => {
                let analytic = Array1::from([dx, dy].concat()).insert_axis(Axis(0));
                let fd = fd_jacobian(
                    |v| {
                        let (xs, ys) = v.split_at(n);
                        Array1::from_elem(1, self.cost.cost(xs, ys))
                    },
                    &v,
                );
                report.check("cost", &analytic, &fd);
            }
            None => info!("[GRAD] cost model has no analytic gradient, nothing to check"),
        }

        if all {
            let fd = fd_jacobian(
                |v| {
                    let (xs, ys) = v.split_at(n);
                    self.spacing.residuals(xs, ys)
                },
                &v,
            );
            report.check("spacing", &self.spacing.jacobian(xs, ys), &fd);

            let fd = fd_jacobian(
                |v| {
                    let (xs, ys) = v.split_at(n);
                    self.boundary.distances(xs, ys)
                },
                &v,
            );
            report.check("boundary", &self.boundary.jacobian(xs, ys), &fd);
        }
        report.log_summary();
        report
    }

    /// Randomly moves the turbines while respecting the constraints, see [shuffle_positions]
    pub fn shuffle_positions(
        &mut self,
        config: &ShuffleConfig,
        rng: &mut impl Rng,
    ) -> Result<ShuffleResult> {
        let result = shuffle_positions(
            &self.layout,
            &self.boundary,
            self.spacing.min_spacing,
            config,
            rng,
        )?;
        self.layout = result.layout.clone();
        Ok(result)
    }

    /// Cost of the current layout
    pub fn cost(&self) -> f64 {
        self.cost.cost(&self.layout.xs, &self.layout.ys)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn turbine_positions(&self) -> Vec<Point> {
        self.layout.points()
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Vertices of the boundary, closed by repeating the first one at the end
    pub fn boundary_vertices(&self) -> Vec<Point> {
        self.boundary.closed_vertices()
    }

    pub fn spacing(&self) -> &SpacingConstraint {
        &self.spacing
    }

    pub fn min_spacing(&self) -> f64 {
        self.spacing.min_spacing
    }

    pub fn scaling(&self) -> &DesignVarScaling {
        &self.scaling
    }

    pub fn driver_config(&self) -> &DriverConfig {
        &self.driver_config
    }
}
