use crate::config::SlsqpConfig;
use crate::opt::SearchRegion;
use anyhow::{Result, bail, ensure};
use farmlayout::constraints::Boundary;
use farmlayout::problem::{DesignVarScaling, Driver, DriverResult, LayoutProblem, Recorder};
use log::{debug, info};
use ndarray::Array1;
use slsqp_rssl::{Constraint, fmin_slsqp};
use std::cell::Cell;
use std::sync::Arc;
use std::time::Instant;
use thousands::Separable;

/// Sequential least squares programming driver, backed by [`fmin_slsqp`].
///
/// Every row of the problem's constraint blocks becomes one inequality constraint.
/// Derivatives are approximated by SLSQP itself.
/// Only the start and the final iterate are reported to the recorder.
#[derive(Default)]
pub struct SlsqpDriver {
    pub config: SlsqpConfig,
}

impl SlsqpDriver {
    pub fn new(config: SlsqpConfig) -> Result<Self> {
        ensure!(config.max_iter > 0, "SLSQP needs at least one iteration");
        ensure!(
            config.acc.is_finite() && config.acc > 0.0,
            "SLSQP accuracy must be strictly positive, got {}",
            config.acc
        );
        ensure!(
            config.feasibility_tol >= 0.0,
            "feasibility tolerance must be non-negative, got {}",
            config.feasibility_tol
        );
        Ok(Self { config })
    }
}

/// A single residual of the constraint blocks
#[derive(Clone, Copy, Debug, PartialEq)]
enum Row {
    Spacing(usize, usize),
    Boundary(usize),
}

/// Owns everything needed to evaluate a [`Row`] from a scaled design vector
#[derive(Clone)]
struct RowEvaluator {
    scaling: DesignVarScaling,
    sq_min_spacing: f64,
    boundary: Arc<Boundary>,
}

impl RowEvaluator {
    fn new(problem: &LayoutProblem) -> Self {
        Self {
            scaling: *problem.scaling(),
            sq_min_spacing: problem.min_spacing().powi(2),
            boundary: Arc::new(problem.boundary().clone()),
        }
    }

    fn residual(&self, row: Row, x: &[f64]) -> f64 {
        match row {
            Row::Spacing(i, j) => {
                let (a, b) = (
                    self.scaling.turbine_position(x, i),
                    self.scaling.turbine_position(x, j),
                );
                (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2) - self.sq_min_spacing
            }
            Row::Boundary(i) => self.boundary.distance(&self.scaling.turbine_position(x, i)).0,
        }
    }
}

/// `(row, bound, sign)` for every finite bound of the constraint blocks, the constraint being `sign * (residual - bound) >= 0`
fn constraint_rows(problem: &LayoutProblem) -> Result<Vec<(Row, f64, f64)>> {
    let mut rows = vec![];
    for block in problem.constraint_blocks() {
        let block_rows: Vec<Row> = match block.name {
            "spacing" => problem
                .spacing()
                .pairs()
                .map(|(i, j)| Row::Spacing(i, j))
                .collect(),
            "boundary" => (0..problem.n_wt()).map(Row::Boundary).collect(),
            name => bail!("no SLSQP constraint for block '{name}'"),
        };
        ensure!(
            block_rows.len() == block.lower.len(),
            "block '{}' has {} bounds for {} residuals",
            block.name,
            block.lower.len(),
            block_rows.len()
        );
        for (row, (&lower, &upper)) in block_rows
            .into_iter()
            .zip(block.lower.iter().zip(block.upper.iter()))
        {
            if lower.is_finite() {
                rows.push((row, lower, 1.0));
            }
            if upper.is_finite() {
                rows.push((row, upper, -1.0));
            }
        }
    }
    Ok(rows)
}

fn inequality_constraints(problem: &LayoutProblem) -> Result<Vec<Constraint>> {
    let evaluator = RowEvaluator::new(problem);
    let constraints = constraint_rows(problem)?
        .into_iter()
        .map(|(row, bound, sign)| {
            let evaluator = evaluator.clone();
            Constraint::Ineq(Box::new(move |x: &[f64]| {
                sign * (evaluator.residual(row, x) - bound)
            }))
        })
        .collect();
    Ok(constraints)
}

impl Driver for SlsqpDriver {
    fn name(&self) -> &str {
        "SLSQP"
    }

    fn run(
        &mut self,
        problem: &LayoutProblem,
        x0: Array1<f64>,
        recorder: &mut dyn Recorder,
    ) -> Result<DriverResult> {
        ensure!(
            x0.len() == problem.n_design_vars(),
            "start vector has {} entries, problem has {} design variables",
            x0.len(),
            problem.n_design_vars()
        );
        let start = Instant::now();
        let config = self.config;
        let constraints = inequality_constraints(problem)?;
        let bounds = SearchRegion::new(problem).bounds();
        info!(
            "[SLSQP] {} design variables, {} inequality constraints",
            x0.len(),
            constraints.len()
        );
        debug!("[SLSQP] design variable bounds: {bounds:?}");

        let x0 = x0.to_vec();
        recorder.record(problem.iteration_record(0, &x0, &problem.evaluate(&x0)));

        let n_evals = Cell::new(0_usize);
        let objective = |x: &[f64]| {
            n_evals.set(n_evals.get() + 1);
            problem.objective(x)
        };
        let res = fmin_slsqp(
            objective,
            x0.as_slice(),
            bounds.as_slice(),
            constraints,
            config.max_iter,
            config.acc,
            None,
        );

        let x = res.x.to_vec();
        let n_iter = res.nit as usize;
        let eval = problem.evaluate(&x);
        recorder.record(problem.iteration_record(n_iter, &x, &eval));

        let max_violation = eval.max_violation();
        let converged = n_iter < config.max_iter
            && eval.objective.is_finite()
            && max_violation <= config.feasibility_tol;
        info!(
            "[SLSQP] {} after {} iterations and {} evaluations in {:.3}ms, objective: {:.6e}, max. violation: {:.3e}",
            res.message,
            n_iter,
            n_evals.get().separate_with_commas(),
            start.elapsed().as_secs_f64() * 1000.0,
            eval.objective,
            max_violation
        );

        Ok(DriverResult {
            x: Array1::from(x),
            converged,
            n_iter,
            n_evals: n_evals.get(),
            message: res.message.to_string(),
        })
    }
}
