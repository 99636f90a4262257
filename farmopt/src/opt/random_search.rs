use crate::config::RandomSearchConfig;
use crate::opt::SearchRegion;
use anyhow::{Result, ensure};
use farmlayout::problem::{Driver, DriverResult, Evaluation, LayoutProblem, Recorder};
use log::{debug, info};
use ndarray::Array1;
use rand::Rng;
use rand::distr::Uniform;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::time::{Duration, Instant};
use thousands::Separable;

/// Distribution of the displacement of a turbine
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum XyStep {
    /// Uniform direction, uniform length up to the largest of the per-axis maxima
    Circle,
    /// Uniform in `[-max, max]` per axis
    Square,
    /// Normal per axis, with half the maximum as standard deviation
    Normal,
}

impl XyStep {
    /// Samples a displacement `(dx, dy)` for the per-axis maximum `(max_x, max_y)`
    pub fn sample(&self, (max_x, max_y): (f64, f64), rng: &mut impl Rng) -> Result<(f64, f64)> {
        let step = match self {
            XyStep::Circle => {
                let length = rng.random::<f64>() * f64::max(max_x, max_y);
                let theta = rng.random::<f64>() * TAU;
                (length * theta.cos(), length * theta.sin())
            }
            XyStep::Square => {
                let unit = Uniform::new_inclusive(-1.0, 1.0)?;
                (unit.sample(rng) * max_x, unit.sample(rng) * max_y)
            }
            XyStep::Normal => (
                Normal::new(0.0, max_x / 2.0)?.sample(rng),
                Normal::new(0.0, max_y / 2.0)?.sample(rng),
            ),
        };
        Ok(step)
    }
}

/// Moves a single, randomly chosen turbine
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RandomizeTurbinePosition {
    /// Largest displacement in physical units. If undefined, the extent of the search region per axis.
    pub max_step: Option<f64>,
    pub step: XyStep,
}

impl Default for RandomizeTurbinePosition {
    fn default() -> Self {
        Self {
            max_step: None,
            step: XyStep::Circle,
        }
    }
}

impl RandomizeTurbinePosition {
    /// Displaces one turbine of the scaled design vector `x` and clamps it to `region`.
    /// `(fx, fy)` are the design variable scale factors, converting `max_step` to scaled units.
    /// Returns the index of the moved turbine.
    pub fn randomize(
        &self,
        x: &mut [f64],
        region: &SearchRegion,
        (fx, fy): (f64, f64),
        rng: &mut impl Rng,
    ) -> Result<usize> {
        let n_wt = x.len() / 2;
        ensure!(n_wt > 0, "no turbine to move");
        let ix = rng.random_range(0..n_wt);
        let iy = n_wt + ix;
        let max_step = match self.max_step {
            Some(step) => (step / fx, step / fy),
            None => (
                region.upper[ix] - region.lower[ix],
                region.upper[iy] - region.lower[iy],
            ),
        };
        let (dx, dy) = self.step.sample(max_step, rng)?;
        x[ix] = (x[ix] + dx).clamp(region.lower[ix], region.upper[ix]);
        x[iy] = (x[iy] + dy).clamp(region.lower[iy], region.upper[iy]);
        Ok(ix)
    }
}

/// Violation first, objective second. Violations within the tolerance count as feasible.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
struct Merit {
    violation: f64,
    objective: f64,
}

impl Merit {
    fn new(eval: &Evaluation, feasibility_tol: f64) -> Self {
        let violation = eval.max_violation();
        Self {
            violation: if violation <= feasibility_tol { 0.0 } else { violation },
            objective: eval.objective,
        }
    }
}

/// Moves one turbine at a time and keeps the move if it improves the layout.
///
/// A proposal is accepted if it reduces the constraint violation, or keeps the layout feasible and lowers the cost.
/// The search stops once the iteration or the time limit is reached, whichever comes first.
pub struct RandomSearchDriver<R: Rng> {
    pub config: RandomSearchConfig,
    rng: R,
}

impl<R: Rng> RandomSearchDriver<R> {
    pub fn new(config: RandomSearchConfig, rng: R) -> Result<Self> {
        ensure!(
            config.max_iter.is_some() || config.max_time.is_some(),
            "random search needs an iteration or a time limit"
        );
        if let Some(max_time) = config.max_time {
            ensure!(
                max_time.is_finite() && max_time >= 0.0,
                "time limit must be non-negative, got {max_time}"
            );
        }
        if let Some(max_step) = config.randomize.max_step {
            ensure!(
                max_step.is_finite() && max_step > 0.0,
                "maximum step must be strictly positive, got {max_step}"
            );
        }
        ensure!(
            config.feasibility_tol >= 0.0,
            "feasibility tolerance must be non-negative, got {}",
            config.feasibility_tol
        );
        Ok(Self { config, rng })
    }
}

impl<R: Rng> Driver for RandomSearchDriver<R> {
    fn name(&self) -> &str {
        "random-search"
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
        let max_time = config.max_time.map(Duration::from_secs_f64);
        let region = SearchRegion::new(problem);
        let factors = problem.scaling().factors();

        let mut x = x0.to_vec();
        let eval = problem.evaluate(&x);
        let mut current = Merit::new(&eval, config.feasibility_tol);
        recorder.record(problem.iteration_record(0, &x, &eval));

        let (mut n_iter, mut n_accepted) = (0, 0);
        let message = loop {
            if config.max_iter.is_some_and(|max_iter| n_iter >= max_iter) {
                break "iteration limit reached";
            }
            if max_time.is_some_and(|max_time| start.elapsed() >= max_time) {
                break "time limit reached";
            }

            let mut proposal = x.clone();
            let moved = config
                .randomize
                .randomize(&mut proposal, &region, factors, &mut self.rng)?;
            let eval = problem.evaluate(&proposal);
            let merit = Merit::new(&eval, config.feasibility_tol);
            n_iter += 1;

            if merit < current {
                debug!(
                    "[RS] it {}: moved turbine {}, objective {:.6e}, violation {:.3e}",
                    n_iter, moved, merit.objective, merit.violation
                );
                x = proposal;
                current = merit;
                n_accepted += 1;
                recorder.record(problem.iteration_record(n_iter, &x, &eval));
            }
        };

        info!(
            "[RS] {} after {} iterations ({} accepted) in {:.3}ms, objective: {:.6e}, violation: {:.3e}",
            message,
            n_iter.separate_with_commas(),
            n_accepted.separate_with_commas(),
            start.elapsed().as_secs_f64() * 1000.0,
            current.objective,
            current.violation
        );

        Ok(DriverResult {
            x: Array1::from(x),
            converged: current.violation == 0.0,
            n_iter,
            n_evals: n_iter + 1,
            message: String::from(message),
        })
    }
}
