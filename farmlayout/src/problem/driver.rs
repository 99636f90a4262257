use crate::problem::LayoutProblem;
use anyhow::Result;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Options describing the driver a [`LayoutProblem`] will be handed to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DriverConfig {
    /// Name of the optimizer, passed through untouched
    pub optimizer: String,
    /// Drivers that are disturbed by design variable scaling and finite bound sentinels.
    /// When set, scaling is disabled and the design variables are left unbounded.
    pub scaling_sensitive: bool,
}

/// SLSQP, which is disturbed by scaling
impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            optimizer: String::from("SLSQP"),
            scaling_sensitive: true,
        }
    }
}

/// A gradient-based optimization algorithm.
///
/// Drivers query [`LayoutProblem::evaluate`] and [`LayoutProblem::evaluate_gradients`] as often as they like,
/// in any order. Both are pure functions of the design vector.
pub trait Driver {
    fn name(&self) -> &str;

    /// Minimizes the problem starting from the scaled design vector `x0`.
    /// Every iteration is reported to `recorder`.
    fn run(
        &mut self,
        problem: &LayoutProblem,
        x0: Array1<f64>,
        recorder: &mut dyn Recorder,
    ) -> Result<DriverResult>;
}

/// Final iterate and convergence diagnostics of a [`Driver`] run
#[derive(Clone, Debug)]
pub struct DriverResult {
    /// Scaled design vector
    pub x: Array1<f64>,
    pub converged: bool,
    pub n_iter: usize,
    /// Number of problem evaluations (values and gradients)
    pub n_evals: usize,
    pub message: String,
}

/// State of the problem at one driver iteration, in physical coordinates
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub objective: f64,
    pub constraints: Vec<f64>,
}

/// Sink receiving an [`IterationRecord`] for every driver iteration
pub trait Recorder {
    fn record(&mut self, record: IterationRecord);
}

/// Discards every record
pub struct NoRecorder;

impl Recorder for NoRecorder {
    fn record(&mut self, _record: IterationRecord) {}
}

/// Keeps all records in memory
#[derive(Default, Debug, Clone)]
pub struct HistoryRecorder {
    pub records: Vec<IterationRecord>,
}

impl Recorder for HistoryRecorder {
    fn record(&mut self, record: IterationRecord) {
        self.records.push(record);
    }
}
