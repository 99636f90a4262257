use farmlayout::geometry::primitives::Point;
use farmlayout::problem::CostModel;

/// Sum of the squared distances between every turbine and its own target position.
///
/// Stands in for an energy production model: the optimum is known, which makes it useful to validate drivers.
#[derive(Clone, Debug)]
pub struct TargetCost {
    pub targets: Vec<Point>,
    /// Whether the analytic gradient is exposed, finite differences are used otherwise
    pub analytic_gradient: bool,
}

impl TargetCost {
    pub fn new(targets: Vec<Point>) -> Self {
        Self {
            targets,
            analytic_gradient: true,
        }
    }

    pub fn without_gradient(mut self) -> Self {
        self.analytic_gradient = false;
        self
    }
}

impl CostModel for TargetCost {
    fn n_wt(&self) -> usize {
        self.targets.len()
    }

    fn cost(&self, xs: &[f64], ys: &[f64]) -> f64 {
        self.targets
            .iter()
            .zip(xs.iter().zip(ys))
            .map(|(t, (x, y))| (x - t.0).powi(2) + (y - t.1).powi(2))
            .sum()
    }

    fn gradient(&self, xs: &[f64], ys: &[f64]) -> Option<(Vec<f64>, Vec<f64>)> {
        if !self.analytic_gradient {
            return None;
        }
        let dx = xs.iter().zip(&self.targets).map(|(x, t)| 2.0 * (x - t.0)).collect();
        let dy = ys.iter().zip(&self.targets).map(|(y, t)| 2.0 * (y - t.1)).collect();
        Some((dx, dy))
    }
}
