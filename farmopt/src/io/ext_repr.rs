use farmlayout::constraints::BoundaryType;
use farmlayout::geometry::primitives::Point;
use serde::{Deserialize, Serialize};

/// External representation of a layout optimization instance
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtInstance {
    /// The name of the instance
    pub name: String,
    /// Initial turbine positions, rows of `[x, y]` or `[x, y, extra]`
    pub turbines: Vec<Vec<f64>>,
    /// Points defining the boundary, `[x, y]` each
    pub boundary: Vec<Point>,
    #[serde(default)]
    pub boundary_type: BoundaryType,
    pub min_spacing: f64,
    /// Target position of every turbine, the cost is the sum of the squared distances to them
    pub targets: Vec<Point>,
    /// Hide the analytic gradient of the cost from the driver
    #[serde(default)]
    pub finite_differences: bool,
}

/// External representation of an optimized layout
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtSolution {
    pub cost: f64,
    /// Final turbine positions, in the format of [ExtInstance::turbines]
    pub turbines: Vec<Vec<f64>>,
    pub converged: bool,
    pub n_iter: usize,
    pub n_evals: usize,
    /// Largest constraint violation of the final layout
    pub max_violation: f64,
    /// Turbines the shuffle could not place feasibly
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub infeasible_after_shuffle: Vec<usize>,
    pub run_time_ms: f64,
    pub timestamp: String,
}
