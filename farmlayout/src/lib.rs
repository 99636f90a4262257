//! Constrained layout problems for wind farms: turbines are placed inside a boundary,
//! at a minimum spacing from each other, while a user supplied cost is minimized.

/// Spacing and boundary constraints, with their Jacobians
pub mod constraints;

/// Geometric primitives and base algorithms
pub mod geometry;

/// Finite difference verification of analytic gradients
pub mod grad_check;

/// Assembly of the optimization problem handed to a driver
pub mod problem;

/// Randomized, constraint respecting perturbation of a layout
pub mod shuffle;

/// Greedy grid based initial layouts
pub mod smart_start;

/// Helper functions which do not belong to any specific module
pub mod util;
