/// Containment of every turbine inside the site boundary
pub mod boundary;

/// Minimum separation between every pair of turbines
pub mod spacing;

#[doc(inline)]
pub use boundary::Boundary;
#[doc(inline)]
pub use boundary::BoundaryType;
#[doc(inline)]
pub use spacing::SpacingConstraint;
