/// Set of functions to compute [convex hulls](https://en.wikipedia.org/wiki/Convex_hull)
pub mod convex_hull;

/// Set of enums representing various geometric properties
pub mod geo_enums;

/// Set of traits representing various geometric properties & operations
pub mod geo_traits;

/// Set of geometric primitives - atomic building blocks for the geometry module
pub mod primitives;
