use std::cmp::Ordering;

/// Float compared with an absolute tolerance of [FPA::EPSILON] (or 4 ulps), through [`float_cmp::approx_eq!()`].
/// Used wherever a residual is tested against zero: points on a boundary rarely land on exactly 0.
#[derive(Debug, Clone, Copy)]
pub struct FPA(pub f64);

impl PartialEq<Self> for FPA {
    fn eq(&self, other: &Self) -> bool {
        float_cmp::approx_eq!(f64, self.0, other.0, epsilon = FPA::EPSILON, ulps = 4)
    }
}

impl PartialOrd<Self> for FPA {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.eq(other) {
            true => Some(Ordering::Equal),
            false => self.0.partial_cmp(&other.0),
        }
    }
}

impl FPA {
    pub const EPSILON: f64 = 1e-9;
}
