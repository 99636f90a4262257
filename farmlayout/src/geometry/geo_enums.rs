#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeoPosition {
    Exterior,
    Interior,
}

impl GeoPosition {
    /// Sign convention used by the boundary residuals: interior is positive.
    pub fn sign(self) -> f64 {
        match self {
            GeoPosition::Interior => 1.0,
            GeoPosition::Exterior => -1.0,
        }
    }
}
