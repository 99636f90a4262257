use crate::geometry::primitives::Point;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Ordered set of turbine positions.
///
/// An optional third value per turbine (hub height, turbine type, ...) is carried along but never optimized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Vec<f64>>,
}

impl Layout {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            bail!(
                "x and y coordinates differ in length: {} != {}",
                xs.len(),
                ys.len()
            );
        }
        Ok(Layout {
            xs,
            ys,
            extra: None,
        })
    }

    pub fn from_points(points: &[Point]) -> Self {
        Layout {
            xs: points.iter().map(|p| p.0).collect(),
            ys: points.iter().map(|p| p.1).collect(),
            extra: None,
        }
    }

    /// Rows of `[x, y]` or `[x, y, extra]`, all rows of the same length
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let width = rows.first().map_or(2, |r| r.len());
        if !(2..=3).contains(&width) {
            bail!("turbine rows must hold 2 or 3 values, got {width}");
        }
        if let Some(row) = rows.iter().find(|r| r.len() != width) {
            bail!("inconsistent turbine row {row:?}, expected {width} values");
        }
        let mut layout = Layout {
            xs: rows.iter().map(|r| r[0]).collect(),
            ys: rows.iter().map(|r| r[1]).collect(),
            extra: None,
        };
        if width == 3 {
            layout.extra = Some(rows.iter().map(|r| r[2]).collect());
        }
        Ok(layout)
    }

    pub fn n_wt(&self) -> usize {
        self.xs.len()
    }

    pub fn point(&self, i: usize) -> Point {
        Point(self.xs[i], self.ys[i])
    }

    pub fn points(&self) -> Vec<Point> {
        self.xs.iter().zip(&self.ys).map(|(&x, &y)| Point(x, y)).collect()
    }

    pub fn is_finite(&self) -> bool {
        self.xs.iter().chain(&self.ys).all(|v| v.is_finite())
    }
}
