use crate::geometry::convex_hull::convex_hull_from_points;
use crate::geometry::geo_enums::GeoPosition;
use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::primitives::{Point, Rect, SPolygon};
use crate::util::FPA;
use anyhow::{Context, Result, bail, ensure};
use log::{debug, warn};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// The way a [`Boundary`] is derived from its defining points
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub enum BoundaryType {
    /// Convex hull of the points
    #[default]
    ConvexHull,
    /// The points are the vertices of an arbitrary (possibly concave) simple polygon
    Polygon,
    /// Axis-aligned square, centered on the bounding box of the points with a side equal to its largest dimension,
    /// expanded by `margin` on every side
    Square { margin: f64 },
    /// Axis-aligned bounding box of the points
    Rectangle,
}

/// Region in which all turbines must remain.
///
/// Exactly one residual is exposed per turbine, for every [`BoundaryType`]:
/// the signed distance to the boundary, positive inside, negative outside and zero on the boundary itself.
#[derive(Clone, Debug)]
pub struct Boundary {
    pub btype: BoundaryType,
    /// Vertices as they define the boundary. Hull order for convex boundaries, input order for polygons.
    pub vertices: Vec<Point>,
    /// Counterclockwise polygon used for all distance computations
    pub shape: SPolygon,
}

impl Boundary {
    pub fn new(points: &[Point], btype: BoundaryType) -> Result<Self> {
        ensure!(!points.is_empty(), "boundary must have at least one vertex");
        let mut points = points.to_vec();
        if points.len() > 1 && points.first() == points.last() {
            //explicitly closed outline
            points.pop();
        }

        let vertices = match btype {
            BoundaryType::ConvexHull => {
                let n_points = points.len();
                let hull = convex_hull_from_points(points);
                if hull.len() < n_points {
                    debug!(
                        "[BOUND] {} of {} boundary points are not part of the convex hull",
                        n_points - hull.len(),
                        n_points
                    );
                }
                hull
            }
            BoundaryType::Polygon => points,
            BoundaryType::Square { margin } => {
                ensure!(
                    margin.is_finite() && margin >= 0.0,
                    "square boundary margin must be non-negative, got {margin}"
                );
                let bbox = Rect::bounding_box(&points).context("no points")?;
                match bbox.inflate_to_square().resize_by(margin, margin) {
                    Some(square) => square.corners().to_vec(),
                    None => bail!("invalid square boundary around {bbox:?}"),
                }
            }
            BoundaryType::Rectangle => {
                let bbox = Rect::bounding_box(&points).context("no points")?;
                bbox.corners().to_vec()
            }
        };

        let shape = SPolygon::new(vertices.clone())?;

        Ok(Boundary {
            btype,
            vertices,
            shape,
        })
    }

    pub fn convex_hull(points: &[Point]) -> Result<Self> {
        Boundary::new(points, BoundaryType::ConvexHull)
    }

    pub fn polygon(points: &[Point]) -> Result<Self> {
        Boundary::new(points, BoundaryType::Polygon)
    }

    pub fn square(points: &[Point], margin: f64) -> Result<Self> {
        Boundary::new(points, BoundaryType::Square { margin })
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Vertices with the first one repeated at the end
    pub fn closed_vertices(&self) -> Vec<Point> {
        let mut closed = self.vertices.clone();
        closed.push(self.vertices[0]);
        closed
    }

    pub fn bbox(&self) -> Rect {
        self.shape.bbox
    }

    /// Number of residuals for a layout of `n_wt` turbines
    pub fn n_constraints(&self, n_wt: usize) -> usize {
        n_wt
    }

    /// Signed distance from `point` to the boundary and its gradient w.r.t. `point`
    pub fn distance(&self, point: &Point) -> (f64, (f64, f64)) {
        match self.btype {
            BoundaryType::Polygon => self.polygon_distance(point),
            _ => self.convex_distance(point),
        }
    }

    /// The most restrictive signed distance over the lines through all edges (first edge wins ties).
    /// Only meaningful for convex boundaries.
    fn convex_distance(&self, point: &Point) -> (f64, (f64, f64)) {
        self.shape
            .edge_iter()
            .map(|edge| edge.signed_line_distance(point))
            .fold(None, |min: Option<(f64, (f64, f64))>, (d, grad)| match min {
                Some((min_d, _)) if min_d <= d => min,
                _ => Some((d, grad)),
            })
            .expect("boundary has at least one edge")
    }

    /// Distance to the closest edge segment, signed by a point-in-polygon test.
    /// Concave boundaries need the parity test: the closest edge alone does not tell on which side a point lies.
    fn polygon_distance(&self, point: &Point) -> (f64, (f64, f64)) {
        let (edge_idx, closest, sq_d) = self.shape.closest_edge(point);
        let sign = match self.shape.collides_with(point) {
            true => GeoPosition::Interior,
            false => GeoPosition::Exterior,
        }
        .sign();
        let d = sq_d.sqrt();
        if d == 0.0 {
            //exactly on the boundary: inward normal of the edge
            let (_, inward) = self.shape.edge(edge_idx).signed_line_distance(point);
            (0.0, inward)
        } else {
            (
                sign * d,
                (sign * (point.0 - closest.0) / d, sign * (point.1 - closest.1) / d),
            )
        }
    }

    /// One residual per turbine, in turbine order
    pub fn distances(&self, xs: &[f64], ys: &[f64]) -> Array1<f64> {
        debug_assert!(xs.len() == ys.len());
        xs.iter()
            .zip(ys)
            .map(|(&x, &y)| self.distance(&Point(x, y)).0)
            .collect()
    }

    /// Jacobian of [Boundary::distances]: one row per turbine,
    /// columns ordered `[x_0, ..., x_{n-1}, y_0, ..., y_{n-1}]`.
    /// Each residual only depends on the coordinates of its own turbine.
    pub fn jacobian(&self, xs: &[f64], ys: &[f64]) -> Array2<f64> {
        debug_assert!(xs.len() == ys.len());
        let n = xs.len();
        let mut jac = Array2::zeros((n, 2 * n));
        for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
            let (_, (gx, gy)) = self.distance(&Point(x, y));
            jac[[i, i]] = gx;
            jac[[i, n + i]] = gy;
        }
        jac
    }

    /// Whether `point` lies inside or on the boundary, with a small tolerance
    pub fn contains(&self, point: &Point) -> bool {
        FPA(self.distance(point).0) >= FPA(0.0)
    }

    /// Logs a warning for every point of the layout lying outside the boundary, returns the number of such points
    pub fn report_violations(&self, xs: &[f64], ys: &[f64]) -> usize {
        let mut n_outside = 0;
        for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
            let (d, _) = self.distance(&Point(x, y));
            if FPA(d) < FPA(0.0) {
                warn!("[BOUND] turbine {i} at ({x:.3}, {y:.3}) lies {:.3} outside the boundary", -d);
                n_outside += 1;
            }
        }
        n_outside
    }
}
