use crate::geometry::geo_traits::{CollidesWith, DistanceTo};
use crate::geometry::primitives::Edge;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::Rect;
use anyhow::{Result, bail};
use log::warn;
use ordered_float::OrderedFloat;

/// A Simple Polygon is a polygon that does not intersect itself and contains no holes.
/// It is a closed shape with a finite number of vertices and edges, the last vertex connects back to the first.
/// [read more](https://en.wikipedia.org/wiki/Simple_polygon)
#[derive(Clone, Debug)]
pub struct SPolygon {
    /// Set of points that form the polygon, counterclockwise
    pub vertices: Vec<Point>,
    /// Bounding box
    pub bbox: Rect,
    /// Area of its interior
    pub area: f64,
}

impl SPolygon {
    /// Creates a new simple polygon from a set of points.
    /// Clockwise input is reversed, so that the interior always lies to the left of every edge.
    ///
    /// Degenerate polygons (less than three vertices, no area) are accepted with a warning:
    /// distances to them remain well-defined.
    pub fn new(mut points: Vec<Point>) -> Result<Self> {
        if points.is_empty() {
            bail!("polygon must have at least one vertex");
        }
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            bail!("polygon contains a non-finite vertex: {p:?}");
        }
        if points.len() < 3 {
            warn!("[GEOM] degenerate polygon with {} vertices: {points:?}", points.len());
        }

        let area = match SPolygon::calculate_area(&points) {
            0.0 => {
                warn!("[GEOM] polygon has no area: {points:?}");
                0.0
            }
            area if area < 0.0 => {
                //edges should always be ordered counterclockwise (positive area)
                points.reverse();
                -area
            }
            area => area,
        };

        let bbox = Rect::bounding_box(&points).expect("polygon has vertices");

        Ok(SPolygon {
            vertices: points,
            bbox,
            area,
        })
    }

    pub fn edge(&self, i: usize) -> Edge {
        let j = (i + 1) % self.n_vertices();
        Edge::new(self.vertices[i], self.vertices[j])
    }

    pub fn edge_iter(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.n_vertices()).map(move |i| self.edge(i))
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the index of the edge closest to `point` (first one in case of a tie),
    /// the closest point on that edge and the squared distance to it.
    pub fn closest_edge(&self, point: &Point) -> (usize, Point, f64) {
        self.edge_iter()
            .enumerate()
            .map(|(i, edge)| {
                let closest = edge.closest_point_on_edge(point);
                (i, closest, closest.sq_distance_to(point))
            })
            .min_by_key(|(i, _, sq_d)| (OrderedFloat(*sq_d), *i))
            .expect("polygon has at least one edge")
    }

    //https://en.wikipedia.org/wiki/Shoelace_formula
    //counterclockwise = positive area, clockwise = negative area
    pub fn calculate_area(points: &[Point]) -> f64 {
        let mut sigma: f64 = 0.0;
        for i in 0..points.len() {
            //next point
            let j = (i + 1) % points.len();

            let (x_i, y_i) = points[i].into();
            let (x_j, y_j) = points[j].into();

            sigma += (y_i + y_j) * (x_i - x_j)
        }

        0.5 * sigma
    }

    /// Arithmetic mean of the vertices
    pub fn vertex_mean(&self) -> Point {
        let n = self.n_vertices() as f64;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.0, sy + p.1));
        Point(sx / n, sy / n)
    }
}

impl CollidesWith<Point> for SPolygon {
    fn collides_with(&self, point: &Point) -> bool {
        //based on the ray casting algorithm: https://en.wikipedia.org/wiki/Point_in_polygon#Ray_casting_algorithm
        match self.bbox.collides_with(point) {
            false => false,
            true => {
                //horizontal ray shot to the right.
                //Edges are treated as half-open in y, so a ray passing exactly through a vertex
                //is only counted once for the two edges sharing it.
                let Point(p_x, p_y) = *point;
                let mut n_intersections = 0;
                for edge in self.edge_iter() {
                    let Point(s_x, s_y) = edge.start;
                    let Point(e_x, e_y) = edge.end;
                    if (s_y > p_y) != (e_y > p_y) {
                        let x_cross = s_x + (p_y - s_y) * (e_x - s_x) / (e_y - s_y);
                        if p_x < x_cross {
                            n_intersections += 1;
                        }
                    }
                }
                n_intersections % 2 == 1
            }
        }
    }
}
