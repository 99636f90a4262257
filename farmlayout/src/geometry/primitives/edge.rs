use crate::geometry::geo_traits::DistanceTo;
use crate::geometry::primitives::Point;

/// Line segment between two [`Point`]s.
/// Zero-length edges are allowed, they show up in degenerate boundaries.
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

impl Edge {
    pub fn new(start: Point, end: Point) -> Self {
        Edge { start, end }
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Unit normal pointing to the right of the direction `start -> end`.
    /// For the edges of a counterclockwise polygon, this is the outward normal.
    /// Returns `None` for a zero-length edge.
    pub fn outward_normal(&self) -> Option<(f64, f64)> {
        let (dx, dy) = (self.end.0 - self.start.0, self.end.1 - self.start.1);
        let l = dx.hypot(dy);
        match l {
            0.0 => None,
            _ => Some((dy / l, -dx / l)),
        }
    }

    /// Signed distance from `point` to the line through `self`, positive on the left (interior) side.
    /// Returns the distance together with its gradient w.r.t. `point`.
    ///
    /// A zero-length edge has no line: the negated distance to its vertex is returned,
    /// with a gradient pointing towards the vertex (zero if `point` coincides with it).
    pub fn signed_line_distance(&self, point: &Point) -> (f64, (f64, f64)) {
        match self.outward_normal() {
            Some((nx, ny)) => {
                let d = nx * (self.start.0 - point.0) + ny * (self.start.1 - point.1);
                (d, (-nx, -ny))
            }
            None => {
                let d = self.start.distance_to(point);
                let grad = match d {
                    0.0 => (0.0, 0.0),
                    _ => ((self.start.0 - point.0) / d, (self.start.1 - point.1) / d),
                };
                (-d, grad)
            }
        }
    }

    /// Returns the closest point which lies on the edge to the given point
    pub fn closest_point_on_edge(&self, point: &Point) -> Point {
        //from https://stackoverflow.com/a/6853926
        let Point(x1, y1) = self.start;
        let Point(x2, y2) = self.end;
        let Point(x, y) = *point;

        let a = x - x1;
        let b = y - y1;
        let c = x2 - x1;
        let d = y2 - y1;

        let dot = a * c + b * d;
        let len_sq = c * c + d * d;
        let mut param = -1.0;
        if len_sq != 0.0 {
            param = dot / len_sq;
        }
        let (xx, yy) = match param {
            p if p < 0.0 => (x1, y1),              //start is the closest point
            p if p > 1.0 => (x2, y2),              //end is the closest point
            _ => (x1 + param * c, y1 + param * d), //closest point is on the edge
        };

        Point(xx, yy)
    }
}
