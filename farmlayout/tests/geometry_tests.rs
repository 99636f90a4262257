#[cfg(test)]
mod tests {
    use farmlayout::geometry::convex_hull::convex_hull_from_points;
    use farmlayout::geometry::geo_traits::CollidesWith;
    use farmlayout::geometry::primitives::{Edge, Point, Rect, SPolygon};
    use float_cmp::approx_eq;
    use test_case::test_case;

    fn l_shape() -> SPolygon {
        SPolygon::new(vec![
            Point(0.0, 0.0),
            Point(4.0, 0.0),
            Point(4.0, 2.0),
            Point(2.0, 2.0),
            Point(2.0, 4.0),
            Point(0.0, 4.0),
        ])
        .unwrap()
    }

    #[test]
    fn clockwise_input_is_reversed() {
        let cw = SPolygon::new(vec![
            Point(0.0, 0.0),
            Point(6.0, 0.0),
            Point(6.0, -10.0),
            Point(0.0, -10.0),
        ])
        .unwrap();
        assert!(approx_eq!(f64, cw.area, 60.0));
        assert!(SPolygon::calculate_area(&cw.vertices) > 0.0);
    }

    #[test]
    fn empty_or_non_finite_polygons_are_rejected() {
        assert!(SPolygon::new(vec![]).is_err());
        assert!(SPolygon::new(vec![Point(0.0, 0.0), Point(f64::NAN, 1.0), Point(1.0, 1.0)]).is_err());
    }

    #[test_case(Point(1.0, 1.0), true; "lower arm")]
    #[test_case(Point(1.0, 3.0), true; "upper arm")]
    #[test_case(Point(3.0, 1.0), true; "right arm")]
    #[test_case(Point(3.0, 3.0), false; "notch")]
    #[test_case(Point(-1.0, 1.0), false; "left of polygon")]
    #[test_case(Point(1.0, 2.0), true; "ray through reflex vertex")]
    #[test_case(Point(5.0, 5.0), false; "outside bbox")]
    fn point_in_concave_polygon(p: Point, inside: bool) {
        assert_eq!(l_shape().collides_with(&p), inside);
    }

    #[test]
    fn closest_edge_prefers_first_on_tie() {
        let (idx, closest, sq_d) = l_shape().closest_edge(&Point(3.0, 3.0));
        assert_eq!(idx, 2);
        assert_eq!(closest, Point(3.0, 2.0));
        assert!(approx_eq!(f64, sq_d, 1.0));
    }

    #[test]
    fn signed_line_distance_of_ccw_edge() {
        let edge = Edge::new(Point(0.0, 0.0), Point(4.0, 0.0));
        assert_eq!(edge.outward_normal(), Some((0.0, -1.0)));

        let (d, grad) = edge.signed_line_distance(&Point(2.0, 3.0));
        assert!(approx_eq!(f64, d, 3.0));
        assert_eq!(grad, (0.0, 1.0));

        let (d, _) = edge.signed_line_distance(&Point(10.0, -2.0));
        assert!(approx_eq!(f64, d, -2.0));
    }

    #[test]
    fn degenerate_edge_distance() {
        let edge = Edge::new(Point(1.0, 1.0), Point(1.0, 1.0));
        assert!(edge.is_degenerate());
        assert_eq!(edge.outward_normal(), None);

        let (d, grad) = edge.signed_line_distance(&Point(4.0, 5.0));
        assert!(approx_eq!(f64, d, -5.0));
        assert!(approx_eq!(f64, grad.0, -0.6));
        assert!(approx_eq!(f64, grad.1, -0.8));

        assert_eq!(edge.signed_line_distance(&Point(1.0, 1.0)), (-0.0, (0.0, 0.0)));
        assert_eq!(edge.closest_point_on_edge(&Point(3.0, 3.0)), Point(1.0, 1.0));
    }

    #[test_case(Point(-1.0, 1.0), Point(0.0, 0.0); "before start")]
    #[test_case(Point(2.0, 3.0), Point(2.0, 0.0); "projection")]
    #[test_case(Point(9.0, -1.0), Point(4.0, 0.0); "after end")]
    fn closest_point_on_edge(p: Point, expected: Point) {
        let edge = Edge::new(Point(0.0, 0.0), Point(4.0, 0.0));
        assert_eq!(edge.closest_point_on_edge(&p), expected);
    }

    #[test]
    fn convex_hull_is_ccw_and_drops_interior_points() {
        let points = vec![
            Point(0.0, 0.0),
            Point(2.0, 1.0),
            Point(4.0, 0.0),
            Point(2.0, 0.0),
            Point(4.0, 4.0),
            Point(0.0, 4.0),
            Point(4.0, 4.0),
        ];
        let hull = convex_hull_from_points(points);
        assert_eq!(
            hull,
            vec![Point(0.0, 0.0), Point(4.0, 0.0), Point(4.0, 4.0), Point(0.0, 4.0)]
        );
    }

    #[test]
    fn convex_hull_of_few_points() {
        assert!(convex_hull_from_points(vec![]).is_empty());
        let two = convex_hull_from_points(vec![Point(1.0, 0.0), Point(0.0, 0.0), Point(1.0, 0.0)]);
        assert_eq!(two, vec![Point(0.0, 0.0), Point(1.0, 0.0)]);
    }

    #[test]
    fn rect_operations() {
        let bbox = Rect::bounding_box(&[Point(0.0, 0.0), Point(6.0, -10.0), Point(3.0, -2.0)]).unwrap();
        assert_eq!(bbox, Rect::try_new(0.0, -10.0, 6.0, 0.0).unwrap());
        assert!(Rect::try_new(1.0, 0.0, 0.0, 1.0).is_err());
        assert!(Rect::bounding_box(&[]).is_none());

        let square = bbox.inflate_to_square();
        assert!(approx_eq!(f64, square.width(), 10.0));
        assert!(approx_eq!(f64, square.height(), 10.0));
        assert_eq!(square.centroid(), bbox.centroid());

        let scaled = bbox.scale(2.0);
        assert!(approx_eq!(f64, scaled.width(), 12.0));
        assert!(approx_eq!(f64, scaled.height(), 20.0));
        assert!(bbox.resize_by(-4.0, 0.0).is_none());

        assert!(bbox.collides_with(&Point(6.0, 0.0)));
        assert!(!bbox.collides_with(&Point(6.1, 0.0)));
    }
}
