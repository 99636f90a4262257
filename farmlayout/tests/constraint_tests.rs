#[cfg(test)]
mod tests {
    use farmlayout::constraints::{Boundary, BoundaryType, SpacingConstraint};
    use farmlayout::geometry::primitives::Point;
    use farmlayout::grad_check::{fd_jacobian, relative_error};
    use float_cmp::approx_eq;
    use test_case::test_case;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn rectangle() -> Vec<Point> {
        vec![
            Point(0.0, 0.0),
            Point(6.0, 0.0),
            Point(6.0, -10.0),
            Point(0.0, -10.0),
        ]
    }

    fn l_shape() -> Vec<Point> {
        vec![
            Point(0.0, 0.0),
            Point(4.0, 0.0),
            Point(4.0, 2.0),
            Point(2.0, 2.0),
            Point(2.0, 4.0),
            Point(0.0, 4.0),
        ]
    }

    fn split(v: &[f64]) -> (&[f64], &[f64]) {
        v.split_at(v.len() / 2)
    }

    #[test_case(0.0; "zero")]
    #[test_case(-1.0; "negative")]
    #[test_case(f64::NAN; "nan")]
    #[test_case(f64::INFINITY; "infinite")]
    fn invalid_spacing_is_rejected(min_spacing: f64) {
        assert!(SpacingConstraint::new(4, min_spacing).is_err());
    }

    #[test_case(1, 0)]
    #[test_case(2, 1)]
    #[test_case(4, 6)]
    #[test_case(10, 45)]
    fn pair_enumeration(n_wt: usize, n_pairs: usize) {
        let spacing = SpacingConstraint::new(n_wt, 2.0).unwrap();
        assert_eq!(spacing.n_constraints(), n_pairs);

        let pairs = spacing.pairs().collect::<Vec<_>>();
        assert_eq!(pairs.len(), n_pairs);
        for (row, &(i, j)) in pairs.iter().enumerate() {
            assert!(i < j);
            assert_eq!(spacing.pair_index(i, j), row);
            assert_eq!(spacing.pair_index(j, i), row);
        }
    }

    #[test]
    fn spacing_residuals() {
        let spacing = SpacingConstraint::new(3, 2.0).unwrap();
        let r = spacing.residuals(&[0.0, 3.0, 0.0], &[0.0, 0.0, 4.0]);
        assert_eq!(r.to_vec(), vec![5.0, 12.0, 21.0]);

        //coincident turbines
        let r = spacing.residuals(&[1.0, 1.0, 5.0], &[1.0, 1.0, 5.0]);
        assert_eq!(r[spacing.pair_index(0, 1)], -4.0);
    }

    #[test]
    fn spacing_residuals_are_symmetric_under_swap() {
        let spacing = SpacingConstraint::new(4, 2.0).unwrap();
        let (xs, ys) = (vec![0.0, 1.5, 3.0, -2.0], vec![1.0, -0.5, 2.0, 0.0]);
        let r = spacing.residuals(&xs, &ys);

        let (mut xs_swapped, mut ys_swapped) = (xs.clone(), ys.clone());
        xs_swapped.swap(1, 3);
        ys_swapped.swap(1, 3);
        let r_swapped = spacing.residuals(&xs_swapped, &ys_swapped);

        for (i, j) in spacing.pairs() {
            let swap = |k: usize| match k {
                1 => 3,
                3 => 1,
                k => k,
            };
            let row = spacing.pair_index(swap(i), swap(j));
            assert!(approx_eq!(f64, r[spacing.pair_index(i, j)], r_swapped[row]));
        }
    }

    #[test]
    fn spacing_jacobian_matches_finite_differences() {
        let spacing = SpacingConstraint::new(4, 2.0).unwrap();
        let v = [0.0, 1.5, 3.0, -2.0, 1.0, -0.5, 2.0, 0.0];
        let (xs, ys) = split(&v);

        let analytic = spacing.jacobian(xs, ys);
        assert_eq!(analytic.dim(), (6, 8));
        let fd = fd_jacobian(
            |v| {
                let (xs, ys) = split(v);
                spacing.residuals(xs, ys)
            },
            &v,
        );
        assert!(relative_error(analytic.view(), fd.view()) < 1e-6);
    }

    #[test]
    fn closing_vertex_is_dropped() {
        init_logger();
        let mut closed = rectangle();
        closed.push(closed[0]);
        let boundary = Boundary::polygon(&closed).unwrap();
        assert_eq!(boundary.n_vertices(), 4);

        let closed_vertices = boundary.closed_vertices();
        assert_eq!(closed_vertices.len(), 5);
        assert_eq!(closed_vertices.first(), closed_vertices.last());
    }

    #[test]
    fn convex_hull_boundary_drops_interior_points() {
        init_logger();
        let mut points = rectangle();
        points.push(Point(3.0, -5.0));
        let boundary = Boundary::convex_hull(&points).unwrap();
        assert_eq!(boundary.n_vertices(), 4);
        assert_eq!(boundary.btype, BoundaryType::ConvexHull);
    }

    #[test]
    fn empty_boundary_is_rejected() {
        assert!(Boundary::new(&[], BoundaryType::ConvexHull).is_err());
        assert!(Boundary::new(&[], BoundaryType::Polygon).is_err());
        assert!(Boundary::square(&rectangle(), -1.0).is_err());
    }

    #[test_case(Point(3.0, -3.0), 3.0; "inside")]
    #[test_case(Point(1.0, -9.5), 0.5; "near corner")]
    #[test_case(Point(6.0, -5.0), 0.0; "on edge")]
    #[test_case(Point(7.0, -3.0), -1.0; "outside right")]
    #[test_case(Point(3.0, 2.0), -2.0; "outside top")]
    fn convex_boundary_distance(p: Point, expected: f64) {
        init_logger();
        let boundary = Boundary::convex_hull(&rectangle()).unwrap();
        let (d, _) = boundary.distance(&p);
        assert!(approx_eq!(f64, d, expected, epsilon = 1e-12));
        assert_eq!(boundary.contains(&p), expected >= 0.0);
    }

    #[test]
    fn convex_boundary_gradient_is_inward_normal() {
        let boundary = Boundary::convex_hull(&rectangle()).unwrap();
        let (_, (gx, gy)) = boundary.distance(&Point(7.0, -3.0));
        assert!(approx_eq!(f64, gx, -1.0));
        assert!(approx_eq!(f64, gy, 0.0));

        let (_, (gx, gy)) = boundary.distance(&Point(3.0, -9.0));
        assert!(approx_eq!(f64, gx, 0.0));
        assert!(approx_eq!(f64, gy, 1.0));
    }

    #[test_case(Point(1.0, 1.0), 1.0; "lower arm")]
    #[test_case(Point(1.0, 0.5), 0.5; "near bottom")]
    #[test_case(Point(2.0, 3.0), 0.0; "on reflex edge")]
    #[test_case(Point(3.0, 3.0), -1.0; "notch")]
    #[test_case(Point(5.0, 1.0), -1.0; "outside right")]
    fn polygon_boundary_distance(p: Point, expected: f64) {
        init_logger();
        let boundary = Boundary::polygon(&l_shape()).unwrap();
        let (d, _) = boundary.distance(&p);
        assert!(approx_eq!(f64, d, expected, epsilon = 1e-12));
    }

    #[test]
    fn polygon_boundary_gradients() {
        let boundary = Boundary::polygon(&l_shape()).unwrap();

        let (_, (gx, gy)) = boundary.distance(&Point(1.0, 0.5));
        assert!(approx_eq!(f64, gx, 0.0));
        assert!(approx_eq!(f64, gy, 1.0));

        //exactly on the boundary: inward normal of the edge
        let (_, (gx, gy)) = boundary.distance(&Point(2.0, 3.0));
        assert!(approx_eq!(f64, gx, -1.0));
        assert!(approx_eq!(f64, gy, 0.0));

        //outside: pointing back towards the boundary
        let (_, (gx, gy)) = boundary.distance(&Point(5.0, 1.0));
        assert!(approx_eq!(f64, gx, -1.0));
        assert!(approx_eq!(f64, gy, 0.0));
    }

    #[test]
    fn clockwise_polygon_gives_same_distances() {
        let ccw = Boundary::polygon(&l_shape()).unwrap();
        let cw = Boundary::polygon(&l_shape().into_iter().rev().collect::<Vec<_>>()).unwrap();
        for p in [Point(1.0, 1.0), Point(3.0, 3.0), Point(0.5, 3.0)] {
            assert!(approx_eq!(f64, ccw.distance(&p).0, cw.distance(&p).0));
        }
    }

    #[test]
    fn square_and_rectangle_boundaries() {
        let corners = [Point(0.0, 0.0), Point(6.0, -10.0)];

        let square = Boundary::square(&corners, 1.0).unwrap();
        let bbox = square.bbox();
        assert_eq!((bbox.x_min, bbox.x_max), (-3.0, 9.0));
        assert_eq!((bbox.y_min, bbox.y_max), (-11.0, 1.0));
        assert!(approx_eq!(f64, square.distance(&Point(3.0, -5.0)).0, 6.0));

        let rectangle = Boundary::new(&corners, BoundaryType::Rectangle).unwrap();
        assert_eq!(rectangle.n_vertices(), 4);
        assert!(approx_eq!(f64, rectangle.distance(&Point(3.0, -5.0)).0, 3.0));
    }

    #[test]
    fn degenerate_boundary_is_well_defined() {
        init_logger();
        let boundary = Boundary::convex_hull(&[Point(1.0, 1.0)]).unwrap();
        let (d, grad) = boundary.distance(&Point(4.0, 5.0));
        assert!(approx_eq!(f64, d, -5.0));
        assert!(grad.0.is_finite() && grad.1.is_finite());
    }

    #[test_case(BoundaryType::ConvexHull, vec![1.0, 4.5, 7.0, 2.5, -2.0, -8.0, -3.0, -11.0]; "convex")]
    #[test_case(BoundaryType::Polygon, vec![1.0, 3.2, 0.5, 5.0, 0.5, 2.5, 3.0, 1.0]; "polygon")]
    fn boundary_jacobian_matches_finite_differences(btype: BoundaryType, v: Vec<f64>) {
        let points = match btype {
            BoundaryType::Polygon => l_shape(),
            _ => rectangle(),
        };
        let boundary = Boundary::new(&points, btype).unwrap();
        let (xs, ys) = split(&v);

        let analytic = boundary.jacobian(xs, ys);
        assert_eq!(analytic.dim(), (4, 8));
        assert_eq!(boundary.n_constraints(4), 4);
        let fd = fd_jacobian(
            |v| {
                let (xs, ys) = split(v);
                boundary.distances(xs, ys)
            },
            &v,
        );
        assert!(relative_error(analytic.view(), fd.view()) < 1e-6);
    }

    #[test]
    fn violations_are_reported_not_rejected() {
        init_logger();
        let boundary = Boundary::convex_hull(&rectangle()).unwrap();
        let n_outside = boundary.report_violations(&[3.0, 7.0, 3.0], &[-3.0, -3.0, 2.0]);
        assert_eq!(n_outside, 2);
    }
}
