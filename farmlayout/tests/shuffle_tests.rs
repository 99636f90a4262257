#[cfg(test)]
mod tests {
    use farmlayout::constraints::Boundary;
    use farmlayout::geometry::primitives::Point;
    use farmlayout::problem::Layout;
    use farmlayout::shuffle::{ShuffleConfig, ShuffleMode, shuffle_positions};
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand::prelude::SmallRng;
    use test_case::test_case;

    const MIN_SPACING: f64 = 2.0;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn boundary() -> Boundary {
        Boundary::convex_hull(&[
            Point(0.0, 0.0),
            Point(6.0, 0.0),
            Point(6.0, -10.0),
            Point(0.0, -10.0),
        ])
        .unwrap()
    }

    fn spread_layout() -> Layout {
        Layout::new(vec![1.0, 5.0, 1.0, 5.0], vec![-1.0, -1.0, -9.0, -9.0]).unwrap()
    }

    fn assert_feasible(layout: &Layout, boundary: &Boundary, skip: &[usize]) {
        let points = layout.points();
        for (i, p) in points.iter().enumerate().filter(|(i, _)| !skip.contains(i)) {
            assert!(boundary.distance(p).0 >= 0.0, "turbine {i} at {p:?} outside the boundary");
        }
        for (i, j) in (0..points.len()).tuple_combinations() {
            if skip.contains(&i) || skip.contains(&j) {
                continue;
            }
            let d = (points[i].0 - points[j].0).hypot(points[i].1 - points[j].1);
            assert!(d >= MIN_SPACING, "turbines {i} and {j} are only {d} apart");
        }
    }

    #[test_case(ShuffleMode::Rel, 0; "relative")]
    #[test_case(ShuffleMode::Abs, 0; "absolute")]
    #[test_case(ShuffleMode::Rel, 42; "relative other seed")]
    #[test_case(ShuffleMode::Abs, 42; "absolute other seed")]
    fn shuffled_layout_is_feasible(mode: ShuffleMode, seed: u64) {
        init_logger();
        let config = ShuffleConfig {
            mode,
            ..ShuffleConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(seed);
        let result =
            shuffle_positions(&spread_layout(), &boundary(), MIN_SPACING, &config, &mut rng).unwrap();

        assert!(result.is_feasible(), "infeasible: {:?}", result.infeasible);
        assert_eq!(result.layout.n_wt(), 4);
        assert_feasible(&result.layout, &boundary(), &[]);
        assert_ne!(result.layout, spread_layout());
    }

    #[test]
    fn shuffle_is_reproducible() {
        let config = ShuffleConfig {
            mode: ShuffleMode::Abs,
            ..ShuffleConfig::default()
        };
        let run = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            shuffle_positions(&spread_layout(), &boundary(), MIN_SPACING, &config, &mut rng)
                .unwrap()
                .layout
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn infeasible_turbines_are_flagged() {
        init_logger();
        //no two turbines fit at this spacing
        let min_spacing = 20.0;
        let layout = Layout::new(vec![1.0, 5.0, 3.0], vec![-1.0, -9.0, -5.0]).unwrap();
        let config = ShuffleConfig {
            n_iter: 50,
            verbose: true,
            ..ShuffleConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(0);
        let result = shuffle_positions(&layout, &boundary(), min_spacing, &config, &mut rng).unwrap();

        assert_eq!(result.infeasible, vec![1, 2]);
        assert!(result.layout.is_finite());
        assert!(boundary().distance(&result.layout.point(0)).0 >= 0.0);
    }

    #[test]
    fn extra_values_are_carried_along() {
        let mut layout = spread_layout();
        layout.extra = Some(vec![90.0, 90.0, 110.0, 110.0]);
        let mut rng = SmallRng::seed_from_u64(0);
        let result = shuffle_positions(
            &layout,
            &boundary(),
            MIN_SPACING,
            &ShuffleConfig::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(result.layout.extra, layout.extra);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ShuffleConfig {
            step_size: -0.1,
            ..ShuffleConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(shuffle_positions(&spread_layout(), &boundary(), MIN_SPACING, &config, &mut rng).is_err());
    }

    #[test]
    fn config_defaults_from_partial_json() {
        let config: ShuffleConfig = serde_json::from_str(r#"{"mode": "abs", "offset": 1.0}"#).unwrap();
        assert_eq!(config.mode, ShuffleMode::Abs);
        assert_eq!(config.offset, 1.0);
        assert_eq!(config.n_iter, 1000);
    }
}
