use crate::constraints::Boundary;
use crate::geometry::geo_traits::DistanceTo;
use crate::geometry::primitives::{Point, Rect};
use crate::problem::Layout;
use anyhow::{Context, Result, ensure};
use log::{Level, debug, log};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// How new positions are proposed
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleMode {
    /// Displacement relative to the current position, proportional to the extent of the boundary
    #[default]
    Rel,
    /// Anywhere in the (padded) bounding box of the boundary
    Abs,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ShuffleConfig {
    pub mode: ShuffleMode,
    /// Maximum number of proposals per turbine
    pub n_iter: usize,
    /// Maximum displacement in [ShuffleMode::Rel], as a fraction of the boundary's extent
    pub step_size: f64,
    /// Scale factor of the bounding box in [ShuffleMode::Abs]
    pub pad: f64,
    /// Absolute expansion of the (scaled) bounding box in [ShuffleMode::Abs]
    pub offset: f64,
    /// Report every turbine that could not be placed at info level instead of debug
    pub verbose: bool,
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            mode: ShuffleMode::Rel,
            n_iter: 1000,
            step_size: 0.1,
            pad: 1.1,
            offset: 5.0,
            verbose: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ShuffleResult {
    pub layout: Layout,
    /// Turbines for which no feasible position was found, they hold their least violating position
    pub infeasible: Vec<usize>,
}

impl ShuffleResult {
    pub fn is_feasible(&self) -> bool {
        self.infeasible.is_empty()
    }
}

/// Samples proposals for a single turbine
struct ProposalSampler {
    mode: ShuffleMode,
    x: Uniform<f64>,
    y: Uniform<f64>,
}

impl ProposalSampler {
    fn new(bbox: Rect, config: &ShuffleConfig) -> Result<Self> {
        let range = match config.mode {
            ShuffleMode::Rel => {
                let (dx, dy) = (config.step_size * bbox.width(), config.step_size * bbox.height());
                Rect::try_new(-dx, -dy, dx, dy)?
            }
            ShuffleMode::Abs => {
                let scaled = bbox.scale(config.pad);
                scaled
                    .resize_by(config.offset, config.offset)
                    .unwrap_or(scaled)
            }
        };
        let x = Uniform::new_inclusive(range.x_min, range.x_max)
            .with_context(|| format!("invalid proposal range in x: {range:?}"))?;
        let y = Uniform::new_inclusive(range.y_min, range.y_max)
            .with_context(|| format!("invalid proposal range in y: {range:?}"))?;
        Ok(Self {
            mode: config.mode,
            x,
            y,
        })
    }

    fn sample(&self, current: Point, rng: &mut impl Rng) -> Point {
        let (x, y) = (self.x.sample(rng), self.y.sample(rng));
        match self.mode {
            ShuffleMode::Rel => Point(current.0 + x, current.1 + y),
            ShuffleMode::Abs => Point(x, y),
        }
    }
}

/// Sum of the boundary and spacing violations of `p` w.r.t. the `obstacles`, zero when feasible
fn violation(p: Point, boundary: &Boundary, obstacles: &[Point], min_spacing: f64) -> f64 {
    let boundary_violation = f64::max(0.0, -boundary.distance(&p).0);
    let spacing_violation = obstacles
        .iter()
        .map(|o| f64::max(0.0, min_spacing - o.distance_to(&p)))
        .sum::<f64>();
    boundary_violation + spacing_violation
}

/// Randomly moves every turbine of `layout` to a new position inside `boundary`,
/// at least `min_spacing` away from all other turbines.
///
/// Turbines are resolved in index order, every turbine already resolved acts as a fixed obstacle.
/// When no feasible proposal is found within `config.n_iter` attempts,
/// the turbine keeps the least violating position seen (its original one included) and is flagged in [ShuffleResult::infeasible].
pub fn shuffle_positions(
    layout: &Layout,
    boundary: &Boundary,
    min_spacing: f64,
    config: &ShuffleConfig,
    rng: &mut impl Rng,
) -> Result<ShuffleResult> {
    ensure!(
        min_spacing.is_finite() && min_spacing >= 0.0,
        "minimum spacing must be non-negative, got {min_spacing}"
    );
    let sampler = ProposalSampler::new(boundary.bbox(), config)?;
    let report_level = match config.verbose {
        true => Level::Info,
        false => Level::Debug,
    };

    let mut resolved: Vec<Point> = Vec::with_capacity(layout.n_wt());
    let mut infeasible = vec![];

    for (i, original) in layout.points().into_iter().enumerate() {
        let mut best = (original, violation(original, boundary, &resolved, min_spacing));
        let mut n_proposals = 0;
        while n_proposals < config.n_iter {
            n_proposals += 1;
            let p = sampler.sample(original, rng);
            let v = violation(p, boundary, &resolved, min_spacing);
            if v < best.1 || v == 0.0 {
                best = (p, v);
            }
            if v == 0.0 {
                break;
            }
        }

        let (p, v) = best;
        if v == 0.0 {
            debug!("[SHUF] turbine {i} placed after {n_proposals} proposals at {p:?}");
        } else {
            log!(
                report_level,
                "[SHUF] no feasible position for turbine {i} after {n_proposals} proposals, best violation: {v:.3e}"
            );
            infeasible.push(i);
        }
        resolved.push(p);
    }

    let mut shuffled = Layout::from_points(&resolved);
    shuffled.extra = layout.extra.clone();

    log!(
        report_level,
        "[SHUF] {} turbines shuffled ({:?}), {} infeasible",
        layout.n_wt(),
        config.mode,
        infeasible.len()
    );

    Ok(ShuffleResult {
        layout: shuffled,
        infeasible,
    })
}
