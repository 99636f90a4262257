use crate::problem::Layout;
use anyhow::{Result, ensure};
use itertools::izip;
use log::{debug, warn};
use ndarray::{ArrayView, Dimension};

/// Positions selected by [smart_start]
#[derive(Clone, Debug)]
pub struct SmartStart {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// Value of the field at every selected position, `NaN` if the position could not be placed
    pub values: Vec<f64>,
}

impl SmartStart {
    /// Number of positions that could be placed
    pub fn n_placed(&self) -> usize {
        self.xs.iter().filter(|x| !x.is_nan()).count()
    }

    pub fn to_layout(&self) -> Layout {
        Layout {
            xs: self.xs.clone(),
            ys: self.ys.clone(),
            extra: None,
        }
    }
}

/// Greedily selects `n_wt` grid points where `zz` is highest, while keeping every pair of
/// selected points at least `min_space` apart.
///
/// `xx`, `yy` and `zz` can be of any dimension but must share the same shape.
/// Candidates are visited in logical (row-major) order, the first of equal maxima is selected.
/// If the grid runs out of candidates, the remaining positions are `NaN`.
pub fn smart_start<D: Dimension>(
    xx: ArrayView<f64, D>,
    yy: ArrayView<f64, D>,
    zz: ArrayView<f64, D>,
    n_wt: usize,
    min_space: f64,
) -> Result<SmartStart> {
    ensure!(
        xx.shape() == yy.shape() && xx.shape() == zz.shape(),
        "grid shapes differ: {:?}, {:?}, {:?}",
        xx.shape(),
        yy.shape(),
        zz.shape()
    );
    ensure!(
        min_space.is_finite() && min_space > 0.0,
        "minimum spacing must be positive, got {min_space}"
    );

    let mut candidates = izip!(xx.iter(), yy.iter(), zz.iter())
        .filter(|(_, _, z)| !z.is_nan())
        .map(|(&x, &y, &z)| (x, y, z))
        .collect::<Vec<_>>();
    let sq_min_space = min_space * min_space;

    let mut selection = SmartStart {
        xs: Vec::with_capacity(n_wt),
        ys: Vec::with_capacity(n_wt),
        values: Vec::with_capacity(n_wt),
    };

    for i in 0..n_wt {
        //first occurrence of the maximum
        let best = candidates
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (idx, &(_, _, z))| match best {
                Some((_, best_z)) if best_z >= z => best,
                _ => Some((idx, z)),
            });

        match best {
            Some((idx, z)) => {
                let (x0, y0, _) = candidates[idx];
                selection.xs.push(x0);
                selection.ys.push(y0);
                selection.values.push(z);
                candidates.retain(|&(x, y, _)| (x - x0).powi(2) + (y - y0).powi(2) >= sq_min_space);
                debug!(
                    "[SS] turbine {i} at ({x0:.3}, {y0:.3}), value: {z:.3}, {} candidates left",
                    candidates.len()
                );
            }
            None => {
                selection.xs.push(f64::NAN);
                selection.ys.push(f64::NAN);
                selection.values.push(f64::NAN);
            }
        }
    }

    let n_placed = selection.n_placed();
    if n_placed < n_wt {
        warn!(
            "[SS] only {n_placed} of {n_wt} turbines could be placed with a minimum spacing of {min_space}"
        );
    }

    Ok(selection)
}
