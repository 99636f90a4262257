use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use farmlayout::constraints::Boundary;
use farmlayout::problem::{Layout, LayoutProblem};
use log::{LevelFilter, info};
use serde::Serialize;

use crate::EPOCH;
use crate::config::OptConfig;
use crate::cost::TargetCost;
use crate::io::ext_repr::{ExtInstance, ExtSolution};

pub mod cli;
pub mod ext_repr;
pub mod output;

pub fn read_json_instance(path: &Path) -> Result<ExtInstance> {
    let file = File::open(path)
        .with_context(|| format!("could not open instance file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("could not parse instance file: {}", path.display()))
}

pub fn write_json(json: &impl Serialize, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not open solution file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, json)
        .with_context(|| format!("could not write solution file: {}", path.display()))?;

    info!(
        "[IO] solution written to {:?}",
        fs::canonicalize(path).unwrap_or(path.to_path_buf())
    );
    Ok(())
}

pub fn init_logger(level_filter: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            let handle = std::thread::current();
            let thread_name = handle.name().unwrap_or("-");

            let duration = EPOCH.elapsed();
            let sec = duration.as_secs() % 60;
            let min = (duration.as_secs() / 60) % 60;
            let hours = (duration.as_secs() / 60) / 60;

            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}] <{}>",
                record.level(),
                hours,
                min,
                sec,
                thread_name,
            );

            out.finish(format_args!("{prefix:<27}{message}"))
        })
        // Add blanket level filter -
        .level(level_filter)
        .chain(std::io::stdout())
        .apply()?;
    info!("[MAIN] time: {}", jiff::Timestamp::now());
    Ok(())
}

/// Builds the [LayoutProblem] described by an [ExtInstance]
pub fn import(ext_instance: &ExtInstance, config: &OptConfig) -> Result<LayoutProblem> {
    let layout = Layout::from_rows(&ext_instance.turbines).context("invalid turbine positions")?;
    let boundary = Boundary::new(&ext_instance.boundary, ext_instance.boundary_type)
        .context("invalid boundary")?;

    let mut cost = TargetCost::new(ext_instance.targets.clone());
    if ext_instance.finite_differences {
        cost = cost.without_gradient();
    }
    LayoutProblem::new(
        layout,
        boundary,
        Box::new(cost),
        ext_instance.min_spacing,
        &config.driver.driver_config(),
    )
    .with_context(|| format!("could not build problem for instance '{}'", ext_instance.name))
}

/// Exports the current state of a [LayoutProblem], after it was optimized
pub fn export(problem: &LayoutProblem, infeasible_after_shuffle: Vec<usize>, start: Instant) -> ExtSolution {
    let layout = problem.layout();
    let turbines = (0..layout.n_wt())
        .map(|i| {
            let mut row = vec![layout.xs[i], layout.ys[i]];
            if let Some(extra) = &layout.extra {
                row.push(extra[i]);
            }
            row
        })
        .collect();
    let eval = problem.evaluate(&problem.design_vector().to_vec());
    let last_run = problem.last_run();

    ExtSolution {
        cost: problem.cost(),
        turbines,
        converged: last_run.is_some_and(|r| r.converged),
        n_iter: last_run.map_or(0, |r| r.n_iter),
        n_evals: last_run.map_or(0, |r| r.n_evals),
        max_violation: eval.max_violation(),
        infeasible_after_shuffle,
        run_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        timestamp: jiff::Timestamp::now().to_string(),
    }
}
