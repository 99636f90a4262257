use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use farmopt::config::{DriverChoice, OptConfig};
use farmopt::io;
use farmopt::io::cli::Cli;
use farmopt::io::output::Output;
use farmopt::opt::{RandomSearchDriver, SlsqpDriver};
use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use farmlayout::grad_check::DEFAULT_TOL;
use farmlayout::problem::{Driver, HistoryRecorder, NoRecorder, Recorder};
use log::{info, warn};
use rand::SeedableRng;
use rand::prelude::SmallRng;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            OptConfig::default()
        }
        Some(config_file) => {
            let file = File::open(config_file)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).context("incorrect config file format")?
        }
    };

    info!("[MAIN] Successfully parsed OptConfig: {config:?}");

    let input_file_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no valid name")?;

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!(
                "could not create solution folder: {:?}",
                args.solution_folder
            )
        })?;
    }

    let ext_instance = io::read_json_instance(args.input_file.as_path())?;
    let start = Instant::now();
    let mut problem = io::import(&ext_instance, &config)?;

    let mut rng = match config.prng_seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let mut infeasible_after_shuffle = vec![];
    if let Some(shuffle_config) = &config.shuffle {
        let result = problem.shuffle_positions(shuffle_config, &mut rng)?;
        if !result.is_feasible() {
            warn!(
                "[MAIN] shuffle could not place turbines {:?} feasibly",
                result.infeasible
            );
        }
        infeasible_after_shuffle = result.infeasible;
    }

    let gradient_check = config
        .check_gradients
        .then(|| problem.check_gradients(true, DEFAULT_TOL));

    let mut driver: Box<dyn Driver> = match config.driver {
        DriverChoice::Slsqp(slsqp_config) => Box::new(SlsqpDriver::new(slsqp_config)?),
        DriverChoice::RandomSearch(rs_config) => Box::new(RandomSearchDriver::new(rs_config, rng)?),
    };
    let mut history = HistoryRecorder::default();
    let mut no_recorder = NoRecorder;
    let recorder: &mut dyn Recorder = match config.record_history {
        true => &mut history,
        false => &mut no_recorder,
    };
    let (cost, _) = problem.optimize_with_recorder(driver.as_mut(), recorder)?;
    info!("[MAIN] final cost: {cost:.6}");

    let output = Output {
        instance: ext_instance,
        solution: io::export(&problem, infeasible_after_shuffle, start),
        config,
        gradient_check,
        history: history.records,
    };

    let solution_path = args
        .solution_folder
        .join(format!("sol_{input_file_stem}.json"));
    io::write_json(&output, &solution_path)?;

    Ok(())
}
