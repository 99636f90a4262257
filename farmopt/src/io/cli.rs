use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Optimizes the turbine layout of a JSON instance and writes the result to the solution folder
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Instance with the initial turbines, the boundary and the cost targets
    #[arg(short, long, value_name = "FILE")]
    pub input_file: PathBuf,
    /// Folder receiving `sol_{instance}.json`, created if missing
    #[arg(short, long, value_name = "FOLDER")]
    pub solution_folder: PathBuf,
    /// Driver, shuffle and diagnostics configuration, defaults are used if omitted
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    pub log_level: LevelFilter,
}
