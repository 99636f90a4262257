use crate::opt::RandomizeTurbinePosition;
use farmlayout::problem::DriverConfig;
use farmlayout::shuffle::ShuffleConfig;
use serde::{Deserialize, Serialize};

/// Configuration of the SLSQP driver
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SlsqpConfig {
    pub max_iter: usize,
    /// Requested accuracy of the objective
    pub acc: f64,
    /// Maximum constraint violation of a converged solution
    pub feasibility_tol: f64,
}

impl Default for SlsqpConfig {
    fn default() -> Self {
        Self {
            max_iter: 200,
            acc: 1e-8,
            feasibility_tol: 1e-6,
        }
    }
}

/// Configuration of the random search driver, at least one of the limits must be defined
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RandomSearchConfig {
    /// Maximum number of proposals
    pub max_iter: Option<usize>,
    /// Time limit in seconds
    pub max_time: Option<f64>,
    pub randomize: RandomizeTurbinePosition,
    /// Violations up to this value count as feasible
    pub feasibility_tol: f64,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            max_iter: Some(200),
            max_time: Some(600.0),
            randomize: RandomizeTurbinePosition::default(),
            feasibility_tol: 1e-6,
        }
    }
}

/// The driver optimizing the layout, tagged by `kind`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriverChoice {
    Slsqp(SlsqpConfig),
    RandomSearch(RandomSearchConfig),
}

impl Default for DriverChoice {
    fn default() -> Self {
        DriverChoice::Slsqp(SlsqpConfig::default())
    }
}

impl DriverChoice {
    /// SLSQP is disturbed by design variable scaling and gets the physical coordinates, random search does not
    pub fn driver_config(&self) -> DriverConfig {
        match self {
            DriverChoice::Slsqp(_) => DriverConfig {
                optimizer: String::from("SLSQP"),
                scaling_sensitive: true,
            },
            DriverChoice::RandomSearch(_) => DriverConfig {
                optimizer: String::from("random-search"),
                scaling_sensitive: false,
            },
        }
    }
}

/// Configuration of a complete optimization run
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct OptConfig {
    pub driver: DriverChoice,
    /// Seed for the PRNG of the shuffle and the random search. If undefined, entropy is used.
    pub prng_seed: Option<u64>,
    /// Shuffle the initial layout before optimizing, if defined
    pub shuffle: Option<ShuffleConfig>,
    /// Keep every recorded driver iteration in the output
    pub record_history: bool,
    /// Compare all analytic gradients against finite differences before optimizing
    pub check_gradients: bool,
}

impl Default for OptConfig {
    fn default() -> Self {
        Self {
            driver: DriverChoice::default(),
            prng_seed: Some(0),
            shuffle: None,
            record_history: false,
            check_gradients: false,
        }
    }
}
