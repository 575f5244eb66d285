use super::Error;
use serde::{Deserialize, Serialize};

/// Holds the default number of points handled by each parallel task
pub const DEFAULT_MIN_POINTS_PER_TASK: usize = 64;

/// Holds configuration data for the evaluation of arrays of material points
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Evaluates the points in parallel (rayon); otherwise sequentially
    pub parallel: bool,

    /// Minimum number of points handled by each parallel task
    pub min_points_per_task: usize,
}

impl Config {
    /// Allocates a new instance
    pub fn new() -> Self {
        Config {
            parallel: true,
            min_points_per_task: DEFAULT_MIN_POINTS_PER_TASK,
        }
    }

    /// Reads the configuration from a JSON string
    pub fn from_json(data: &str) -> Result<Self, Error> {
        let config: Config = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as a JSON string
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Enables or disables the parallel evaluation
    pub fn set_parallel(&mut self, flag: bool) -> Result<&mut Self, Error> {
        self.parallel = flag;
        Ok(self)
    }

    /// Sets the minimum number of points handled by each parallel task
    pub fn set_min_points_per_task(&mut self, value: usize) -> Result<&mut Self, Error> {
        if value < 1 {
            return Err(Error::InvalidConfig("min_points_per_task must be ≥ 1"));
        }
        self.min_points_per_task = value;
        Ok(self)
    }

    /// Checks the values
    pub fn validate(&self) -> Result<(), Error> {
        if self.min_points_per_task < 1 {
            return Err(Error::InvalidConfig("min_points_per_task must be ≥ 1"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
