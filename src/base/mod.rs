//! Implements the base structures: errors, configuration, and material parameters

mod config;
mod error;
mod parameters;
mod sample_params;
pub use crate::base::config::*;
pub use crate::base::error::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_params::*;
