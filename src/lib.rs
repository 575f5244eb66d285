//! Hencky implements finite-strain hyperelastic and elasto-plastic material points
//!
//! The constitutive models are formulated in logarithmic (Hencky) strain space with
//! the multiplicative decomposition of the deformation gradient. Each material point
//! computes the Cauchy stress and the consistent tangent from a given deformation
//! gradient. An [material::Array] holds many points of mixed models and evaluates
//! them in parallel. Tensors are `russell_tensor::{Tensor2, Tensor4}` with the
//! `Mandel::General` representation.
//!
//! # Examples
//!
//! ```
//! use hencky::base::{Error, SampleParams};
//! use hencky::material::{Elastic, MaterialPoint};
//! use hencky::tensor::t2_general;
//!
//! fn main() -> Result<(), Error> {
//!     let param = SampleParams::param_elastic();
//!     let mut point = Elastic::new(&param)?;
//!     let gamma = 0.02;
//!     let f = t2_general(&[[1.0 + gamma, 0.0, 0.0], [0.0, 1.0 / (1.0 + gamma), 0.0], [0.0, 0.0, 1.0]])?;
//!     point.set_def_grad(&f, true)?;
//!     let sig = point.stress();
//!     assert!((sig.get(0, 0) - 2.0 * param.gg * f64::ln(1.0 + gamma)).abs() < 1e-12);
//!     Ok(())
//! }
//! ```

pub mod base;
pub mod material;
pub mod tensor;
pub use crate::base::{Error, Result};
