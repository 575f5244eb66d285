//! Implements the symmetric eigensolver, kinematic helpers, invariants, unit tensors, and flat buffers
//!
//! All tensors are `russell_tensor::{Tensor2, Tensor4}` with the [russell_tensor::Mandel::General]
//! representation, because deformation gradients are not symmetric and the spatial
//! tangent has no minor symmetry.

mod eigen;
mod flat;
mod invariants;
mod kinematics;
mod unit;
pub use crate::tensor::eigen::*;
pub use crate::tensor::flat::*;
pub use crate::tensor::invariants::*;
pub use crate::tensor::kinematics::*;
pub use crate::tensor::unit::*;
