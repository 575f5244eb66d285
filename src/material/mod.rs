//! Implements the finite-strain material points and the array of points

mod array;
mod elastic;
mod finite_strain;
mod linear_hardening;
mod material_point;
mod model_type;
pub use crate::material::array::*;
pub use crate::material::elastic::*;
pub(crate) use crate::material::finite_strain::*;
pub use crate::material::linear_hardening::*;
pub use crate::material::material_point::*;
pub use crate::material::model_type::*;
