use super::{eig_sym, finger, from_eig};
use crate::base::Error;
use rayon::prelude::*;
use russell_tensor::Tensor2;

/// Returns the hydrostatic part of a second-order tensor: tr(A) / 3
pub fn hydrostatic(a: &Tensor2) -> f64 {
    a.invariant_sigma_m()
}

/// Returns the deviatoric part of a second-order tensor: A − tr(A) / 3 I
pub fn deviatoric(a: &Tensor2) -> Tensor2 {
    let mut d = Tensor2::new(a.mandel());
    a.deviator(&mut d);
    d
}

/// Returns the equivalent (von Mises) strain
///
/// ```text
/// εeq = √(2/3 Ad : Ad)
/// ```
pub fn epseq(a: &Tensor2) -> f64 {
    a.invariant_eps_d()
}

/// Returns the equivalent (von Mises) stress
///
/// ```text
/// σeq = √(3/2 Ad : Ad)
/// ```
pub fn sigeq(a: &Tensor2) -> f64 {
    a.invariant_sigma_d()
}

/// Computes the logarithmic (Hencky) strain from the deformation gradient
///
/// ```text
/// ε = ½ ln(B)     with B = F · Fᵀ
/// ```
pub fn strain(f: &Tensor2) -> Result<Tensor2, Error> {
    let b = finger(f);
    let (vec, b_val) = eig_sym(&b)?;
    if b_val.iter().any(|v| *v <= 0.0) {
        return Err(Error::InvalidDeformationGradient("F · Fᵀ must be positive-definite"));
    }
    let eps_val = [0.5 * f64::ln(b_val[0]), 0.5 * f64::ln(b_val[1]), 0.5 * f64::ln(b_val[2])];
    Ok(from_eig(&vec, &eps_val))
}

/// Computes the hydrostatic part of an array of tensors
pub fn hydrostatic_all(a: &[Tensor2]) -> Vec<f64> {
    a.par_iter().map(hydrostatic).collect()
}

/// Computes the deviatoric part of an array of tensors
pub fn deviatoric_all(a: &[Tensor2]) -> Vec<Tensor2> {
    a.par_iter().map(deviatoric).collect()
}

/// Computes the equivalent strain of an array of tensors
pub fn epseq_all(a: &[Tensor2]) -> Vec<f64> {
    a.par_iter().map(epseq).collect()
}

/// Computes the equivalent stress of an array of tensors
pub fn sigeq_all(a: &[Tensor2]) -> Vec<f64> {
    a.par_iter().map(sigeq).collect()
}

/// Computes the logarithmic strain of an array of deformation gradients
///
/// Stops at the first failure.
pub fn strain_all(f: &[Tensor2]) -> Result<Vec<Tensor2>, Error> {
    f.par_iter().map(strain).collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
