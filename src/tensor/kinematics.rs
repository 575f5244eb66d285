use crate::base::Error;
use russell_lab::vec_all_finite;
use russell_tensor::{t2_dot_t2, Mandel, Tensor2, Tensor4};

/// Allocates a general second-order tensor from its standard components `a[i][j]`
pub fn t2_general(a: &[[f64; 3]; 3]) -> Result<Tensor2, Error> {
    Tensor2::from_matrix(a, Mandel::General).map_err(Error::Tensor)
}

/// Returns true if all components of a second-order tensor are finite
pub fn t2_is_finite(a: &Tensor2) -> bool {
    vec_all_finite(a.vector(), false).is_ok()
}

/// Returns true if all components of a fourth-order tensor are finite
pub fn t4_is_finite(dd: &Tensor4) -> bool {
    dd.matrix().as_data().iter().all(|v| v.is_finite())
}

/// Computes the Finger tensor
///
/// ```text
/// B = F · Fᵀ
/// ```
///
/// The result is [Mandel::General].
pub fn finger(f: &Tensor2) -> Tensor2 {
    let mut ft = Tensor2::new(f.mandel());
    f.transpose(&mut ft);
    let mut b = Tensor2::new(Mandel::General);
    t2_dot_t2(&mut b, f, &ft);
    b
}

/// Computes the push-forward of a second-order tensor
///
/// ```text
/// C = A · B · Aᵀ
/// ```
///
/// # Panics
///
/// A panic will occur if `a` or `b` are not [Mandel::General].
pub fn push_forward(a: &Tensor2, b: &Tensor2) -> Tensor2 {
    let mut at = Tensor2::new(Mandel::General);
    a.transpose(&mut at);
    let mut ab = Tensor2::new(Mandel::General);
    t2_dot_t2(&mut ab, a, b);
    let mut c = Tensor2::new(Mandel::General);
    t2_dot_t2(&mut c, &ab, &at);
    c
}

/// Computes the inverse of a second-order tensor
pub fn inverse(a: &Tensor2) -> Result<Tensor2, Error> {
    let mut ai = Tensor2::new(a.mandel());
    match a.inverse(&mut ai, 0.0) {
        Some(_) => Ok(ai),
        None => Err(Error::InvalidDeformationGradient("the tensor is singular")),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
