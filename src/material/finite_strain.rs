use crate::base::Error;
use crate::tensor::{t2_is_finite, EigenVectors, Principal};
use russell_lab::Vector;
use russell_tensor::{
    t2_dyad_t2_update, t2_odyad_t2, t2_udyad_t2, t4_add, t4_ddot_t4, vec_dyad_vec, Mandel, Tensor2, Tensor4,
    IDENTITY2, ONE_BY_3, P_SYMDEV,
};

/// Defines an alias to IDENTITY2
const I: &[f64; 9] = &IDENTITY2;

/// Defines an alias to P_SYMDEV
const PSD: &[[f64; 9]; 9] = &P_SYMDEV;

/// Returns the volume ratio J = det(F) of an admissible deformation gradient
pub(crate) fn volume_ratio(f: &Tensor2) -> Result<f64, Error> {
    if f.mandel() != Mandel::General {
        return Err(Error::InvalidDeformationGradient("F must be a general (non-symmetric) tensor"));
    }
    if !t2_is_finite(f) {
        return Err(Error::InvalidDeformationGradient("F must be finite"));
    }
    let jj = f.determinant();
    if !(jj > 0.0) || !jj.is_finite() {
        return Err(Error::InvalidDeformationGradient("det(F) must be > 0"));
    }
    Ok(jj)
}

/// Computes the principal logarithmic strains ε = ½ ln(be) of an elastic Finger tensor
pub(crate) fn log_strain(be_val: &Principal) -> Result<Principal, Error> {
    if be_val.iter().any(|v| !(*v > 0.0) || !v.is_finite()) {
        return Err(Error::InvalidDeformationGradient(
            "the elastic Finger tensor must be positive-definite",
        ));
    }
    Ok([
        0.5 * f64::ln(be_val[0]),
        0.5 * f64::ln(be_val[1]),
        0.5 * f64::ln(be_val[2]),
    ])
}

/// Splits principal strains into the mean value εm and the deviator εd
pub(crate) fn split_mean_deviator(eps: &Principal) -> (f64, Principal) {
    let epsm = (eps[0] + eps[1] + eps[2]) * ONE_BY_3;
    (epsm, [eps[0] - epsm, eps[1] - epsm, eps[2] - epsm])
}

/// Returns the elastic modulus in logarithmic strain space
///
/// ```text
/// dτ/d(ln Be) = ½ K I ⊗ I + G Psymdev
/// ```
pub(crate) fn log_elastic_modulus(kk: f64, gg: f64) -> Tensor4 {
    let mut dd = Tensor4::new(Mandel::General);
    let mat = dd.matrix_mut();
    for i in 0..9 {
        for j in 0..9 {
            mat.set(i, j, 0.5 * kk * I[i] * I[j] + gg * PSD[i][j]);
        }
    }
    dd
}

/// Assembles the derivative of an isotropic tensor function in its eigenbasis
///
/// ```text
/// D = Σₘₙ gc[m][n] Mₘₙ ⊗ Mₘₙ     with Mₘₙ = vₘ ⊗ vₙ
/// ```
///
/// where the columns of `vec` are the eigenvectors and `gc` holds the divided
/// differences of the function (its derivative on the diagonal).
pub(crate) fn eigen_derivative(vec: &EigenVectors, gc: &[[f64; 3]; 3]) -> Result<Tensor4, Error> {
    let v: Vec<Vector> = (0..3).map(|m| Vector::from(&[vec[0][m], vec[1][m], vec[2][m]])).collect();
    let mut dd = Tensor4::new(Mandel::General);
    let mut mmn = Tensor2::new(Mandel::General);
    for m in 0..3 {
        for n in 0..3 {
            vec_dyad_vec(&mut mmn, 1.0, &v[m], &v[n]).map_err(Error::Tensor)?;
            t2_dyad_t2_update(&mut dd, gc[m][n], &mmn, &mmn);
        }
    }
    Ok(dd)
}

/// Computes the spatial tangent from the chain rule in logarithmic strain space
///
/// ```text
/// dBe/dL = I ⊗̄ Be + Be ⊗̲ I
/// Kmat = dτ/d(ln Be) : d(ln Be)/dBe : dBe/dL
/// Kgeo = −I ⊗̄ τ
/// C = (Kgeo + Kmat) / J
/// ```
///
/// # Panics
///
/// A panic will occur if `be` or `tau` are not [Mandel::General].
pub(crate) fn spatial_tangent(
    dtau_dlnbe: &Tensor4,
    dlnbe_dbe: &Tensor4,
    be: &Tensor2,
    tau: &Tensor2,
    jj: f64,
) -> Tensor4 {
    let ii = Tensor2::identity(Mandel::General);
    let mut dbe_dl = Tensor4::new(Mandel::General);
    t2_odyad_t2(&mut dbe_dl, 1.0, &ii, be);
    let mut aux = Tensor4::new(Mandel::General);
    t2_udyad_t2(&mut aux, 1.0, be, &ii);
    dbe_dl.update(1.0, &aux);

    let mut dtau_dbe = Tensor4::new(Mandel::General);
    t4_ddot_t4(&mut dtau_dbe, 1.0, dtau_dlnbe, dlnbe_dbe);
    let mut kmat = Tensor4::new(Mandel::General);
    t4_ddot_t4(&mut kmat, 1.0, &dtau_dbe, &dbe_dl);

    let mut kgeo = Tensor4::new(Mandel::General);
    t2_odyad_t2(&mut kgeo, -1.0, &ii, tau);

    let mut out = Tensor4::new(Mandel::General);
    t4_add(&mut out, 1.0 / jj, &kgeo, 1.0 / jj, &kmat);
    out
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Error;
    use crate::tensor::{eig_sym, from_eig, t2_general};
    use russell_lab::approx_eq;
    use russell_tensor::t4_ddot_t2;

    #[test]
    fn volume_ratio_captures_errors() {
        assert_eq!(volume_ratio(&Tensor2::identity(Mandel::General)).unwrap(), 1.0);
        let inverted = t2_general(&[[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        assert!(matches!(volume_ratio(&inverted), Err(Error::InvalidDeformationGradient(_))));
        let singular = t2_general(&[[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        assert!(matches!(volume_ratio(&singular), Err(Error::InvalidDeformationGradient(_))));
        let nan = t2_general(&[[1.0, 0.0, 0.0], [0.0, f64::NAN, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        assert!(matches!(volume_ratio(&nan), Err(Error::InvalidDeformationGradient(_))));
        let symmetric = Tensor2::identity(Mandel::Symmetric);
        assert!(matches!(volume_ratio(&symmetric), Err(Error::InvalidDeformationGradient(_))));
    }

    #[test]
    fn log_strain_and_split_work() {
        let e = f64::exp(1.0);
        let eps = log_strain(&[e * e, 1.0, 1.0 / (e * e)]).unwrap();
        approx_eq(eps[0], 1.0, 1e-15);
        approx_eq(eps[1], 0.0, 1e-15);
        approx_eq(eps[2], -1.0, 1e-15);
        let (epsm, epsd) = split_mean_deviator(&[1.0, 2.0, 6.0]);
        assert_eq!(epsm, 3.0);
        assert_eq!(epsd, [-2.0, -1.0, 3.0]);
        assert!(log_strain(&[1.0, 0.0, 1.0]).is_err());
    }

    #[test]
    fn eigen_derivative_matches_numerical_derivative() {
        // derivative of ln(A) in the direction dA
        let a = [[2.0, 0.3, 0.1], [0.3, 1.5, -0.2], [0.1, -0.2, 1.2]];
        let (vec, val) = eig_sym(&t2_general(&a).unwrap()).unwrap();
        let mut gc = [[0.0; 3]; 3];
        for m in 0..3 {
            for n in 0..3 {
                gc[m][n] = if val[m] == val[n] {
                    1.0 / val[m]
                } else {
                    (f64::ln(val[n]) - f64::ln(val[m])) / (val[n] - val[m])
                };
            }
        }
        let dd = eigen_derivative(&vec, &gc).unwrap();
        let da = [[0.1, -0.2, 0.3], [-0.2, 0.5, 0.05], [0.3, 0.05, -0.4]];
        let h = 1e-6;
        let log_of = |x: &[[f64; 3]; 3]| {
            let (v, w) = eig_sym(&t2_general(x).unwrap()).unwrap();
            from_eig(&v, &[f64::ln(w[0]), f64::ln(w[1]), f64::ln(w[2])])
        };
        let mut a_plus = a;
        let mut a_minus = a;
        for i in 0..3 {
            for j in 0..3 {
                a_plus[i][j] += h * da[i][j];
                a_minus[i][j] -= h * da[i][j];
            }
        }
        let lp = log_of(&a_plus);
        let lm = log_of(&a_minus);
        let mut analytical = Tensor2::new(Mandel::General);
        t4_ddot_t2(&mut analytical, 1.0, &dd, &t2_general(&da).unwrap());
        for i in 0..3 {
            for j in 0..3 {
                approx_eq(analytical.get(i, j), (lp.get(i, j) - lm.get(i, j)) / (2.0 * h), 1e-8);
            }
        }
    }

    #[test]
    fn spatial_tangent_at_identity_is_elastic_modulus() {
        let (kk, gg) = (3.0, 2.0);
        let modulus = log_elastic_modulus(kk, gg);
        let iden = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let dlog = eigen_derivative(&iden, &[[1.0; 3]; 3]).unwrap();
        let be = Tensor2::identity(Mandel::General);
        let tau = Tensor2::new(Mandel::General);
        let tangent = spatial_tangent(&modulus, &dlog, &be, &tau, 1.0);
        let mat = tangent.matrix();
        for m in 0..9 {
            for n in 0..9 {
                let correct = kk * I[m] * I[n] + 2.0 * gg * PSD[m][n];
                approx_eq(mat.get(m, n), correct, 1e-14);
            }
        }
    }

    #[test]
    fn spatial_tangent_carries_the_geometric_term() {
        // with a zero modulus only Kgeoᵢⱼₖₗ = −δᵢₖ τⱼₗ / J remains
        let zero = Tensor4::new(Mandel::General);
        let be = Tensor2::identity(Mandel::General);
        let tau = t2_general(&[[1.0, 2.0, 0.0], [2.0, 3.0, 0.0], [0.0, 0.0, 4.0]]).unwrap();
        let tangent = spatial_tangent(&zero, &zero, &be, &tau, 2.0);
        approx_eq(tangent.get(0, 1, 0, 0), -1.0, 1e-14);
        approx_eq(tangent.get(1, 1, 1, 0), -1.0, 1e-14);
        approx_eq(tangent.get(2, 2, 2, 2), -2.0, 1e-14);
        approx_eq(tangent.get(0, 1, 1, 0), 0.0, 1e-14);
    }
}
