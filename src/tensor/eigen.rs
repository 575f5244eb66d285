use crate::base::Error;
use russell_tensor::{Mandel, Tensor2, SQRT_2};

/// Holds the maximum number of Jacobi sweeps
pub const EIGEN_MAX_SWEEPS: usize = 50;

/// Holds the number of initial sweeps that skip small off-diagonal components
const EIGEN_N_SWEEPS_THRESHOLD: usize = 4;

/// Holds the three principal values (unsorted)
pub type Principal = [f64; 3];

/// Holds the eigenvectors as the columns of a 3×3 matrix: vecₐ[i] = vec[i][a]
pub type EigenVectors = [[f64; 3]; 3];

/// Computes the eigenvalues and eigenvectors of a symmetric second-order tensor
///
/// Uses the cyclic Jacobi rotation algorithm sweeping the upper triangle. Only the
/// upper triangle of `a` is referenced. During the first sweeps, rotations
/// are skipped for off-diagonal components smaller than a threshold; after that,
/// components that are negligible compared with both associated diagonal
/// entries are set to zero.
///
/// # Output
///
/// Returns `(vec, val)` where the columns of `vec` are the normalized eigenvectors
/// and `val` holds the (unsorted) eigenvalues, such that
///
/// ```text
/// A = Σₐ val[a] vecₐ ⊗ vecₐ
/// ```
///
/// # Errors
///
/// Returns [Error::EigenDecompositionFailure] if the off-diagonal components do not
/// vanish within [EIGEN_MAX_SWEEPS] sweeps (e.g., NaN input).
pub fn eig_sym(a: &Tensor2) -> Result<(EigenVectors, Principal), Error> {
    // the upper triangle is destroyed during the iterations
    let mut aa = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in i..3 {
            aa[i][j] = a.get(i, j);
        }
    }
    let mut vec = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    let mut val = [aa[0][0], aa[1][1], aa[2][2]];

    for sweep in 0..EIGEN_MAX_SWEEPS {
        // test for convergence
        let mut so = 0.0;
        for p in 0..3 {
            for q in (p + 1)..3 {
                so += f64::abs(aa[p][q]);
            }
        }
        if so == 0.0 {
            return Ok((vec, val));
        }

        let thresh = if sweep < EIGEN_N_SWEEPS_THRESHOLD {
            0.2 * so / 9.0
        } else {
            0.0
        };

        for p in 0..3 {
            for q in (p + 1)..3 {
                let apq = aa[p][q];
                let g = 100.0 * f64::abs(apq);
                if sweep > EIGEN_N_SWEEPS_THRESHOLD
                    && f64::abs(val[p]) + g == f64::abs(val[p])
                    && f64::abs(val[q]) + g == f64::abs(val[q])
                {
                    aa[p][q] = 0.0;
                } else if f64::abs(apq) > thresh {
                    // rotation angle
                    let h = val[q] - val[p];
                    let t = if f64::abs(h) + g == f64::abs(h) {
                        apq / h
                    } else {
                        let theta = 0.5 * h / apq;
                        if theta < 0.0 {
                            -1.0 / (f64::sqrt(1.0 + theta * theta) - theta)
                        } else {
                            1.0 / (f64::sqrt(1.0 + theta * theta) + theta)
                        }
                    };
                    let c = 1.0 / f64::sqrt(1.0 + t * t);
                    let s = t * c;
                    let z = t * apq;

                    // apply rotation
                    aa[p][q] = 0.0;
                    val[p] -= z;
                    val[q] += z;
                    for r in 0..p {
                        let t = aa[r][p];
                        aa[r][p] = c * t - s * aa[r][q];
                        aa[r][q] = s * t + c * aa[r][q];
                    }
                    for r in (p + 1)..q {
                        let t = aa[p][r];
                        aa[p][r] = c * t - s * aa[r][q];
                        aa[r][q] = s * t + c * aa[r][q];
                    }
                    for r in (q + 1)..3 {
                        let t = aa[p][r];
                        aa[p][r] = c * t - s * aa[q][r];
                        aa[q][r] = s * t + c * aa[q][r];
                    }

                    // update eigenvectors
                    for r in 0..3 {
                        let t = vec[r][p];
                        vec[r][p] = c * t - s * vec[r][q];
                        vec[r][q] = s * t + c * vec[r][q];
                    }
                }
            }
        }
    }
    Err(Error::EigenDecompositionFailure(EIGEN_MAX_SWEEPS))
}

/// Reconstructs a symmetric second-order tensor from eigenvectors and (principal) values
///
/// ```text
/// A = Σₐ val[a] vecₐ ⊗ vecₐ
/// ```
///
/// The values may be obtained from the eigenvalues by applying a scalar
/// function (e.g., `ln` or `exp`), which yields the corresponding isotropic
/// tensor function. The result is [Mandel::General] with zero skew components.
pub fn from_eig(vec: &EigenVectors, val: &Principal) -> Tensor2 {
    let c = |i: usize, j: usize| {
        val[0] * vec[i][0] * vec[j][0] + val[1] * vec[i][1] * vec[j][1] + val[2] * vec[i][2] * vec[j][2]
    };
    let mut a = Tensor2::new(Mandel::General);
    let v = a.vector_mut();
    v[0] = c(0, 0);
    v[1] = c(1, 1);
    v[2] = c(2, 2);
    v[3] = SQRT_2 * c(0, 1);
    v[4] = SQRT_2 * c(1, 2);
    v[5] = SQRT_2 * c(0, 2);
    a
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
