use hencky::base::{Error, SampleParams};
use hencky::material::{Elastic, LinearHardening, MaterialPoint};
use hencky::tensor::{inverse, t2_general};
use russell_tensor::{t2_dot_t2, Mandel, Tensor2, Tensor4};

// Consistency of the tangent with the stress update
//
// TEST GOAL
//
// Verifies the analytical tangent against a finite-difference approximation of the
// first Piola-Kirchhoff stress. With P = τ · F⁻ᵀ and τ = J σ:
//
// ```text
// dPₖᵢ ≈ J Σ F⁻¹ᵢⱼ Cⱼₖₘₗ F⁻¹_qₗ dF_mq
// ```
//
// The directional derivative is computed with a forward difference along a fixed
// (non-symmetric) direction dF.

const H: f64 = 1e-7;

const DIRECTION: [[f64; 3]; 3] = [[0.3, -0.7, 0.2], [0.5, 0.1, -0.4], [-0.6, 0.8, 0.9]];

fn piola(sigma: &Tensor2, f: &Tensor2) -> Tensor2 {
    let jj = f.determinant();
    let finv = inverse(f).unwrap();
    let mut finv_t = Tensor2::new(Mandel::General);
    finv.transpose(&mut finv_t);
    let mut tau = sigma.clone();
    tau.vector_mut().map(|v| v * jj);
    let mut pp = Tensor2::new(Mandel::General);
    t2_dot_t2(&mut pp, &tau, &finv_t);
    pp
}

fn perturbed(f: &Tensor2) -> Tensor2 {
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = f.get(i, j) + H * DIRECTION[i][j];
        }
    }
    t2_general(&out).unwrap()
}

/// Returns the maximum difference relative to the largest component of the numerical derivative
fn check_tangent(f: &Tensor2, sigma: &Tensor2, tangent: &Tensor4, sigma_perturbed: &Tensor2) -> f64 {
    let jj = f.determinant();
    let finv = inverse(f).unwrap();
    let p0 = piola(sigma, f);
    let p1 = piola(sigma_perturbed, &perturbed(f));
    let mut max_err: f64 = 0.0;
    let mut max_val: f64 = 0.0;
    for k in 0..3 {
        for i in 0..3 {
            let numerical = (p1.get(k, i) - p0.get(k, i)) / H;
            let mut analytical = 0.0;
            for j in 0..3 {
                for m in 0..3 {
                    for l in 0..3 {
                        for q in 0..3 {
                            analytical +=
                                jj * finv.get(i, j) * tangent.get(j, k, m, l) * finv.get(q, l) * DIRECTION[m][q];
                        }
                    }
                }
            }
            max_err = f64::max(max_err, f64::abs(analytical - numerical));
            max_val = f64::max(max_val, f64::abs(numerical));
        }
    }
    max_err / max_val
}

fn check_elastic(f: &[[f64; 3]; 3]) -> Result<f64, Error> {
    let f = t2_general(f)?;
    let mut point = Elastic::new(&SampleParams::param_elastic())?;
    let res = point.evaluate(&f, true)?;
    let res_perturbed = point.evaluate(&perturbed(&f), false)?;
    Ok(check_tangent(&f, &res.stress, &res.tangent.unwrap(), &res_perturbed.stress))
}

fn check_plastic(point: &LinearHardening, f: &[[f64; 3]; 3], yielding: bool) -> Result<f64, Error> {
    let f = t2_general(f)?;
    let mut trial = point.clone();
    let res = trial.evaluate(&f, true)?;
    assert_eq!(trial.yielding(), yielding);
    let res_perturbed = trial.evaluate(&perturbed(&f), false)?;
    Ok(check_tangent(&f, &res.stress, &res.tangent.unwrap(), &res_perturbed.stress))
}

#[test]
fn test_consistency_elastic() -> Result<(), Error> {
    let general = [[1.3, 0.1, 0.0], [0.05, 0.8, 0.02], [0.0, 0.03, 1.1]];
    assert!(check_elastic(&general)? < 1e-5);

    // two equal eigenvalues
    let axisymmetric = [[1.2, 0.0, 0.0], [0.0, 0.9, 0.0], [0.0, 0.0, 0.9]];
    assert!(check_elastic(&axisymmetric)? < 1e-5);
    Ok(())
}

#[test]
fn test_consistency_linear_hardening() -> Result<(), Error> {
    // load along isochoric extension with commits
    let mut point = LinearHardening::new(&SampleParams::param_linear_hardening())?;
    let n = 20;
    for i in 1..=n {
        let lam = 0.2 * (i as f64) / (n as f64);
        let f = t2_general(&[[1.0 + lam, 0.0, 0.0], [0.0, 1.0 / (1.0 + lam), 0.0], [0.0, 0.0, 1.0]])?;
        point.set_def_grad(&f, false)?;
        point.commit();
    }
    assert!(point.history().epsp_t > 0.0);

    // further plastic loading in a general direction
    let loading = [[1.25, 0.05, 0.0], [0.02, 1.0 / 1.2, 0.01], [0.0, 0.02, 1.0]];
    assert!(check_plastic(&point, &loading, true)? < 1e-5);

    // elastic unloading
    let unloading = [[1.18, 0.0, 0.0], [0.0, 1.0 / 1.18, 0.0], [0.0, 0.0, 1.0]];
    assert!(check_plastic(&point, &unloading, false)? < 1e-5);
    Ok(())
}

#[test]
fn test_consistency_linear_hardening_axisymmetric() -> Result<(), Error> {
    // two equal eigenvalues of the trial Finger tensor in the plastic regime
    let mut point = LinearHardening::new(&SampleParams::param_linear_hardening())?;
    let axisymmetric = |lam: f64| {
        let lat = 1.0 / f64::sqrt(1.0 + lam);
        [[1.0 + lam, 0.0, 0.0], [0.0, lat, 0.0], [0.0, 0.0, lat]]
    };
    let n = 10;
    for i in 1..=n {
        point.set_def_grad(&t2_general(&axisymmetric(0.3 * (i as f64) / (n as f64)))?, false)?;
        point.commit();
    }
    assert!(check_plastic(&point, &axisymmetric(0.33), true)? < 1e-5);
    Ok(())
}
