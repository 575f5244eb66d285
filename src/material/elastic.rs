use super::{eigen_derivative, log_elastic_modulus, log_strain, spatial_tangent, split_mean_deviator, volume_ratio};
use super::{MaterialPoint, ModelType, Response};
use crate::base::{Error, ParamElastic};
use crate::tensor::{eig_sym, finger, from_eig};
use russell_tensor::{Mandel, Tensor2, Tensor4};

/// Computes the response of the hyperelastic model
///
/// ```text
/// Be = F · Fᵀ
/// ε = ½ ln(be)      (principal values)
/// τ = 3K εm + 2G εd
/// σ = τ / J
/// ```
///
/// The points of a batch sharing the same parameters call this function directly.
pub(crate) fn elastic_response(param: &ParamElastic, f: &Tensor2, with_tangent: bool) -> Result<Response, Error> {
    let jj = volume_ratio(f)?;
    let be = finger(f);
    let (vec, be_val) = eig_sym(&be)?;
    let eps = log_strain(&be_val)?;
    let (epsm, epsd) = split_mean_deviator(&eps);

    // principal Kirchhoff stress
    let tau_val = [
        3.0 * param.kk * epsm + 2.0 * param.gg * epsd[0],
        3.0 * param.kk * epsm + 2.0 * param.gg * epsd[1],
        3.0 * param.kk * epsm + 2.0 * param.gg * epsd[2],
    ];
    let stress = from_eig(&vec, &[tau_val[0] / jj, tau_val[1] / jj, tau_val[2] / jj]);
    if !with_tangent {
        return Ok(Response { stress, tangent: None });
    }

    // d(ln Be)/dBe with gc = 2 (εn − εm) / (be_n − be_m)
    let mut gc = [[0.0; 3]; 3];
    for m in 0..3 {
        for n in 0..3 {
            gc[m][n] = if be_val[m] == be_val[n] {
                1.0 / be_val[m]
            } else {
                2.0 * (eps[n] - eps[m]) / (be_val[n] - be_val[m])
            };
        }
    }
    let dlnbe_dbe = eigen_derivative(&vec, &gc)?;
    let dtau_dlnbe = log_elastic_modulus(param.kk, param.gg);
    let tau = from_eig(&vec, &tau_val);
    let tangent = spatial_tangent(&dtau_dlnbe, &dlnbe_dbe, &be, &tau, jj);
    Ok(Response {
        stress,
        tangent: Some(tangent),
    })
}

/// Implements the hyperelastic material point in logarithmic strain space
///
/// This model has no history: the stress is fully determined by the current
/// deformation gradient.
#[derive(Clone, Debug)]
pub struct Elastic {
    /// Holds the parameters
    param: ParamElastic,

    /// Deformation gradient F
    def_grad: Tensor2,

    /// Cauchy stress σ
    stress: Tensor2,

    /// Consistent tangent C
    tangent: Option<Tensor4>,
}

impl Elastic {
    /// Allocates a new instance (at the undeformed state)
    pub fn new(param: &ParamElastic) -> Result<Self, Error> {
        param.validate()?;
        let def_grad = Tensor2::identity(Mandel::General);
        let response = elastic_response(param, &def_grad, true)?;
        Ok(Elastic {
            param: *param,
            def_grad,
            stress: response.stress,
            tangent: response.tangent,
        })
    }

    /// Returns the parameters
    pub fn param(&self) -> &ParamElastic {
        &self.param
    }
}

impl MaterialPoint for Elastic {
    fn kind(&self) -> ModelType {
        ModelType::Elastic
    }

    fn k(&self) -> f64 {
        self.param.kk
    }

    fn g(&self) -> f64 {
        self.param.gg
    }

    /// Returns zero always
    fn epsp(&self) -> f64 {
        0.0
    }

    fn set_def_grad(&mut self, f: &Tensor2, with_tangent: bool) -> Result<(), Error> {
        let response = elastic_response(&self.param, f, with_tangent)?;
        self.def_grad = f.clone();
        self.stress = response.stress;
        self.tangent = response.tangent;
        Ok(())
    }

    fn def_grad(&self) -> &Tensor2 {
        &self.def_grad
    }

    fn stress(&self) -> &Tensor2 {
        &self.stress
    }

    fn tangent(&self) -> Option<&Tensor4> {
        self.tangent.as_ref()
    }

    /// Does nothing (no history)
    fn commit(&mut self) {}
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
