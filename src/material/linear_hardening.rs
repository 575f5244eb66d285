use super::{eigen_derivative, log_elastic_modulus, log_strain, spatial_tangent, split_mean_deviator, volume_ratio};
use super::{MaterialPoint, ModelType, Response};
use crate::base::{Error, ParamLinearHardening};
use crate::tensor::{eig_sym, from_eig, inverse, push_forward};
use russell_tensor::{t2_dot_t2, Mandel, Tensor2, Tensor4, IDENTITY2, P_SYM, TWO_BY_3};

/// Defines an alias to IDENTITY2
const I: &[f64; 9] = &IDENTITY2;

/// Defines an alias to P_SYM
const PS: &[[f64; 9]; 9] = &P_SYM;

/// Holds the data committed at the end of each accepted step
///
/// A host application saving and restoring a simulation must preserve these values.
#[derive(Clone, Debug)]
pub struct History {
    /// Deformation gradient F_t at the last commit
    pub def_grad_t: Tensor2,

    /// Elastic Finger tensor Be_t at the last commit
    pub be_t: Tensor2,

    /// Accumulated plastic strain at the last commit
    pub epsp_t: f64,
}

impl History {
    /// Returns the history of the undeformed state
    pub fn new() -> Self {
        History {
            def_grad_t: Tensor2::identity(Mandel::General),
            be_t: Tensor2::identity(Mandel::General),
            epsp_t: 0.0,
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

/// Implements the elasto-plastic material point with linear isotropic hardening
///
/// The elastic predictor uses the trial elastic Finger tensor:
///
/// ```text
/// fΔ = F · F_t⁻¹
/// Be_trial = fΔ · Be_t · fΔᵀ
/// ```
///
/// The von Mises yield function in terms of the Kirchhoff stress is:
///
/// ```text
/// φ = τeq − (τy0 + H εp_t)      with τeq = √(3/2 τd : τd)
/// ```
///
/// If φ > 0, the radial return gives the plastic multiplier `Δγ = φ / (3G + H)`.
#[derive(Clone, Debug)]
pub struct LinearHardening {
    /// Holds the parameters
    param: ParamLinearHardening,

    /// Committed state
    history: History,

    /// Deformation gradient F (current)
    def_grad: Tensor2,

    /// Elastic Finger tensor Be (current, uncommitted)
    be: Tensor2,

    /// Accumulated plastic strain (current, uncommitted)
    epsp: f64,

    /// Plastic multiplier Δγ of the last evaluation
    delta_gamma: f64,

    /// Cauchy stress σ
    stress: Tensor2,

    /// Consistent tangent C
    tangent: Option<Tensor4>,
}

/// Holds the result of the stress update before it is stored
#[derive(Clone, Debug)]
pub(crate) struct Update {
    be: Tensor2,
    epsp: f64,
    delta_gamma: f64,
    stress: Tensor2,
    tangent: Option<Tensor4>,
}

impl Update {
    /// Returns a copy of the stress and tangent
    pub(crate) fn response(&self) -> Response {
        Response {
            stress: self.stress.clone(),
            tangent: self.tangent.clone(),
        }
    }
}

impl LinearHardening {
    /// Allocates a new instance (at the undeformed state)
    pub fn new(param: &ParamLinearHardening) -> Result<Self, Error> {
        param.validate()?;
        let mut point = LinearHardening {
            param: *param,
            history: History::new(),
            def_grad: Tensor2::identity(Mandel::General),
            be: Tensor2::identity(Mandel::General),
            epsp: 0.0,
            delta_gamma: 0.0,
            stress: Tensor2::new(Mandel::General),
            tangent: None,
        };
        point.set_def_grad(&Tensor2::identity(Mandel::General), true)?;
        Ok(point)
    }

    /// Returns the parameters
    pub fn param(&self) -> &ParamLinearHardening {
        &self.param
    }

    /// Returns the initial yield stress τy0
    pub fn tauy0(&self) -> f64 {
        self.param.tauy0
    }

    /// Returns the hardening modulus H
    pub fn hh(&self) -> f64 {
        self.param.hh
    }

    /// Returns the (uncommitted) elastic Finger tensor Be
    pub fn be(&self) -> &Tensor2 {
        &self.be
    }

    /// Returns the plastic multiplier Δγ of the last evaluation (zero if elastic)
    pub fn delta_gamma(&self) -> f64 {
        self.delta_gamma
    }

    /// Returns true if the last evaluation went through the return map
    pub fn yielding(&self) -> bool {
        self.delta_gamma > 0.0
    }

    /// Returns the committed history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Restores a previously saved history and recomputes the stress at F = F_t
    ///
    /// On error, the point is left unchanged.
    pub fn restore_history(&mut self, history: &History) -> Result<(), Error> {
        volume_ratio(&history.def_grad_t)?;
        if history.be_t.mandel() != Mandel::General {
            return Err(Error::InvalidDeformationGradient("Be_t must be a general tensor"));
        }
        if !history.epsp_t.is_finite() || history.epsp_t < 0.0 {
            return Err(Error::InvalidMaterialParameters("the plastic strain must be finite and ≥ 0"));
        }
        let (_, be_val) = eig_sym(&history.be_t)?;
        log_strain(&be_val)?;
        let update = self.trial(&history.def_grad_t, history, true)?;
        self.history = history.clone();
        self.store(&history.def_grad_t, update);
        Ok(())
    }

    /// Runs the elastic predictor, the return map, and the tangent computation
    ///
    /// Nothing is stored; see [LinearHardening::store].
    pub(crate) fn trial(&self, f: &Tensor2, history: &History, with_tangent: bool) -> Result<Update, Error> {
        let (kk, gg, hh) = (self.param.kk, self.param.gg, self.param.hh);
        let jj = volume_ratio(f)?;

        // trial state
        let finv_t = inverse(&history.def_grad_t)?;
        let mut f_delta = Tensor2::new(Mandel::General);
        t2_dot_t2(&mut f_delta, f, &finv_t);
        let be_trial = push_forward(&f_delta, &history.be_t);
        let (vec, be_val) = eig_sym(&be_trial)?;
        let eps = log_strain(&be_val)?;
        let (epsm, epsd) = split_mean_deviator(&eps);
        let taum = 3.0 * kk * epsm;
        let mut taud = [2.0 * gg * epsd[0], 2.0 * gg * epsd[1], 2.0 * gg * epsd[2]];
        let taueq = f64::sqrt(1.5 * (taud[0] * taud[0] + taud[1] * taud[1] + taud[2] * taud[2]));

        // yield function
        let phi = taueq - (self.param.tauy0 + hh * history.epsp_t);

        // elastic or plastic update
        let (be, epsp, delta_gamma, nn_val) = if phi > 0.0 {
            if !(taueq > 0.0) {
                return Err(Error::InvalidMaterialParameters("the equivalent stress vanishes at yielding"));
            }
            let delta_gamma = phi / (3.0 * gg + hh);
            let nn_val = [1.5 * taud[0] / taueq, 1.5 * taud[1] / taueq, 1.5 * taud[2] / taueq];
            let factor = 1.0 - 3.0 * gg * delta_gamma / taueq;
            let mut be_val_new = [0.0; 3];
            for a in 0..3 {
                taud[a] *= factor;
                be_val_new[a] = f64::exp(2.0 * (epsm + taud[a] / (2.0 * gg)));
            }
            tracing::trace!(delta_gamma, taueq, phi, "return map");
            (from_eig(&vec, &be_val_new), history.epsp_t + delta_gamma, delta_gamma, Some(nn_val))
        } else {
            (be_trial.clone(), history.epsp_t, 0.0, None)
        };

        // Cauchy stress
        let tau_val = [taum + taud[0], taum + taud[1], taum + taud[2]];
        let stress = from_eig(&vec, &[tau_val[0] / jj, tau_val[1] / jj, tau_val[2] / jj]);
        if !with_tangent {
            return Ok(Update {
                be,
                epsp,
                delta_gamma,
                stress,
                tangent: None,
            });
        }

        // dτ/d(ln Be)
        let dtau_dlnbe = match nn_val {
            None => log_elastic_modulus(kk, gg),
            Some(nn_val) => {
                let nn = from_eig(&vec, &nn_val);
                let a1 = gg / (hh + 3.0 * gg);
                let a0 = if delta_gamma != 0.0 { delta_gamma * gg / taueq } else { 0.0 };
                let c_ii = 0.5 * (kk - TWO_BY_3 * gg) + a0 * gg;
                let c_i4s = (1.0 - 3.0 * a0) * gg;
                let c_nn = 2.0 * gg * (a0 - a1);
                let n = nn.vector();
                let mut dd = Tensor4::new(Mandel::General);
                let mat = dd.matrix_mut();
                for i in 0..9 {
                    for j in 0..9 {
                        mat.set(i, j, c_ii * I[i] * I[j] + c_i4s * PS[i][j] + c_nn * n[i] * n[j]);
                    }
                }
                dd
            }
        };

        // d(ln Be)/dBe with gc = (ln be_n − ln be_m) / (be_n − be_m) around the trial state
        let mut gc = [[0.0; 3]; 3];
        for m in 0..3 {
            for n in 0..3 {
                gc[m][n] = if be_val[m] == be_val[n] {
                    1.0 / be_val[m]
                } else {
                    (f64::ln(be_val[n]) - f64::ln(be_val[m])) / (be_val[n] - be_val[m])
                };
            }
        }
        let dlnbe_dbe = eigen_derivative(&vec, &gc)?;
        let tau = from_eig(&vec, &tau_val);
        let tangent = spatial_tangent(&dtau_dlnbe, &dlnbe_dbe, &be_trial, &tau, jj);
        Ok(Update {
            be,
            epsp,
            delta_gamma,
            stress,
            tangent: Some(tangent),
        })
    }

    /// Stores the results of an update computed by [LinearHardening::trial]
    pub(crate) fn store(&mut self, f: &Tensor2, update: Update) {
        self.def_grad = f.clone();
        self.be = update.be;
        self.epsp = update.epsp;
        self.delta_gamma = update.delta_gamma;
        self.stress = update.stress;
        self.tangent = update.tangent;
    }
}

impl MaterialPoint for LinearHardening {
    fn kind(&self) -> ModelType {
        ModelType::LinearHardening
    }

    fn k(&self) -> f64 {
        self.param.kk
    }

    fn g(&self) -> f64 {
        self.param.gg
    }

    fn epsp(&self) -> f64 {
        self.epsp
    }

    fn set_def_grad(&mut self, f: &Tensor2, with_tangent: bool) -> Result<(), Error> {
        let update = self.trial(f, &self.history, with_tangent)?;
        self.store(f, update);
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

    /// Commits F, Be, and εp; must be called once per accepted step
    fn commit(&mut self) {
        self.history = History {
            def_grad_t: self.def_grad.clone(),
            be_t: self.be.clone(),
            epsp_t: self.epsp,
        };
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{History, LinearHardening};
    use crate::base::{Error, ParamLinearHardening, SampleParams};
    use crate::material::{MaterialPoint, ModelType};
    use crate::tensor::{deviatoric, sigeq, t2_general};
    use russell_lab::approx_eq;
    use russell_tensor::{Mandel, Tensor2, IDENTITY2};

    fn uniaxial(lam: f64) -> Tensor2 {
        t2_general(&[[1.0 + lam, 0.0, 0.0], [0.0, 1.0 / (1.0 + lam), 0.0], [0.0, 0.0, 1.0]]).unwrap()
    }

    fn assert_initial_history(history: &History) {
        assert_eq!(history.def_grad_t.vector().as_data(), &IDENTITY2);
        assert_eq!(history.be_t.vector().as_data(), &IDENTITY2);
        assert_eq!(history.epsp_t, 0.0);
    }

    #[test]
    fn new_works() {
        let param = SampleParams::param_linear_hardening();
        let point = LinearHardening::new(&param).unwrap();
        assert_eq!(point.kind(), ModelType::LinearHardening);
        assert!(point.is_plastic());
        assert!(!point.is_elastic());
        assert_eq!((point.k(), point.g(), point.tauy0(), point.hh()), (10.0, 1.0, 0.1, 1.0));
        assert_eq!(point.param(), &param);
        assert_eq!(point.epsp(), 0.0);
        assert!(point.stress().vector().as_data().iter().all(|v| *v == 0.0));
        assert_eq!(point.be().vector().as_data(), &IDENTITY2);
        assert_initial_history(point.history());
        assert!(point.tangent().is_some());
        assert!(!point.yielding());

        let bad = ParamLinearHardening {
            kk: 1.0,
            gg: 1.0,
            tauy0: -1.0,
            hh: 0.0,
        };
        assert!(matches!(LinearHardening::new(&bad), Err(Error::InvalidMaterialParameters(_))));
    }

    #[test]
    fn elastic_step_works() {
        let param = SampleParams::param_linear_hardening();
        let mut point = LinearHardening::new(&param).unwrap();
        let lam = 0.01;
        point.set_def_grad(&uniaxial(lam), true).unwrap();
        assert!(!point.yielding());
        assert_eq!(point.epsp(), 0.0);
        let correct = 2.0 * param.gg * f64::ln(1.0 + lam);
        approx_eq(point.stress().get(0, 0), correct, 1e-14);
        approx_eq(point.stress().get(1, 1), -correct, 1e-14);
    }

    #[test]
    fn plastic_step_works() {
        let param = SampleParams::param_linear_hardening();
        let mut point = LinearHardening::new(&param).unwrap();
        let lam = 0.2;
        point.set_def_grad(&uniaxial(lam), true).unwrap();
        assert!(point.yielding());

        // closed form of the radial return for a single step from the undeformed state
        let gg = param.gg;
        let eps = f64::ln(1.0 + lam);
        let taueq_trial = f64::sqrt(1.5 * 2.0 * (2.0 * gg * eps) * (2.0 * gg * eps));
        let phi = taueq_trial - param.tauy0;
        let delta_gamma = phi / (3.0 * gg + param.hh);
        approx_eq(point.delta_gamma(), delta_gamma, 1e-14);
        approx_eq(point.epsp(), delta_gamma, 1e-14);

        // the corrected stress lies on the updated yield surface
        let tau = point.stress(); // J = 1
        approx_eq(sigeq(&deviatoric(tau)), param.tauy0 + param.hh * delta_gamma, 1e-13);

        // the history is untouched until committed
        assert_eq!(point.history().epsp_t, 0.0);
        point.commit();
        approx_eq(point.history().epsp_t, delta_gamma, 1e-14);
        assert_eq!(point.history().def_grad_t.vector().as_data(), uniaxial(lam).vector().as_data());
    }

    #[test]
    fn trial_does_not_store_anything() {
        let point = LinearHardening::new(&SampleParams::param_linear_hardening()).unwrap();
        let update = point.trial(&uniaxial(0.2), point.history(), false).unwrap();
        assert!(update.response().tangent.is_none());
        assert_eq!(point.epsp(), 0.0);
        assert!(!point.yielding());
        let mut point = point;
        point.store(&uniaxial(0.2), update);
        assert!(point.yielding());
        assert!(point.epsp() > 0.0);
        assert!(point.tangent().is_none());
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut point = LinearHardening::new(&SampleParams::param_linear_hardening()).unwrap();
        let f = t2_general(&[[1.15, 0.1, 0.0], [0.02, 0.9, 0.01], [0.0, 0.0, 1.05]]).unwrap();
        point.set_def_grad(&f, true).unwrap();
        let (stress, tangent, epsp) = (point.stress().clone(), point.tangent().unwrap().clone(), point.epsp());
        point.set_def_grad(&uniaxial(0.3), true).unwrap();
        point.set_def_grad(&f, true).unwrap();
        assert_eq!(point.stress().vector().as_data(), stress.vector().as_data());
        assert_eq!(point.tangent().unwrap().matrix().as_data(), tangent.matrix().as_data());
        assert_eq!(point.epsp(), epsp);
        assert_initial_history(point.history());
    }

    #[test]
    fn unloading_after_yielding_keeps_plastic_strain() {
        let mut point = LinearHardening::new(&SampleParams::param_linear_hardening()).unwrap();
        point.set_def_grad(&uniaxial(0.2), false).unwrap();
        point.increment();
        let epsp = point.epsp();
        assert!(epsp > 0.0);
        point.set_def_grad(&uniaxial(0.19), false).unwrap();
        assert!(!point.yielding());
        assert_eq!(point.epsp(), epsp);
    }

    #[test]
    fn set_def_grad_captures_errors() {
        let mut point = LinearHardening::new(&SampleParams::param_linear_hardening()).unwrap();
        point.set_def_grad(&uniaxial(0.2), true).unwrap();
        let stress = point.stress().clone();
        let singular = t2_general(&[[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        assert!(matches!(
            point.set_def_grad(&singular, true),
            Err(Error::InvalidDeformationGradient(_))
        ));
        assert_eq!(point.stress().vector().as_data(), stress.vector().as_data());
    }

    #[test]
    fn history_can_be_restored() {
        let param = SampleParams::param_linear_hardening();
        let mut point = LinearHardening::new(&param).unwrap();
        point.set_def_grad(&uniaxial(0.2), true).unwrap();
        point.commit();
        let saved = point.history().clone();
        let stress = point.stress().clone();

        let mut other = LinearHardening::new(&param).unwrap();
        other.restore_history(&saved).unwrap();
        assert_eq!(other.history().epsp_t, saved.epsp_t);
        assert_eq!(other.history().be_t.vector().as_data(), saved.be_t.vector().as_data());
        assert_eq!(other.def_grad().vector().as_data(), saved.def_grad_t.vector().as_data());
        for i in 0..3 {
            for j in 0..3 {
                approx_eq(other.stress().get(i, j), stress.get(i, j), 1e-13);
            }
        }

        let mut wrong = saved.clone();
        wrong.epsp_t = -1.0;
        assert!(matches!(other.restore_history(&wrong), Err(Error::InvalidMaterialParameters(_))));
        let mut wrong = saved.clone();
        wrong.be_t = t2_general(&[[1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        assert!(matches!(other.restore_history(&wrong), Err(Error::InvalidDeformationGradient(_))));
        let mut wrong = saved.clone();
        wrong.be_t = Tensor2::identity(Mandel::Symmetric);
        assert!(matches!(other.restore_history(&wrong), Err(Error::InvalidDeformationGradient(_))));
        let mut wrong = saved.clone();
        wrong.def_grad_t.vector_mut()[0] = f64::NAN;
        assert!(matches!(other.restore_history(&wrong), Err(Error::InvalidDeformationGradient(_))));
        assert_eq!(other.history().epsp_t, saved.epsp_t);
    }
}
