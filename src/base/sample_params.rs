use super::{ParamElastic, ParamLinearHardening, ParamMaterial};

/// Holds samples of material parameters
pub struct SampleParams {}

impl SampleParams {
    /// Returns sample parameters for the hyperelastic model
    pub fn param_elastic() -> ParamElastic {
        ParamElastic { kk: 12.3, gg: 45.6 }
    }

    /// Returns sample parameters for the elasto-plastic model with linear hardening
    ///
    /// The yield stress is small compared with the moduli, thus yielding starts
    /// at a deviatoric logarithmic strain of about 3 %.
    pub fn param_linear_hardening() -> ParamLinearHardening {
        ParamLinearHardening {
            kk: 10.0,
            gg: 1.0,
            tauy0: 0.1,
            hh: 1.0,
        }
    }

    /// Returns sample parameters for the elasto-plastic model without hardening
    pub fn param_perfect_plasticity() -> ParamLinearHardening {
        ParamLinearHardening {
            kk: 10.0,
            gg: 1.0,
            tauy0: 0.1,
            hh: 0.0,
        }
    }

    /// Returns a sample material table holding one set of each model
    pub fn param_materials() -> Vec<ParamMaterial> {
        vec![
            ParamMaterial::Elastic(SampleParams::param_elastic()),
            ParamMaterial::LinearHardening(SampleParams::param_linear_hardening()),
        ]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
