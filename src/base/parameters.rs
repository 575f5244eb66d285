use super::Error;
use serde::{Deserialize, Serialize};

/// Holds parameters for the hyperelastic model in logarithmic strain space
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamElastic {
    /// Bulk modulus K
    pub kk: f64,

    /// Shear modulus G
    pub gg: f64,
}

/// Holds parameters for the elasto-plastic model with linear isotropic hardening
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamLinearHardening {
    /// Bulk modulus K
    pub kk: f64,

    /// Shear modulus G
    pub gg: f64,

    /// Initial yield stress τy0
    ///
    /// This value corresponds to the equivalent Kirchhoff stress:
    ///
    /// ```text
    /// φ = τeq − (τy0 + H εp)
    /// ```
    pub tauy0: f64,

    /// Hardening modulus H
    pub hh: f64,
}

/// Holds parameters for any of the available material models
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum ParamMaterial {
    /// Hyperelastic model
    Elastic(ParamElastic),

    /// Elasto-plastic model with linear isotropic hardening
    LinearHardening(ParamLinearHardening),
}

fn check_moduli(kk: f64, gg: f64) -> Result<(), Error> {
    if !kk.is_finite() || kk <= 0.0 {
        return Err(Error::InvalidMaterialParameters("bulk modulus K must be finite and > 0"));
    }
    if !gg.is_finite() || gg <= 0.0 {
        return Err(Error::InvalidMaterialParameters("shear modulus G must be finite and > 0"));
    }
    Ok(())
}

impl ParamElastic {
    /// Allocates a new instance after checking the values
    pub fn new(kk: f64, gg: f64) -> Result<Self, Error> {
        let param = ParamElastic { kk, gg };
        param.validate()?;
        Ok(param)
    }

    /// Checks the values
    pub fn validate(&self) -> Result<(), Error> {
        check_moduli(self.kk, self.gg)
    }
}

impl ParamLinearHardening {
    /// Allocates a new instance after checking the values
    pub fn new(kk: f64, gg: f64, tauy0: f64, hh: f64) -> Result<Self, Error> {
        let param = ParamLinearHardening { kk, gg, tauy0, hh };
        param.validate()?;
        Ok(param)
    }

    /// Checks the values
    pub fn validate(&self) -> Result<(), Error> {
        check_moduli(self.kk, self.gg)?;
        if !self.tauy0.is_finite() || self.tauy0 < 0.0 {
            return Err(Error::InvalidMaterialParameters("initial yield stress τy0 must be finite and ≥ 0"));
        }
        if !self.hh.is_finite() || self.hh < 0.0 {
            return Err(Error::InvalidMaterialParameters("hardening modulus H must be finite and ≥ 0"));
        }
        Ok(())
    }
}

impl ParamMaterial {
    /// Checks the values
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            ParamMaterial::Elastic(p) => p.validate(),
            ParamMaterial::LinearHardening(p) => p.validate(),
        }
    }

    /// Returns the bulk modulus
    pub fn kk(&self) -> f64 {
        match self {
            ParamMaterial::Elastic(p) => p.kk,
            ParamMaterial::LinearHardening(p) => p.kk,
        }
    }

    /// Returns the shear modulus
    pub fn gg(&self) -> f64 {
        match self {
            ParamMaterial::Elastic(p) => p.gg,
            ParamMaterial::LinearHardening(p) => p.gg,
        }
    }

    /// Reads a list of parameter sets from a JSON string (each set is checked)
    pub fn from_json(data: &str) -> Result<Vec<Self>, Error> {
        let params: Vec<ParamMaterial> = serde_json::from_str(data)?;
        for p in &params {
            p.validate()?;
        }
        Ok(params)
    }

    /// Writes a list of parameter sets as a JSON string
    pub fn to_json(params: &[ParamMaterial]) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(params)?)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
