use serde::{Deserialize, Serialize};

/// Defines the material model assigned to a point
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ModelType {
    /// No material assigned yet
    #[default]
    Unset,

    /// Hyperelastic model
    Elastic,

    /// Elasto-plastic model with linear isotropic hardening
    LinearHardening,
}

impl ModelType {
    /// Returns true if the model may develop plastic strains
    pub fn is_plastic(&self) -> bool {
        matches!(self, ModelType::LinearHardening)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
