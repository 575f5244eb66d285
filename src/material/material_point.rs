use super::ModelType;
use crate::base::Error;
use russell_tensor::{Tensor2, Tensor4};

/// Holds the output of a material point evaluation
#[derive(Clone, Debug)]
pub struct Response {
    /// Cauchy stress σ
    pub stress: Tensor2,

    /// Consistent (spatial) tangent C, if requested
    pub tangent: Option<Tensor4>,
}

/// Specifies the essential functions of finite-strain material points
///
/// The stress and tangent are always derived from the deformation gradient passed
/// to [MaterialPoint::set_def_grad]; there is no mutable access to the stored F.
pub trait MaterialPoint: Send + Sync {
    /// Returns the material model
    fn kind(&self) -> ModelType;

    /// Returns the bulk modulus K
    fn k(&self) -> f64;

    /// Returns the shear modulus G
    fn g(&self) -> f64;

    /// Returns the (uncommitted) accumulated plastic strain
    fn epsp(&self) -> f64;

    /// Sets the deformation gradient and recomputes the stress (and the tangent if requested)
    ///
    /// `f` must be [russell_tensor::Mandel::General].
    ///
    /// The committed history is not modified; thus, this function may be called
    /// many times during the iterations of a solver step.
    fn set_def_grad(&mut self, f: &Tensor2, with_tangent: bool) -> Result<(), Error>;

    /// Returns the current deformation gradient F
    fn def_grad(&self) -> &Tensor2;

    /// Returns the current Cauchy stress σ
    fn stress(&self) -> &Tensor2;

    /// Returns the tangent computed by the last evaluation, if any
    fn tangent(&self) -> Option<&Tensor4>;

    /// Commits the current state into the history (accepts the solver step)
    fn commit(&mut self);

    /// Alias of [MaterialPoint::commit]
    fn increment(&mut self) {
        self.commit();
    }

    /// Evaluates the point and returns a copy of the stress and tangent
    fn evaluate(&mut self, f: &Tensor2, with_tangent: bool) -> Result<Response, Error> {
        self.set_def_grad(f, with_tangent)?;
        Ok(Response {
            stress: self.stress().clone(),
            tangent: self.tangent().cloned(),
        })
    }

    /// Returns the tangent computed by the last evaluation or an error
    fn require_tangent(&self) -> Result<&Tensor4, Error> {
        self.tangent().ok_or(Error::TangentUnavailable)
    }

    /// Returns true if this point holds the hyperelastic model
    fn is_elastic(&self) -> bool {
        self.kind() == ModelType::Elastic
    }

    /// Returns true if this point may develop plastic strains
    fn is_plastic(&self) -> bool {
        self.kind().is_plastic()
    }
}
