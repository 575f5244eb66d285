use thiserror::Error;

/// Defines the result type of fallible operations
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors of material point evaluations and batch management
///
/// All errors are deterministic: retrying the same call with the same input fails again.
#[derive(Error, Debug)]
pub enum Error {
    /// The deformation gradient is not finite or det(F) ≤ 0
    #[error("invalid deformation gradient: {0}")]
    InvalidDeformationGradient(&'static str),

    /// The Jacobi sweeps did not converge within the allowed number of sweeps
    #[error("eigen decomposition did not converge after {0} sweeps")]
    EigenDecompositionFailure(usize),

    /// The point (flat index) already has a material assigned
    #[error("point {0} already has a material assigned")]
    AlreadyAssigned(usize),

    /// Some points have no material assigned (holds the number of such points)
    #[error("{0} point(s) have no material assigned")]
    UnassignedPoints(usize),

    /// Non-physical material parameters
    #[error("invalid material parameters: {0}")]
    InvalidMaterialParameters(&'static str),

    /// The point (flat index) holds a different model type than requested
    #[error("point {0} holds a different material model")]
    ModelTypeMismatch(usize),

    /// The tangent was not computed in the last evaluation
    #[error("the tangent has not been computed")]
    TangentUnavailable,

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// Array length or shape disagreement
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Point index or parameter-group index out of range
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(String),

    /// Conversion error reported by russell_tensor
    #[error("tensor conversion failed: {0}")]
    Tensor(&'static str),

    /// Error while reading or writing JSON data
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
