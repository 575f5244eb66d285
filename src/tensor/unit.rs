use russell_tensor::{Mandel, Tensor2, Tensor4};

/// Returns the second-order unit tensor: I2ᵢⱼ = δᵢⱼ
pub fn i2() -> Tensor2 {
    Tensor2::identity(Mandel::General)
}

/// Returns the dyadic product of unit tensors: IIᵢⱼₖₗ = δᵢⱼ δₖₗ
pub fn ii() -> Tensor4 {
    Tensor4::constant_jj(false)
}

/// Returns the fourth-order unit tensor: I4ᵢⱼₖₗ = δᵢₗ δⱼₖ
///
/// Note: `I4 : A = Aᵀ` with the contraction (D : A)ᵢⱼ = Dᵢⱼₖₗ Aₖₗ.
pub fn i4() -> Tensor4 {
    Tensor4::constant_tt()
}

/// Returns the right-transposed fourth-order unit tensor: I4rtᵢⱼₖₗ = δᵢₖ δⱼₗ
pub fn i4rt() -> Tensor4 {
    Tensor4::constant_ii()
}

/// Returns the symmetric projection tensor: I4s = (I4 + I4rt) / 2
pub fn i4s() -> Tensor4 {
    Tensor4::constant_pp_sym(false)
}

/// Returns the deviatoric projection tensor: I4d = I4s − II / 3
pub fn i4d() -> Tensor4 {
    Tensor4::constant_pp_symdev(false)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
