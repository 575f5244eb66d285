use super::t2_general;
use crate::base::Error;
use russell_tensor::{Tensor2, Tensor4};

/// Allocates a general second-order tensor from 9 row-major components
pub fn t2_from_flat(data: &[f64]) -> Result<Tensor2, Error> {
    if data.len() != 9 {
        return Err(Error::ShapeMismatch(format!(
            "a second-order tensor needs 9 values, got {}",
            data.len()
        )));
    }
    t2_general(&[
        [data[0], data[1], data[2]],
        [data[3], data[4], data[5]],
        [data[6], data[7], data[8]],
    ])
}

/// Copies the standard components of a second-order tensor into a row-major slice with length 9
pub fn t2_write_flat(a: &Tensor2, out: &mut [f64]) -> Result<(), Error> {
    if out.len() != 9 {
        return Err(Error::ShapeMismatch(format!("output must have 9 values, got {}", out.len())));
    }
    for i in 0..3 {
        for j in 0..3 {
            out[i * 3 + j] = a.get(i, j);
        }
    }
    Ok(())
}

/// Copies the standard components of a fourth-order tensor into a row-major slice with length 81
pub fn t4_write_flat(dd: &Tensor4, out: &mut [f64]) -> Result<(), Error> {
    if out.len() != 81 {
        return Err(Error::ShapeMismatch(format!("output must have 81 values, got {}", out.len())));
    }
    let mut p = 0;
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                for l in 0..3 {
                    out[p] = dd.get(i, j, k, l);
                    p += 1;
                }
            }
        }
    }
    Ok(())
}

/// Converts a slice of second-order tensors into a flat row-major array
pub fn t2_flatten(tensors: &[Tensor2]) -> Vec<f64> {
    let mut data = vec![0.0; 9 * tensors.len()];
    for (chunk, a) in data.chunks_exact_mut(9).zip(tensors) {
        for i in 0..3 {
            for j in 0..3 {
                chunk[i * 3 + j] = a.get(i, j);
            }
        }
    }
    data
}

/// Converts a flat row-major array with length 9·n into n general second-order tensors
pub fn t2_unflatten(data: &[f64]) -> Result<Vec<Tensor2>, Error> {
    if data.len() % 9 != 0 {
        return Err(Error::ShapeMismatch(format!(
            "flat array length must be a multiple of 9, got {}",
            data.len()
        )));
    }
    data.chunks_exact(9).map(t2_from_flat).collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
