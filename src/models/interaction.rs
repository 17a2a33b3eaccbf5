//! Interaction functions over broadcastable embedding tensors.
//!
//! Inputs share a trailing embedding dimension and broadcast on the rest,
//! e.g. `[n, 1, d] x [n, 1, d] x [1, E, d] -> [n, E]`.

use candle_core::{Tensor, D};

use crate::error::Result;
use crate::tensor::split_complex;

/// Trilinear product `sum_i h_i * r_i * t_i` (DistMult, and each CP half of SimplE).
pub fn distmult_interaction(h: &Tensor, r: &Tensor, t: &Tensor) -> Result<Tensor> {
    Ok(h.broadcast_mul(r)?.broadcast_mul(t)?.sum(D::Minus1)?)
}

/// `Re(<h, r, conj(t)>)` with complex vectors stored as `[re ; im]`.
pub fn complex_interaction(h: &Tensor, r: &Tensor, t: &Tensor) -> Result<Tensor> {
    let (h_re, h_im) = split_complex(h)?;
    let (r_re, r_im) = split_complex(r)?;
    let (t_re, t_im) = split_complex(t)?;

    let re_re_re = h_re.broadcast_mul(&r_re)?.broadcast_mul(&t_re)?;
    let im_re_im = h_im.broadcast_mul(&r_re)?.broadcast_mul(&t_im)?;
    let re_im_im = h_re.broadcast_mul(&r_im)?.broadcast_mul(&t_im)?;
    let im_im_re = h_im.broadcast_mul(&r_im)?.broadcast_mul(&t_re)?;

    let sum = ((re_re_re + im_re_im)? + re_im_im)?;
    Ok((sum - im_im_re)?.sum(D::Minus1)?)
}
