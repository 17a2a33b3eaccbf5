//! Complex-valued embeddings stored as real tensors.
//!
//! A complex vector of width `d` is laid out as `[re_0 .. re_d, im_0 .. im_d]`
//! on the last dimension.

use candle_core::{Tensor, D};

use crate::error::{KgeError, Result};

/// Split the last dimension into real and imaginary halves.
pub fn split_complex(x: &Tensor) -> Result<(Tensor, Tensor)> {
    let width = x.dim(D::Minus1)?;
    if width % 2 != 0 {
        return Err(KgeError::ShapeMismatch {
            expected: "even last dimension".into(),
            got: format!("{:?}", x.dims()),
        });
    }
    let half = width / 2;
    Ok((x.narrow(D::Minus1, 0, half)?, x.narrow(D::Minus1, half, half)?))
}

/// Inverse of [`split_complex`].
pub fn combine_complex(x_re: &Tensor, x_im: &Tensor) -> Result<Tensor> {
    Ok(Tensor::cat(&[x_re, x_im], D::Minus1)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn test_split_complex_halves() {
        let x = Tensor::new(&[[1.0f32, 2.0, 3.0, 4.0]], &Device::Cpu).unwrap();
        let (re, im) = split_complex(&x).unwrap();
        assert_eq!(re.to_vec2::<f32>().unwrap(), vec![vec![1.0, 2.0]]);
        assert_eq!(im.to_vec2::<f32>().unwrap(), vec![vec![3.0, 4.0]]);

        let back = combine_complex(&re, &im).unwrap();
        assert_eq!(back.to_vec2::<f32>().unwrap(), x.to_vec2::<f32>().unwrap());
    }

    #[test]
    fn test_split_complex_odd_width() {
        let x = Tensor::new(&[1.0f32, 2.0, 3.0], &Device::Cpu).unwrap();
        assert!(matches!(
            split_complex(&x),
            Err(KgeError::ShapeMismatch { .. })
        ));
    }
}
