//! LiteralE combination layers.
//!
//! A combination maps an entity embedding concatenated with the entity's
//! numeric literals back to an embedding of the model's width:
//!
//! ```text
//! e' = g([e ; l])
//! ```
//!
//! - [`DistMultCombination`]: `Linear(d + L -> d)` then `Dropout`
//! - [`ComplexCombination`]: separate real/imaginary branches sharing the literals
//! - [`ComplExLiteralCombination`]: complex branches of `Dropout -> Linear -> tanh`

use candle_core::{ModuleT, Tensor, D};
use candle_nn::{Dropout, Linear};

use crate::error::{KgeError, Result};
use crate::nn::sequential::{SequentialT, Tanh};
use crate::params::ParamStore;
use crate::tensor::{combine_complex, split_complex};

/// Maps `[..., embedding width + num_literals]` to `[..., output_dim]`.
pub trait Combination {
    /// Width of the entity embedding part of the input.
    fn entity_dim(&self) -> usize;

    /// Number of literal columns appended to the embedding.
    fn num_literals(&self) -> usize;

    /// Width of the combined output.
    fn output_dim(&self) -> usize;

    /// Apply the combination. Dropout layers only fire when `train` is set.
    fn combine(&self, x: &Tensor, train: bool) -> Result<Tensor>;

    fn input_dim(&self) -> usize {
        self.entity_dim() + self.num_literals()
    }
}

fn check_width(x: &Tensor, expected: usize) -> Result<()> {
    let width = x.dim(D::Minus1)?;
    if width != expected {
        return Err(KgeError::ShapeMismatch {
            expected: format!("last dimension {expected}"),
            got: format!("{:?}", x.dims()),
        });
    }
    Ok(())
}

/// Transform the embeddings and the literals together.
pub struct DistMultCombination {
    layers: SequentialT,
    embedding_dim: usize,
    num_literals: usize,
}

impl DistMultCombination {
    /// Create the combination, registering its weights under `name`.
    pub fn new(
        params: &mut ParamStore,
        name: &str,
        embedding_dim: usize,
        num_literals: usize,
        input_dropout: f32,
    ) -> Result<Self> {
        let linear = params.linear(
            &format!("{name}.linear"),
            embedding_dim + num_literals,
            embedding_dim,
        )?;
        Ok(Self::from_linear(
            linear,
            embedding_dim,
            num_literals,
            input_dropout,
        ))
    }

    /// Build around an existing linear layer of shape `(d, d + L)`.
    pub fn from_linear(
        linear: Linear,
        embedding_dim: usize,
        num_literals: usize,
        input_dropout: f32,
    ) -> Self {
        let layers = SequentialT::new()
            .add(linear)
            .add(Dropout::new(input_dropout));
        Self {
            layers,
            embedding_dim,
            num_literals,
        }
    }
}

impl Combination for DistMultCombination {
    fn entity_dim(&self) -> usize {
        self.embedding_dim
    }

    fn num_literals(&self) -> usize {
        self.num_literals
    }

    fn output_dim(&self) -> usize {
        self.embedding_dim
    }

    fn combine(&self, x: &Tensor, train: bool) -> Result<Tensor> {
        check_width(x, self.input_dim())?;
        Ok(self.layers.forward_t(x, train)?)
    }
}

/// A generalized combination for complex embeddings.
///
/// The input is `[x_re ; x_im ; literal]`. Each half is concatenated with the
/// literals, sent through its own branch, and the results are recombined.
pub struct ComplexCombination<R, I> {
    real: R,
    imag: I,
    /// Complex width `d`; the embedding part of the input is `2d` wide.
    embedding_dim: usize,
    num_literals: usize,
}

impl<R: ModuleT, I: ModuleT> ComplexCombination<R, I> {
    /// Both branches must map `d + num_literals` columns to `d`.
    pub fn new(real: R, imag: I, embedding_dim: usize, num_literals: usize) -> Self {
        Self {
            real,
            imag,
            embedding_dim,
            num_literals,
        }
    }
}

impl<R: ModuleT, I: ModuleT> Combination for ComplexCombination<R, I> {
    fn entity_dim(&self) -> usize {
        2 * self.embedding_dim
    }

    fn num_literals(&self) -> usize {
        self.num_literals
    }

    fn output_dim(&self) -> usize {
        2 * self.embedding_dim
    }

    fn combine(&self, x: &Tensor, train: bool) -> Result<Tensor> {
        check_width(x, self.input_dim())?;

        let entity_dim = self.entity_dim();
        let literal = x.narrow(D::Minus1, entity_dim, self.num_literals)?;
        let (x_re, x_im) = split_complex(&x.narrow(D::Minus1, 0, entity_dim)?)?;

        let x_re = self
            .real
            .forward_t(&Tensor::cat(&[&x_re, &literal], D::Minus1)?, train)?;
        let x_im = self
            .imag
            .forward_t(&Tensor::cat(&[&x_im, &literal], D::Minus1)?, train)?;
        combine_complex(&x_re, &x_im)
    }
}

/// Separately transform the real and imaginary parts with
/// `Dropout -> Linear(d + L -> d) -> tanh`.
pub struct ComplExLiteralCombination {
    inner: ComplexCombination<SequentialT, SequentialT>,
}

impl ComplExLiteralCombination {
    /// Create the combination, registering `{name}.real` and `{name}.imag` weights.
    pub fn new(
        params: &mut ParamStore,
        name: &str,
        embedding_dim: usize,
        num_literals: usize,
        input_dropout: f32,
    ) -> Result<Self> {
        let mut branch = |part: &str| -> Result<SequentialT> {
            let linear = params.linear(
                &format!("{name}.{part}.linear"),
                embedding_dim + num_literals,
                embedding_dim,
            )?;
            Ok(SequentialT::new()
                .add(Dropout::new(input_dropout))
                .add(linear)
                .add(Tanh))
        };
        let real = branch("real")?;
        let imag = branch("imag")?;
        Ok(Self {
            inner: ComplexCombination::new(real, imag, embedding_dim, num_literals),
        })
    }
}

impl Combination for ComplExLiteralCombination {
    fn entity_dim(&self) -> usize {
        self.inner.entity_dim()
    }

    fn num_literals(&self) -> usize {
        self.inner.num_literals()
    }

    fn output_dim(&self) -> usize {
        self.inner.output_dim()
    }

    fn combine(&self, x: &Tensor, train: bool) -> Result<Tensor> {
        self.inner.combine(x, train)
    }
}
