//! Training criteria for KGE scores.
//!
//! - Margin ranking (OWA): `mean(max(0, margin - (pos - neg)))`
//! - Binary cross-entropy with logits (CWA): scores against 0/1 labels

use candle_core::{Tensor, D};
use serde::{Deserialize, Serialize};

use crate::error::{KgeError, Result};

/// Loss applied to model scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Criterion {
    /// Pairwise hinge loss between positive and negative scores, target = 1.
    MarginRanking { margin: f64 },
    /// Pointwise loss over `[n, num_entities]` score matrices.
    BinaryCrossEntropy,
}

impl Default for Criterion {
    fn default() -> Self {
        Criterion::MarginRanking { margin: 1.0 }
    }
}

impl Criterion {
    /// Check the criterion's hyperparameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            Criterion::MarginRanking { margin } if !margin.is_finite() || *margin < 0.0 => Err(
                KgeError::Config(format!("margin must be finite and >= 0, got {margin}")),
            ),
            _ => Ok(()),
        }
    }

    /// Margin ranking loss of positive scores `[n]` against negatives `[n]` or `[n, k]`.
    ///
    /// Averaged over all negative entries.
    pub fn margin_ranking(&self, positive: &Tensor, negative: &Tensor) -> Result<Tensor> {
        let margin = match self {
            Criterion::MarginRanking { margin } => *margin,
            other => {
                return Err(KgeError::Config(format!(
                    "margin ranking loss requested but criterion is {other:?}"
                )))
            }
        };

        if positive.dim(0)? != negative.dim(0)? {
            return Err(KgeError::ShapeMismatch {
                expected: format!("{} negatives rows", positive.dim(0)?),
                got: format!("{:?}", negative.dims()),
            });
        }

        let positive = if negative.rank() > positive.rank() {
            positive.unsqueeze(D::Minus1)?
        } else {
            positive.clone()
        };

        // max(0, -(pos - neg) + margin)
        let hinge = (negative.broadcast_sub(&positive)? + margin)?.relu()?;
        Ok(hinge.mean_all()?)
    }

    /// Label loss of raw scores against 0/1 targets of the same shape.
    pub fn label_loss(&self, scores: &Tensor, labels: &Tensor) -> Result<Tensor> {
        if !matches!(self, Criterion::BinaryCrossEntropy) {
            return Err(KgeError::Config(format!(
                "label loss requested but criterion is {self:?}"
            )));
        }
        if scores.dims() != labels.dims() {
            return Err(KgeError::ShapeMismatch {
                expected: format!("{:?}", scores.dims()),
                got: format!("{:?}", labels.dims()),
            });
        }
        let labels = labels.to_dtype(scores.dtype())?;
        Ok(candle_nn::loss::binary_cross_entropy_with_logit(
            scores, &labels,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn test_margin_ranking_known_values() {
        let device = Device::Cpu;
        let pos = Tensor::new(&[2.0f32, 0.0], &device).unwrap();
        let neg = Tensor::new(&[0.5f32, 0.5], &device).unwrap();

        // max(0, 1 - 1.5) = 0, max(0, 1 + 0.5) = 1.5 -> mean 0.75
        let loss = Criterion::default().margin_ranking(&pos, &neg).unwrap();
        let value: f32 = loss.to_scalar().unwrap();
        assert!((value - 0.75).abs() < 1e-6, "loss = {value}");
    }

    #[test]
    fn test_margin_ranking_broadcasts_negatives() {
        let device = Device::Cpu;
        let pos = Tensor::new(&[1.0f32, 1.0], &device).unwrap();
        let neg = Tensor::new(&[[1.0f32, 0.0], [3.0, -5.0]], &device).unwrap();

        // row 0: 1, 0; row 1: 3, 0 -> mean 1.0
        let loss = Criterion::MarginRanking { margin: 1.0 }
            .margin_ranking(&pos, &neg)
            .unwrap();
        let value: f32 = loss.to_scalar().unwrap();
        assert!((value - 1.0).abs() < 1e-6, "loss = {value}");
    }

    #[test]
    fn test_margin_ranking_row_mismatch() {
        let device = Device::Cpu;
        let pos = Tensor::new(&[1.0f32, 1.0], &device).unwrap();
        let neg = Tensor::new(&[1.0f32, 1.0, 1.0], &device).unwrap();
        let err = Criterion::default().margin_ranking(&pos, &neg).unwrap_err();
        assert!(matches!(err, KgeError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_label_loss_requires_bce() {
        let device = Device::Cpu;
        let scores = Tensor::zeros((2, 3), candle_core::DType::F32, &device).unwrap();
        let err = Criterion::default().label_loss(&scores, &scores).unwrap_err();
        assert!(matches!(err, KgeError::Config(_)));
    }

    #[test]
    fn test_label_loss_at_zero_logits() {
        let device = Device::Cpu;
        let scores = Tensor::zeros((2, 3), candle_core::DType::F32, &device).unwrap();
        let labels = Tensor::ones((2, 3), candle_core::DType::F32, &device).unwrap();
        let loss = Criterion::BinaryCrossEntropy
            .label_loss(&scores, &labels)
            .unwrap();
        let value: f32 = loss.to_scalar().unwrap();
        assert!((value - std::f32::consts::LN_2).abs() < 1e-5, "loss = {value}");
    }

    #[test]
    fn test_negative_margin_rejected() {
        assert!(Criterion::MarginRanking { margin: -1.0 }.validate().is_err());
        assert!(Criterion::BinaryCrossEntropy.validate().is_ok());
    }
}
