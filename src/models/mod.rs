//! Knowledge-graph embedding models.
//!
//! Every model scores triples in three modes:
//!
//! | Mode | Batch | Scores |
//! |------|-------|--------|
//! | [`ScoringMode::Owa`] | `[n, 3]` `(h, r, t)` | `[n]` |
//! | [`ScoringMode::Cwa`] | `[n, 2]` `(h, r)` | `[n, num_entities]`, one column per tail |
//! | [`ScoringMode::InverseCwa`] | `[n, 2]` `(r, t)` | `[n, num_entities]`, one column per head |
//!
//! Higher scores mean more plausible triples.

mod base;
pub mod interaction;
mod literal;
mod simple;

pub use base::BaseModule;
pub use literal::{ComplExLiteral, DistMultLiteral, LiteralModel};
pub use simple::SimplE;

use candle_core::{Tensor, Var};
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::triples::{hr_batch, rt_batch, Triple};

/// Which positions of the triple are fixed and which range over all entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Score explicit `(h, r, t)` triples.
    Owa,
    /// Score `(h, r, *)` against every tail.
    Cwa,
    /// Score `(*, r, t)` against every head.
    InverseCwa,
}

/// A trainable triple scorer.
pub trait KgeModel {
    fn base(&self) -> &BaseModule;

    fn base_mut(&mut self) -> &mut BaseModule;

    /// Scores of `[n, 3]` triples, shape `[n]`. Dropout fires only when `train` is set.
    fn score_owa_t(&self, hrt_batch: &Tensor, train: bool) -> Result<Tensor>;

    /// Scores of `[n, 2]` `(h, r)` pairs against all tails, shape `[n, num_entities]`.
    fn score_cwa_t(&self, hr_batch: &Tensor, train: bool) -> Result<Tensor>;

    /// Scores of `[n, 2]` `(r, t)` pairs against all heads, shape `[n, num_entities]`.
    fn score_inverse_cwa_t(&self, rt_batch: &Tensor, train: bool) -> Result<Tensor>;

    /// [`KgeModel::score_owa_t`] in the model's current train/eval mode.
    fn score_owa(&self, hrt_batch: &Tensor) -> Result<Tensor> {
        self.score_owa_t(hrt_batch, self.base().is_training())
    }

    fn score_cwa(&self, hr_batch: &Tensor) -> Result<Tensor> {
        self.score_cwa_t(hr_batch, self.base().is_training())
    }

    fn score_inverse_cwa(&self, rt_batch: &Tensor) -> Result<Tensor> {
        self.score_inverse_cwa_t(rt_batch, self.base().is_training())
    }

    /// Dispatch on the scoring mode.
    fn score(&self, mode: ScoringMode, batch: &Tensor) -> Result<Tensor> {
        tracing::trace!(?mode, dims = ?batch.dims(), "scoring batch");
        match mode {
            ScoringMode::Owa => self.score_owa(batch),
            ScoringMode::Cwa => self.score_cwa(batch),
            ScoringMode::InverseCwa => self.score_inverse_cwa(batch),
        }
    }

    fn num_entities(&self) -> usize {
        self.base().num_entities()
    }

    fn num_relations(&self) -> usize {
        self.base().num_relations()
    }

    fn embedding_dim(&self) -> usize {
        self.base().embedding_dim()
    }

    /// Enable dropout.
    fn train(&mut self) {
        self.base_mut().set_training(true);
    }

    /// Disable dropout.
    fn eval(&mut self) {
        self.base_mut().set_training(false);
    }

    /// All learnable parameters, for an optimizer.
    fn parameters(&self) -> Vec<Var> {
        self.base().params().vars()
    }

    /// Margin ranking loss of positive against negative scores.
    fn compute_mr_loss(&self, positive: &Tensor, negative: &Tensor) -> Result<Tensor> {
        self.base().criterion().margin_ranking(positive, negative)
    }

    /// Label loss of CWA scores against 0/1 targets.
    fn compute_label_loss(&self, scores: &Tensor, labels: &Tensor) -> Result<Tensor> {
        self.base().criterion().label_loss(scores, labels)
    }

    /// Top-`k` tails for `(head, relation, ?)`, best first.
    ///
    /// Scored with dropout off, whatever the train flag. Tails forming a
    /// triple in `known` are skipped (filtered setting).
    fn predict_tails(
        &self,
        head: u32,
        relation: u32,
        k: usize,
        known: Option<&FxHashSet<Triple>>,
    ) -> Result<Vec<(u32, f32)>> {
        let batch = hr_batch(&[(head, relation)], self.base().device())?;
        let scores = self.score_cwa_t(&batch, false)?.squeeze(0)?.to_vec1::<f32>()?;
        Ok(top_k(scores, k, |tail| {
            known.is_some_and(|set| set.contains(&Triple::new(head, relation, tail)))
        }))
    }

    /// Top-`k` heads for `(?, relation, tail)`, best first. Dropout is off.
    fn predict_heads(
        &self,
        relation: u32,
        tail: u32,
        k: usize,
        known: Option<&FxHashSet<Triple>>,
    ) -> Result<Vec<(u32, f32)>> {
        let batch = rt_batch(&[(relation, tail)], self.base().device())?;
        let scores = self
            .score_inverse_cwa_t(&batch, false)?
            .squeeze(0)?
            .to_vec1::<f32>()?;
        Ok(top_k(scores, k, |head| {
            known.is_some_and(|set| set.contains(&Triple::new(head, relation, tail)))
        }))
    }
}

fn top_k(scores: Vec<f32>, k: usize, skip: impl Fn(u32) -> bool) -> Vec<(u32, f32)> {
    let mut ranked: Vec<(u32, f32)> = scores
        .into_iter()
        .enumerate()
        .map(|(i, s)| (i as u32, s))
        .filter(|&(i, _)| !skip(i))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(k);
    ranked
}
