//! SimplE (Kazemi & Poole, 2018).
//!
//! Each entity has a head embedding `E[e]` and a tail embedding `T[e]`; each
//! relation has a forward `R[r]` and an inverse `R⁻[r]` embedding. A triple is
//! scored by the average of the CP score of the triple and of its inverse:
//!
//! ```text
//! score(h, r, t) = 0.5 * (<E[h], R[r], T[t]> + <E[t], R⁻[r], T[h]>)
//! ```
//!
//! Scores are not clamped.

use candle_core::{Device, Module, Tensor};
use candle_nn::Embedding;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::models::interaction::distmult_interaction;
use crate::models::{BaseModule, KgeModel};
use crate::triples::{check_batch, slice_pairs, slice_triples, BatchLayout, KgSize};

/// SimplE embedding model.
pub struct SimplE {
    base: BaseModule,
    tail_entity_embeddings: Embedding,
    relation_embeddings: Embedding,
    inverse_relation_embeddings: Embedding,
}

impl SimplE {
    /// Create a SimplE model with freshly initialised tables.
    ///
    /// # Example
    /// ```
    /// use candle_core::Device;
    /// use kge_nn::{KgSize, KgeModel, ModelConfig, SimplE};
    ///
    /// let model = SimplE::new(KgSize::new(10, 3), &ModelConfig::new(16, 42), &Device::Cpu).unwrap();
    /// assert_eq!(model.parameters().len(), 4);
    /// ```
    pub fn new(size: KgSize, config: &ModelConfig, device: &Device) -> Result<Self> {
        let mut base = BaseModule::new(size, config, device)?;
        let dim = config.embedding_dim;

        let params = base.params_mut();
        let tail_entity_embeddings =
            params.embedding("tail_entity_embeddings", size.num_entities, dim)?;
        let relation_embeddings = params.embedding("relation_embeddings", size.num_relations, dim)?;
        let inverse_relation_embeddings =
            params.embedding("inverse_relation_embeddings", size.num_relations, dim)?;

        tracing::debug!(
            num_entities = size.num_entities,
            num_relations = size.num_relations,
            dim,
            "created SimplE"
        );

        Ok(Self {
            base,
            tail_entity_embeddings,
            relation_embeddings,
            inverse_relation_embeddings,
        })
    }

    pub fn tail_entity_embeddings(&self) -> &Embedding {
        &self.tail_entity_embeddings
    }

    pub fn relation_embeddings(&self) -> &Embedding {
        &self.relation_embeddings
    }

    pub fn inverse_relation_embeddings(&self) -> &Embedding {
        &self.inverse_relation_embeddings
    }

    fn combine(
        hh: &Tensor,
        r: &Tensor,
        tt: &Tensor,
        ht: &Tensor,
        r_inv: &Tensor,
        th: &Tensor,
    ) -> Result<Tensor> {
        let score = distmult_interaction(hh, r, tt)?;
        let inverse_score = distmult_interaction(ht, r_inv, th)?;
        Ok(((score + inverse_score)? * 0.5)?)
    }
}

impl KgeModel for SimplE {
    fn base(&self) -> &BaseModule {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseModule {
        &mut self.base
    }

    fn score_owa_t(&self, hrt_batch: &Tensor, _train: bool) -> Result<Tensor> {
        check_batch(hrt_batch, BatchLayout::Hrt, &self.base.size())?;
        let (h, r, t) = slice_triples(hrt_batch)?;

        let entities = self.base.entity_embeddings();
        let hh = entities.forward(&h)?;
        let ht = entities.forward(&t)?;
        let th = self.tail_entity_embeddings.forward(&h)?;
        let tt = self.tail_entity_embeddings.forward(&t)?;
        let r_inv = self.inverse_relation_embeddings.forward(&r)?;
        let r = self.relation_embeddings.forward(&r)?;

        Self::combine(&hh, &r, &tt, &ht, &r_inv, &th)
    }

    fn score_cwa_t(&self, hr_batch: &Tensor, _train: bool) -> Result<Tensor> {
        check_batch(hr_batch, BatchLayout::Hr, &self.base.size())?;
        let (h, r) = slice_pairs(hr_batch)?;

        // [n, 1, d] against [1, E, d]
        let hh = self.base.entity_embeddings().forward(&h)?.unsqueeze(1)?;
        let th = self.tail_entity_embeddings.forward(&h)?.unsqueeze(1)?;
        let r_inv = self.inverse_relation_embeddings.forward(&r)?.unsqueeze(1)?;
        let r = self.relation_embeddings.forward(&r)?.unsqueeze(1)?;
        let ht = self.base.entity_embeddings().embeddings().unsqueeze(0)?;
        let tt = self.tail_entity_embeddings.embeddings().unsqueeze(0)?;

        Self::combine(&hh, &r, &tt, &ht, &r_inv, &th)
    }

    fn score_inverse_cwa_t(&self, rt_batch: &Tensor, _train: bool) -> Result<Tensor> {
        check_batch(rt_batch, BatchLayout::Rt, &self.base.size())?;
        let (r, t) = slice_pairs(rt_batch)?;

        let hh = self.base.entity_embeddings().embeddings().unsqueeze(0)?;
        let th = self.tail_entity_embeddings.embeddings().unsqueeze(0)?;
        let ht = self.base.entity_embeddings().forward(&t)?.unsqueeze(1)?;
        let tt = self.tail_entity_embeddings.forward(&t)?.unsqueeze(1)?;
        let r_inv = self.inverse_relation_embeddings.forward(&r)?.unsqueeze(1)?;
        let r = self.relation_embeddings.forward(&r)?.unsqueeze(1)?;

        Self::combine(&hh, &r, &tt, &ht, &r_inv, &th)
    }
}
