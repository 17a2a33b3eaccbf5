//! LiteralE: entity embeddings enriched with numeric literals.
//!
//! Each entity carries a fixed row of `L` literal values. Before scoring, the
//! entity embedding is concatenated with its literals and passed through a
//! learned [`Combination`]:
//!
//! ```text
//! e' = g([E[e] ; L[e]])
//! ```
//!
//! The combined embeddings feed a standard interaction:
//! - [`DistMultLiteral`]: `<h', r, t'>`
//! - [`ComplExLiteral`]: `Re(<h', r, conj(t')>)` with `2d`-wide complex vectors

use candle_core::{DType, Device, Module, Tensor, D};
use candle_nn::Embedding;

use crate::config::LiteralConfig;
use crate::error::{KgeError, Result};
use crate::models::interaction::{complex_interaction, distmult_interaction};
use crate::models::{BaseModule, KgeModel};
use crate::nn::{ComplExLiteralCombination, Combination, DistMultCombination};
use crate::triples::{check_batch, slice_pairs, slice_triples, BatchLayout, KgSize};

type Interaction = fn(&Tensor, &Tensor, &Tensor) -> Result<Tensor>;

/// A literal-aware model: entity table, fixed literals, combination, relation table.
pub struct LiteralModel<C> {
    base: BaseModule,
    relation_embeddings: Embedding,
    literals: Tensor,
    combination: C,
    interaction: Interaction,
}

/// DistMult over literal-enriched entities.
pub type DistMultLiteral = LiteralModel<DistMultCombination>;

/// ComplEx over literal-enriched entities.
pub type ComplExLiteral = LiteralModel<ComplExLiteralCombination>;

fn check_literals(literals: &Tensor, size: &KgSize, device: &Device) -> Result<Tensor> {
    let dims = literals.dims();
    if dims.len() != 2 || dims[0] != size.num_entities {
        return Err(KgeError::ShapeMismatch {
            expected: format!("[{}, num_literals]", size.num_entities),
            got: format!("{dims:?}"),
        });
    }
    // Literals are inputs, never trained.
    Ok(literals
        .to_device(device)?
        .to_dtype(DType::F32)?
        .detach())
}

impl LiteralModel<DistMultCombination> {
    /// DistMult with a `Linear + Dropout` literal combination.
    ///
    /// `literals` is `[num_entities, num_literals]`.
    pub fn new(
        size: KgSize,
        literals: &Tensor,
        config: &LiteralConfig,
        device: &Device,
    ) -> Result<Self> {
        config.validate()?;
        let literals = check_literals(literals, &size, device)?;
        let num_literals = literals.dim(1)?;
        let dim = config.model.embedding_dim;

        let mut base = BaseModule::new(size, &config.model, device)?;
        let params = base.params_mut();
        let relation_embeddings = params.embedding("relation_embeddings", size.num_relations, dim)?;
        let combination = DistMultCombination::new(
            params,
            "combination",
            dim,
            num_literals,
            config.input_dropout,
        )?;

        tracing::debug!(
            num_entities = size.num_entities,
            num_relations = size.num_relations,
            num_literals,
            dim,
            "created DistMultLiteral"
        );

        Ok(Self {
            base,
            relation_embeddings,
            literals,
            combination,
            interaction: distmult_interaction,
        })
    }
}

impl LiteralModel<ComplExLiteralCombination> {
    /// ComplEx with separate real/imaginary literal combinations.
    ///
    /// Entity and relation tables are `2 * embedding_dim` wide.
    pub fn new(
        size: KgSize,
        literals: &Tensor,
        config: &LiteralConfig,
        device: &Device,
    ) -> Result<Self> {
        config.validate()?;
        let literals = check_literals(literals, &size, device)?;
        let num_literals = literals.dim(1)?;
        let dim = config.model.embedding_dim;

        let mut base = BaseModule::with_entity_width(size, &config.model, 2 * dim, device)?;
        let params = base.params_mut();
        let relation_embeddings =
            params.embedding("relation_embeddings", size.num_relations, 2 * dim)?;
        let combination = ComplExLiteralCombination::new(
            params,
            "combination",
            dim,
            num_literals,
            config.input_dropout,
        )?;

        tracing::debug!(
            num_entities = size.num_entities,
            num_relations = size.num_relations,
            num_literals,
            dim,
            "created ComplExLiteral"
        );

        Ok(Self {
            base,
            relation_embeddings,
            literals,
            combination,
            interaction: complex_interaction,
        })
    }
}

impl<C: Combination> LiteralModel<C> {
    pub fn relation_embeddings(&self) -> &Embedding {
        &self.relation_embeddings
    }

    pub fn literals(&self) -> &Tensor {
        &self.literals
    }

    pub fn combination(&self) -> &C {
        &self.combination
    }

    pub fn num_literals(&self) -> usize {
        self.combination.num_literals()
    }

    /// Combined embeddings of `ids` (`[n, width]`), or of every entity (`[E, width]`).
    pub fn entity_representations(&self, ids: Option<&Tensor>, train: bool) -> Result<Tensor> {
        let table = self.base.entity_embeddings();
        let (embedded, literals) = match ids {
            Some(ids) => (table.forward(ids)?, self.literals.index_select(ids, 0)?),
            None => (table.embeddings().clone(), self.literals.clone()),
        };
        let x = Tensor::cat(&[&embedded, &literals], D::Minus1)?;
        self.combination.combine(&x, train)
    }
}

impl<C: Combination> KgeModel for LiteralModel<C> {
    fn base(&self) -> &BaseModule {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseModule {
        &mut self.base
    }

    fn score_owa_t(&self, hrt_batch: &Tensor, train: bool) -> Result<Tensor> {
        check_batch(hrt_batch, BatchLayout::Hrt, &self.base.size())?;
        let (h, r, t) = slice_triples(hrt_batch)?;

        let h = self.entity_representations(Some(&h), train)?;
        let t = self.entity_representations(Some(&t), train)?;
        let r = self.relation_embeddings.forward(&r)?;

        (self.interaction)(&h, &r, &t)
    }

    fn score_cwa_t(&self, hr_batch: &Tensor, train: bool) -> Result<Tensor> {
        check_batch(hr_batch, BatchLayout::Hr, &self.base.size())?;
        let (h, r) = slice_pairs(hr_batch)?;

        let h = self.entity_representations(Some(&h), train)?.unsqueeze(1)?;
        let r = self.relation_embeddings.forward(&r)?.unsqueeze(1)?;
        let t = self.entity_representations(None, train)?.unsqueeze(0)?;

        (self.interaction)(&h, &r, &t)
    }

    fn score_inverse_cwa_t(&self, rt_batch: &Tensor, train: bool) -> Result<Tensor> {
        check_batch(rt_batch, BatchLayout::Rt, &self.base.size())?;
        let (r, t) = slice_pairs(rt_batch)?;

        let h = self.entity_representations(None, train)?.unsqueeze(0)?;
        let r = self.relation_embeddings.forward(&r)?.unsqueeze(1)?;
        let t = self.entity_representations(Some(&t), train)?.unsqueeze(1)?;

        (self.interaction)(&h, &r, &t)
    }
}
