//! kge-nn: knowledge-graph embedding models as trainable candle modules.
//!
//! A model maps entity and relation ids to learned embeddings and scores
//! `(head, relation, tail)` triples for plausibility. Three scoring modes are
//! supported: explicit triples, one `(h, r)` against every tail, and one
//! `(r, t)` against every head.
//!
//! # Models
//!
//! | Model | Score |
//! |-------|-------|
//! | [`SimplE`] | `0.5 * (<E[h], R[r], T[t]> + <E[t], R⁻[r], T[h]>)` |
//! | [`DistMultLiteral`] | `<g([E[h]; L[h]]), R[r], g([E[t]; L[t]])>` |
//! | [`ComplExLiteral`] | `Re(<g([E[h]; L[h]]), R[r], conj(g([E[t]; L[t]]))>)` |
//!
//! All parameters are `candle_core::Var`s, so any `candle_nn` optimizer can
//! train them from [`KgeModel::parameters`].

pub mod config;
pub mod error;
pub mod loss;
pub mod models;
pub mod nn;
pub mod params;
pub mod tensor;
pub mod triples;

pub use config::{LiteralConfig, ModelConfig};
pub use error::{KgeError, Result};
pub use loss::Criterion;
pub use models::{
    BaseModule, ComplExLiteral, DistMultLiteral, KgeModel, LiteralModel, ScoringMode, SimplE,
};
pub use nn::{ComplExLiteralCombination, Combination, ComplexCombination, DistMultCombination};
pub use params::ParamStore;
pub use tensor::{combine_complex, split_complex};
pub use triples::{hr_batch, hrt_batch, rt_batch, slice_triples, KgSize, Triple};
