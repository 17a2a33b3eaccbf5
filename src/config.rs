//! Model hyperparameters.
//!
//! Every field has a default, so a partial table (JSON, TOML, ...) is
//! enough to build a config.

use serde::{Deserialize, Serialize};

use crate::error::{KgeError, Result};
use crate::loss::Criterion;

/// Default embedding width.
pub const DEFAULT_EMBEDDING_DIM: usize = 200;

/// Hyperparameters shared by every model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Embedding dimension
    pub embedding_dim: usize,
    /// Seed for parameter initialisation (OS entropy when absent)
    pub random_seed: Option<u64>,
    /// Loss used by the model's loss helpers
    pub criterion: Criterion,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            random_seed: None,
            criterion: Criterion::default(),
        }
    }
}

impl ModelConfig {
    /// Shortcut for a seeded config of the given width.
    pub fn new(embedding_dim: usize, random_seed: u64) -> Self {
        Self {
            embedding_dim,
            random_seed: Some(random_seed),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.embedding_dim == 0 {
            return Err(KgeError::Config("embedding_dim must be > 0".into()));
        }
        self.criterion.validate()
    }
}

/// Hyperparameters for the literal-aware models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiteralConfig {
    #[serde(flatten)]
    pub model: ModelConfig,
    /// Dropout applied inside the literal combination (training only)
    pub input_dropout: f32,
}

impl Default for LiteralConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            input_dropout: 0.0,
        }
    }
}

impl LiteralConfig {
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        if !(0.0..1.0).contains(&self.input_dropout) {
            return Err(KgeError::Config(format!(
                "input_dropout must be in [0, 1), got {}",
                self.input_dropout
            )));
        }
        Ok(())
    }
}
