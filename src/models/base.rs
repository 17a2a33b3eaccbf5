//! State shared by every model.

use candle_core::Device;
use candle_nn::Embedding;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::loss::Criterion;
use crate::params::ParamStore;
use crate::triples::KgSize;

/// Graph size, hyperparameters, parameter store and the entity table.
///
/// Models embed a `BaseModule` and build their extra tables through
/// [`BaseModule::params_mut`], so all learnable state ends up in one store.
pub struct BaseModule {
    size: KgSize,
    embedding_dim: usize,
    criterion: Criterion,
    params: ParamStore,
    entity_embeddings: Embedding,
    training: bool,
}

impl BaseModule {
    /// Entity table of width `embedding_dim`.
    pub fn new(size: KgSize, config: &ModelConfig, device: &Device) -> Result<Self> {
        Self::with_entity_width(size, config, config.embedding_dim, device)
    }

    /// Entity table of an explicit width (complex models store `2 * embedding_dim`).
    pub fn with_entity_width(
        size: KgSize,
        config: &ModelConfig,
        entity_width: usize,
        device: &Device,
    ) -> Result<Self> {
        config.validate()?;

        let mut params = ParamStore::new(config.random_seed, device);
        let entity_embeddings =
            params.embedding("entity_embeddings", size.num_entities, entity_width)?;

        Ok(Self {
            size,
            embedding_dim: config.embedding_dim,
            criterion: config.criterion,
            params,
            entity_embeddings,
            training: true,
        })
    }

    pub fn size(&self) -> KgSize {
        self.size
    }

    pub fn num_entities(&self) -> usize {
        self.size.num_entities
    }

    pub fn num_relations(&self) -> usize {
        self.size.num_relations
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    pub fn criterion(&self) -> &Criterion {
        &self.criterion
    }

    pub fn device(&self) -> &Device {
        self.params.device()
    }

    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamStore {
        &mut self.params
    }

    pub fn entity_embeddings(&self) -> &Embedding {
        &self.entity_embeddings
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    pub fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_module_tables() {
        let config = ModelConfig::new(8, 1);
        let base = BaseModule::new(KgSize::new(5, 2), &config, &Device::Cpu).unwrap();
        assert_eq!(base.entity_embeddings().embeddings().dims(), &[5, 8]);
        assert_eq!(base.params().names(), vec!["entity_embeddings"]);
        assert!(base.is_training());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ModelConfig {
            embedding_dim: 0,
            ..Default::default()
        };
        assert!(BaseModule::new(KgSize::new(5, 2), &config, &Device::Cpu).is_err());
    }
}
