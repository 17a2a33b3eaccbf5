//! Named learnable parameters.
//!
//! Every table and layer weight a model owns is a `Var` registered here, so
//! an optimizer can be built from `vars()` and gradients looked up by name.

use candle_core::{Device, Tensor, Var};
use candle_nn::{Embedding, Linear};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};

use crate::error::{KgeError, Result};

/// Ordered registry of learnable parameters with a seeded initialiser.
pub struct ParamStore {
    device: Device,
    params: IndexMap<String, Var>,
    rng: StdRng,
}

impl ParamStore {
    /// Create an empty store. Without a seed the RNG draws from OS entropy.
    pub fn new(seed: Option<u64>, device: &Device) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            device: device.clone(),
            params: IndexMap::new(),
            rng,
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Create an embedding table `[count, dim]` drawn from N(0, 1).
    pub fn embedding(&mut self, name: &str, count: usize, dim: usize) -> Result<Embedding> {
        let normal = Normal::new(0.0f32, 1.0).map_err(|e| KgeError::Init(e.to_string()))?;
        let data: Vec<f32> = normal.sample_iter(&mut self.rng).take(count * dim).collect();
        let table = Tensor::from_vec(data, (count, dim), &self.device)?;
        let var = self.register(name, table)?;
        Ok(Embedding::new(var.as_tensor().clone(), dim))
    }

    /// Create a linear layer `in_dim -> out_dim` with bias.
    ///
    /// Weight and bias are drawn from U(-1/sqrt(in_dim), 1/sqrt(in_dim)).
    pub fn linear(&mut self, name: &str, in_dim: usize, out_dim: usize) -> Result<Linear> {
        let bound = 1.0 / (in_dim.max(1) as f32).sqrt();
        let uniform =
            Uniform::new_inclusive(-bound, bound).map_err(|e| KgeError::Init(e.to_string()))?;

        let weight: Vec<f32> = (&uniform)
            .sample_iter(&mut self.rng)
            .take(out_dim * in_dim)
            .collect();
        let bias: Vec<f32> = (&uniform).sample_iter(&mut self.rng).take(out_dim).collect();

        let weight = Tensor::from_vec(weight, (out_dim, in_dim), &self.device)?;
        let bias = Tensor::from_vec(bias, out_dim, &self.device)?;
        let weight = self.register(&format!("{name}.weight"), weight)?;
        let bias = self.register(&format!("{name}.bias"), bias)?;

        Ok(Linear::new(
            weight.as_tensor().clone(),
            Some(bias.as_tensor().clone()),
        ))
    }

    fn register(&mut self, name: &str, tensor: Tensor) -> Result<Var> {
        if self.params.contains_key(name) {
            return Err(KgeError::DuplicateParameter(name.to_string()));
        }
        let var = Var::from_tensor(&tensor)?;
        tracing::debug!(name, shape = ?var.dims(), "registered parameter");
        self.params.insert(name.to_string(), var.clone());
        Ok(var)
    }

    /// Get a parameter by name.
    pub fn get(&self, name: &str) -> Option<&Var> {
        self.params.get(name)
    }

    /// Parameter names in registration order.
    pub fn names(&self) -> Vec<&String> {
        self.params.keys().collect()
    }

    /// All parameters, for building an optimizer.
    pub fn vars(&self) -> Vec<Var> {
        self.params.values().cloned().collect()
    }

    /// Total number of scalar parameters.
    pub fn num_parameters(&self) -> usize {
        self.params.values().map(|v| v.elem_count()).sum()
    }
}
