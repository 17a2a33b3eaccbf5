//! Tensor helpers shared by the models.

mod complex;

pub use complex::{combine_complex, split_complex};
