//! Neural-network building blocks on top of `candle-nn`.

mod combination;
mod sequential;

pub use combination::{
    ComplExLiteralCombination, Combination, ComplexCombination, DistMultCombination,
};
pub use sequential::{SequentialT, Tanh};
