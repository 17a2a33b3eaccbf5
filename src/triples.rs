//! Triples and id batches.
//!
//! Batches are integer tensors with one row per query:
//! - `[n, 3]` rows `(head, relation, tail)` for pairwise scoring
//! - `[n, 2]` rows `(head, relation)` when scoring all tails
//! - `[n, 2]` rows `(relation, tail)` when scoring all heads

use candle_core::{DType, Device, IndexOp, Tensor};
use serde::{Deserialize, Serialize};

use crate::error::{KgeError, Result};

/// A `(head, relation, tail)` fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub head: u32,
    pub relation: u32,
    pub tail: u32,
}

impl Triple {
    pub fn new(head: u32, relation: u32, tail: u32) -> Self {
        Self {
            head,
            relation,
            tail,
        }
    }
}

impl From<(u32, u32, u32)> for Triple {
    fn from((head, relation, tail): (u32, u32, u32)) -> Self {
        Self::new(head, relation, tail)
    }
}

/// Entity and relation counts of a graph: the table sizes a model needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KgSize {
    pub num_entities: usize,
    pub num_relations: usize,
}

impl KgSize {
    pub fn new(num_entities: usize, num_relations: usize) -> Self {
        Self {
            num_entities,
            num_relations,
        }
    }

    /// Smallest size covering every id in `triples` (max id + 1).
    pub fn from_triples(triples: &[Triple]) -> Self {
        let (entities, relations) = triples.iter().fold((0usize, 0usize), |(e, r), t| {
            (
                e.max(t.head as usize + 1).max(t.tail as usize + 1),
                r.max(t.relation as usize + 1),
            )
        });
        Self::new(entities, relations)
    }
}

/// Column layout of an id batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchLayout {
    /// `(head, relation, tail)`
    Hrt,
    /// `(head, relation)`
    Hr,
    /// `(relation, tail)`
    Rt,
}

#[derive(Clone, Copy)]
enum Column {
    Entity,
    Relation,
}

impl BatchLayout {
    /// Number of columns.
    pub fn width(self) -> usize {
        self.columns().len()
    }

    fn columns(self) -> &'static [Column] {
        match self {
            BatchLayout::Hrt => &[Column::Entity, Column::Relation, Column::Entity],
            BatchLayout::Hr => &[Column::Entity, Column::Relation],
            BatchLayout::Rt => &[Column::Relation, Column::Entity],
        }
    }
}

/// Build an `[n, 3]` U32 batch from triples.
pub fn hrt_batch(triples: &[Triple], device: &Device) -> Result<Tensor> {
    let data: Vec<u32> = triples
        .iter()
        .flat_map(|t| [t.head, t.relation, t.tail])
        .collect();
    Ok(Tensor::from_vec(data, (triples.len(), 3), device)?)
}

/// Build an `[n, 2]` U32 batch of `(head, relation)` pairs.
pub fn hr_batch(pairs: &[(u32, u32)], device: &Device) -> Result<Tensor> {
    pair_batch(pairs, device)
}

/// Build an `[n, 2]` U32 batch of `(relation, tail)` pairs.
pub fn rt_batch(pairs: &[(u32, u32)], device: &Device) -> Result<Tensor> {
    pair_batch(pairs, device)
}

fn pair_batch(pairs: &[(u32, u32)], device: &Device) -> Result<Tensor> {
    let data: Vec<u32> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
    Ok(Tensor::from_vec(data, (pairs.len(), 2), device)?)
}

/// Split an `[n, 3]` batch into its head, relation and tail columns, each `[n]`.
pub fn slice_triples(batch: &Tensor) -> Result<(Tensor, Tensor, Tensor)> {
    check_shape(batch, BatchLayout::Hrt)?;
    Ok((column(batch, 0)?, column(batch, 1)?, column(batch, 2)?))
}

/// Split an `[n, 2]` batch into its two columns.
pub fn slice_pairs(batch: &Tensor) -> Result<(Tensor, Tensor)> {
    check_shape(batch, BatchLayout::Hr)?;
    Ok((column(batch, 0)?, column(batch, 1)?))
}

// Index lookups need contiguous ids.
fn column(batch: &Tensor, index: usize) -> Result<Tensor> {
    Ok(batch.i((.., index))?.contiguous()?)
}

fn check_shape(batch: &Tensor, layout: BatchLayout) -> Result<()> {
    let dims = batch.dims();
    if dims.len() != 2 || dims[1] != layout.width() {
        return Err(KgeError::ShapeMismatch {
            expected: format!("[n, {}]", layout.width()),
            got: format!("{dims:?}"),
        });
    }
    if batch.dtype().is_float() {
        return Err(KgeError::ShapeMismatch {
            expected: "integer ids".into(),
            got: format!("{:?}", batch.dtype()),
        });
    }
    Ok(())
}

/// Validate a batch's shape and that every id fits its table.
///
/// Runs before any lookup so bad ids surface as `IndexOutOfRange`
/// instead of a backend error.
pub fn check_batch(batch: &Tensor, layout: BatchLayout, size: &KgSize) -> Result<()> {
    check_shape(batch, layout)?;
    if batch.dim(0)? == 0 {
        return Ok(());
    }

    // Only the per-column extremes leave the device.
    let ids = batch.to_dtype(DType::I64)?;
    let mins = ids.min(0)?.to_vec1::<i64>()?;
    let maxs = ids.max(0)?.to_vec1::<i64>()?;
    for ((&min, &max), column) in mins.iter().zip(&maxs).zip(layout.columns()) {
        let (kind, bound) = match column {
            Column::Entity => ("entity", size.num_entities),
            Column::Relation => ("relation", size.num_relations),
        };
        let bad = if min < 0 {
            Some(min)
        } else if max as usize >= bound {
            Some(max)
        } else {
            None
        };
        if let Some(index) = bad {
            return Err(KgeError::IndexOutOfRange { kind, index, bound });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kg_size_from_triples() {
        let triples = [Triple::new(0, 2, 5), Triple::new(7, 0, 1)];
        assert_eq!(KgSize::from_triples(&triples), KgSize::new(8, 3));
        assert_eq!(KgSize::from_triples(&[]), KgSize::new(0, 0));
    }

    #[test]
    fn test_slice_triples() {
        let batch = hrt_batch(&[(1, 2, 3).into(), (4, 5, 6).into()], &Device::Cpu).unwrap();
        let (h, r, t) = slice_triples(&batch).unwrap();
        assert_eq!(h.to_vec1::<u32>().unwrap(), vec![1, 4]);
        assert_eq!(r.to_vec1::<u32>().unwrap(), vec![2, 5]);
        assert_eq!(t.to_vec1::<u32>().unwrap(), vec![3, 6]);
    }

    #[test]
    fn test_slice_triples_wrong_width() {
        let batch = hr_batch(&[(1, 2)], &Device::Cpu).unwrap();
        let err = slice_triples(&batch).unwrap_err();
        assert!(matches!(err, KgeError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_check_batch_bounds() {
        let size = KgSize::new(4, 2);
        let ok = hrt_batch(&[Triple::new(3, 1, 0)], &Device::Cpu).unwrap();
        assert!(check_batch(&ok, BatchLayout::Hrt, &size).is_ok());

        let bad_relation = hrt_batch(&[Triple::new(0, 2, 0)], &Device::Cpu).unwrap();
        match check_batch(&bad_relation, BatchLayout::Hrt, &size) {
            Err(KgeError::IndexOutOfRange { kind, index, bound }) => {
                assert_eq!(kind, "relation");
                assert_eq!(index, 2);
                assert_eq!(bound, 2);
            }
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }

        // (relation, tail): tail 4 is out of range
        let bad_tail = rt_batch(&[(1, 4)], &Device::Cpu).unwrap();
        assert!(matches!(
            check_batch(&bad_tail, BatchLayout::Rt, &size),
            Err(KgeError::IndexOutOfRange { kind: "entity", .. })
        ));
    }

    #[test]
    fn test_check_batch_reports_column_extreme() {
        let size = KgSize::new(10, 3);
        let triples = [
            Triple::new(0, 0, 1),
            Triple::new(9, 2, 12),
            Triple::new(4, 1, 15),
            Triple::new(2, 0, 3),
        ];
        let batch = hrt_batch(&triples, &Device::Cpu).unwrap();
        match check_batch(&batch, BatchLayout::Hrt, &size) {
            Err(KgeError::IndexOutOfRange { kind, index, bound }) => {
                assert_eq!((kind, index, bound), ("entity", 15, 10));
            }
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }

        let signed = Tensor::new(&[[0i64, 1], [-1, 0]], &Device::Cpu).unwrap();
        assert!(matches!(
            check_batch(&signed, BatchLayout::Hr, &size),
            Err(KgeError::IndexOutOfRange { kind: "entity", index: -1, .. })
        ));

        let empty = Tensor::zeros((0, 3), DType::U32, &Device::Cpu).unwrap();
        assert!(check_batch(&empty, BatchLayout::Hrt, &size).is_ok());
    }

    #[test]
    fn test_float_batch_rejected() {
        let batch = Tensor::zeros((2, 3), DType::F32, &Device::Cpu).unwrap();
        assert!(check_batch(&batch, BatchLayout::Hrt, &KgSize::new(1, 1)).is_err());
    }
}
