/*! splitting

Batch splitting for parallel dispatch.

A batch of `len` rows is split in `ceil(len / size)` consecutive parts of `size` rows,
the last one holding the remainder. Without a size, or with a size larger than the batch,
the batch is returned whole.
!*/
use std::num::NonZeroUsize;

use log::debug;

use crate::batch::Batch;

/// Row ranges of each part.
fn bounds(len: usize, size: Option<NonZeroUsize>) -> Option<Vec<std::ops::Range<usize>>> {
    match size {
        Some(size) if size.get() < len => {
            let size = size.get();
            Some(
                (0..len)
                    .step_by(size)
                    .map(|start| start..(start + size).min(len))
                    .collect(),
            )
        }
        _ => None,
    }
}

/// Split a [Batch] in sub-batches of `size` rows.
///
/// Sub-batches are independent copies.
pub fn split(batch: Batch, size: Option<NonZeroUsize>) -> Vec<Batch> {
    match bounds(batch.len(), size) {
        Some(ranges) => {
            debug!("splitting {} rows in {} parts", batch.len(), ranges.len());
            ranges.into_iter().map(|r| batch.slice(r)).collect()
        }
        None => vec![batch],
    }
}

/// Split a sequence of items (documents, texts...) the same way [split] splits batches.
pub fn split_items<T: Clone>(items: &[T], size: Option<NonZeroUsize>) -> Vec<Vec<T>> {
    match bounds(items.len(), size) {
        Some(ranges) => ranges.into_iter().map(|r| items[r].to_vec()).collect(),
        None => vec![items.to_vec()],
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use crate::annotation::Doc;
    use crate::batch::{Batch, Value};

    use super::{split, split_items};

    fn gen_batch(n: usize) -> Batch {
        let mut b = Batch::with_len(n);
        for c in 0..5 {
            b.set_column(
                format!("{}", c),
                (0..n as i64).map(Value::Int).collect(),
            )
            .unwrap();
        }
        b
    }

    #[test]
    fn test_split_sizes() {
        let b = gen_batch(6);
        let parts = split(b, NonZeroUsize::new(4));
        assert_eq!(parts.iter().map(Batch::len).collect::<Vec<_>>(), vec![4, 2]);
        assert_eq!(parts[1].index(), &[4, 5]);
    }

    #[test]
    fn test_split_reconstructs() {
        for n in 1..12 {
            for size in 1..14 {
                let b = gen_batch(n);
                let parts = split(b.clone(), NonZeroUsize::new(size));
                assert_eq!(parts.len(), (n + size - 1) / size);
                assert_eq!(parts.iter().map(Batch::len).sum::<usize>(), n);
                assert!(parts.iter().all(|p| !p.is_empty() && p.len() <= size));
                assert_eq!(Batch::concat(parts), b);
            }
        }
    }

    #[test]
    fn test_split_whole() {
        let b = gen_batch(3);
        assert_eq!(split(b.clone(), None), vec![b.clone()]);
        assert_eq!(split(b.clone(), NonZeroUsize::new(3)), vec![b.clone()]);
        assert_eq!(split(b.clone(), NonZeroUsize::new(10)), vec![b]);
    }

    #[test]
    fn test_split_empty() {
        let parts = split(Batch::default(), NonZeroUsize::new(2));
        assert_eq!(parts.len(), 1);
        assert!(parts[0].is_empty());
    }

    #[test]
    fn test_split_docs() {
        let docs: Vec<Doc> = [
            "Lorem ipsum dolor sit amet consectetur adipiscing",
            "elit sed do eiusmod tempor incididunt ut labore et dolore magna aliqua",
            "Ut enim ad minim veniam quis nostrud exercitation",
            "ullamco laboris nisi ut aliquip ex ea commodo consequat",
            "Duis aute irure dolor in reprehenderit in voluptate",
            "velit esse cillum dolore eu fugiat nulla pariatur",
        ]
        .iter()
        .map(|s| Doc::from_words(s.split(' ')))
        .collect();

        let parts = split_items(&docs, NonZeroUsize::new(4));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts.iter().map(Vec::len).sum::<usize>(), docs.len());
        assert_eq!(parts.concat(), docs);
        assert_eq!(split_items(&docs, None).len(), 1);
    }
}
