//! Filtering trait.

/// Pure predicate on tokens (or their attributes).
///
/// Two calls on equal items return the same result.
pub trait Filter<T>: Default {
    fn detect(&self, item: T) -> bool;

    /// Positions of the items that are detected, in order.
    fn positions<I>(&self, items: I) -> Vec<usize>
    where
        I: IntoIterator<Item = T>,
    {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| if self.detect(item) { Some(i) } else { None })
            .collect()
    }
}
