//! Joins on row identifiers.
use super::{Batch, RowId};
use crate::error::Error;

impl Batch {
    /// Inner join `other`'s columns onto `self`, matching rows by identifier.
    ///
    /// Row order and identifiers of `self` are kept.
    /// Identifiers must be unique on both sides, and column names must not overlap.
    pub fn join_inner(self, other: &Batch) -> Result<Batch, Error> {
        if let Some(name) = other.column_names().find(|n| self.has_column(n)) {
            return Err(Error::DuplicateColumn(name.to_string()));
        }

        // fail on duplicates on the left side too
        self.row_positions()?;
        let right = other.row_positions()?;

        let (left_positions, right_positions): (Vec<usize>, Vec<usize>) = self
            .index
            .iter()
            .enumerate()
            .filter_map(|(pos, id)| right.get(id).map(|r| (pos, *r)))
            .unzip();

        let mut joined = if left_positions.len() == self.len() {
            self
        } else {
            self.take_rows(&left_positions)
        };

        for (name, column) in other.columns() {
            let values = right_positions.iter().map(|p| column[*p].clone()).collect();
            joined.set_column(name, values)?;
        }

        Ok(joined)
    }

    /// Identifiers present in `self` but missing in `other`.
    pub fn missing_in(&self, other: &Batch) -> Vec<RowId> {
        let other: std::collections::HashSet<&RowId> = other.index.iter().collect();
        self.index
            .iter()
            .filter(|id| !other.contains(id))
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::batch::{Batch, Value};
    use crate::error::Error;

    fn left() -> Batch {
        Batch::new(vec![0, 1, 2, 3])
            .with_column("x", (0..4).map(Value::Int).collect())
            .unwrap()
    }

    #[test]
    fn test_join_aligned() {
        let right = Batch::new(vec![3, 2, 1, 0])
            .with_column("a", (0..4).map(|i| Value::Int(10 + i)).collect())
            .unwrap();
        let j = left().join_inner(&right).unwrap();
        assert_eq!(j.index(), &[0, 1, 2, 3]);
        assert_eq!(j.width(), 2);
        // row 0 of left matches row 3 of right
        assert_eq!(j.column("a").unwrap()[0], Value::Int(13));
    }

    #[test]
    fn test_join_drops_unmatched() {
        let right = Batch::new(vec![1, 3])
            .with_column("a", vec![Value::from("one"), Value::from("three")])
            .unwrap();
        let l = left();
        assert_eq!(l.missing_in(&right), vec![0, 2]);
        let j = l.join_inner(&right).unwrap();
        assert_eq!(j.index(), &[1, 3]);
        assert_eq!(j.column("x").unwrap(), &vec![Value::Int(1), Value::Int(3)]);
        assert_eq!(j.column("a").unwrap()[1], Value::from("three"));
    }

    #[test]
    fn test_join_overlapping_columns() {
        let right = Batch::new(vec![0]).with_column("x", vec![Value::Null]).unwrap();
        assert!(matches!(
            left().join_inner(&right),
            Err(Error::DuplicateColumn(c)) if c == "x"
        ));
    }
}
