/*! Table-like batches

A [Batch] is a set of equally long named columns, plus a row identifier per row.
Rows keep the order and identifiers they had in their source.

Batches are column-oriented: transforms work on a whole [Column] at once.
!*/
mod join;

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use indexmap::IndexMap;
use serde::Serialize;

use crate::annotation::Doc;
use crate::error::Error;

/// Stable row identifier.
pub type RowId = i64;

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Doc(Doc),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Doc(_) => "document",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_doc(&self) -> Option<&Doc> {
        match self {
            Value::Doc(d) => Some(d),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Doc> for Value {
    fn from(v: Doc) -> Self {
        Value::Doc(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::Doc(d) => write!(f, "<document of {} tokens>", d.tokens().len()),
        }
    }
}

pub type Column = Vec<Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    index: Vec<RowId>,
    columns: IndexMap<String, Column>,
}

impl Batch {
    /// Create a batch with no columns and the provided row identifiers.
    pub fn new(index: Vec<RowId>) -> Self {
        Self {
            index,
            columns: IndexMap::new(),
        }
    }

    /// Create a batch of `len` rows, identified by `0..len`.
    pub fn with_len(len: usize) -> Self {
        Self::new((0..len as RowId).collect())
    }

    /// Builder-style [Batch::set_column].
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self, Error> {
        self.set_column(name, column)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn index(&self) -> &[RowId] {
        &self.index
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Result<&Column, Error> {
        self.columns
            .get(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Insert or replace a column.
    /// A replaced column keeps its position.
    pub fn set_column(&mut self, name: impl Into<String>, column: Column) -> Result<(), Error> {
        let name = name.into();
        if column.len() != self.len() {
            return Err(Error::ColumnLength {
                column: name,
                expected: self.len(),
                got: column.len(),
            });
        }
        self.columns.insert(name, column);
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Result<Column, Error> {
        self.columns
            .shift_remove(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Replace a column by `f(column)`, in place.
    ///
    /// `f` must return as many values as it got.
    /// If `f` fails, the column is removed from the batch.
    pub fn map_column<F>(&mut self, name: &str, f: F) -> Result<(), Error>
    where
        F: FnOnce(Column) -> Result<Column, Error>,
    {
        let (position, key, column) = self
            .columns
            .shift_remove_full(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))?;

        let column = f(column)?;
        if column.len() != self.len() {
            return Err(Error::ColumnLength {
                column: key,
                expected: self.len(),
                got: column.len(),
            });
        }
        self.columns.shift_insert(position, key, column);
        Ok(())
    }

    /// Copy rows `range` into a new, independent batch.
    pub fn slice(&self, range: Range<usize>) -> Batch {
        Batch {
            index: self.index[range.clone()].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(k, v)| (k.clone(), v[range.clone()].to_vec()))
                .collect(),
        }
    }

    /// Copy the rows at `positions`, in that order.
    pub fn take_rows(&self, positions: &[usize]) -> Batch {
        Batch {
            index: positions.iter().map(|p| self.index[*p]).collect(),
            columns: self
                .columns
                .iter()
                .map(|(k, v)| (k.clone(), positions.iter().map(|p| v[*p].clone()).collect()))
                .collect(),
        }
    }

    /// Values of the row at `position`, in column order.
    pub fn row(&self, position: usize) -> impl Iterator<Item = &Value> {
        self.columns.values().map(move |c| &c[position])
    }

    /// Stack batches vertically.
    ///
    /// Columns are the ordered union of every batch's columns,
    /// cells from batches lacking a column are [Value::Null].
    /// Row identifiers are kept as is, see [Batch::reindex].
    pub fn concat(batches: Vec<Batch>) -> Batch {
        let total: usize = batches.iter().map(Batch::len).sum();
        let mut index = Vec::with_capacity(total);
        let mut columns: IndexMap<String, Column> = IndexMap::new();
        for b in &batches {
            for name in b.columns.keys() {
                if !columns.contains_key(name) {
                    columns.insert(name.clone(), Vec::with_capacity(total));
                }
            }
        }

        for mut b in batches {
            let len = b.len();
            for (name, column) in columns.iter_mut() {
                match b.columns.shift_remove(name) {
                    Some(values) => column.extend(values),
                    None => column.extend(std::iter::repeat(Value::Null).take(len)),
                }
            }
            index.append(&mut b.index);
        }

        Batch { index, columns }
    }

    /// Replace row identifiers by `0..len`.
    pub fn reindex(&mut self) {
        self.index = (0..self.len() as RowId).collect();
    }

    /// Map row identifiers to their position.
    /// Fails if an identifier appears twice.
    pub fn row_positions(&self) -> Result<HashMap<RowId, usize>, Error> {
        let mut positions = HashMap::with_capacity(self.len());
        for (pos, id) in self.index.iter().enumerate() {
            if positions.insert(*id, pos).is_some() {
                return Err(Error::DuplicateRowId(*id));
            }
        }
        Ok(positions)
    }
}
