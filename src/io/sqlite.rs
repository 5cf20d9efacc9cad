/*! SQLite tables as batch sources and sinks.

Tables carry an integer row identifier column (`"index"` by default) that maps to the batch index.
!*/
use std::num::NonZeroUsize;

use log::{debug, info};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection};

use crate::batch::{Batch, Column, RowId, Value};
use crate::error::Error;
use crate::pipelines::Save;

/// Name of the row identifier column.
pub const INDEX_COLUMN: &str = "index";

fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Value::Null => Ok(ToSqlOutput::from(rusqlite::types::Null)),
            Value::Int(i) => Ok(ToSqlOutput::from(*i)),
            Value::Float(x) => Ok(ToSqlOutput::from(*x)),
            Value::Text(s) => Ok(ToSqlOutput::from(s.as_str())),
            Value::Doc(d) => Err(rusqlite::Error::ToSqlConversionFailure(
                format!(
                    "documents can't be stored in a table (got a document of {} tokens)",
                    d.tokens().len()
                )
                .into(),
            )),
        }
    }
}

/// Drop `table` if it exists.
pub fn remove_table(conn: &Connection, table: &str) -> Result<(), Error> {
    conn.execute_batch(&format!("DROP TABLE IF EXISTS {};", quote(table)))?;
    info!("removed table {} (if it existed)", table);
    Ok(())
}

/// Check whether `table` exists.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool, Error> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Reads a table in chunks of `chunk_size` rows, ordered by the index column.
///
/// Iteration stops at the first empty chunk or at the first error.
pub struct ChunkReader<'conn> {
    conn: &'conn Connection,
    table: String,
    index_column: String,
    chunk_size: NonZeroUsize,
    offset: usize,
    done: bool,
}

impl<'conn> ChunkReader<'conn> {
    pub fn new(
        conn: &'conn Connection,
        table: impl Into<String>,
        index_column: impl Into<String>,
        chunk_size: NonZeroUsize,
    ) -> Self {
        Self {
            conn,
            table: table.into(),
            index_column: index_column.into(),
            chunk_size,
            offset: 0,
            done: false,
        }
    }

    fn read_chunk(&mut self) -> Result<Option<Batch>, Error> {
        let sql = format!(
            "SELECT * FROM {} ORDER BY {} LIMIT ?1 OFFSET ?2",
            quote(&self.table),
            quote(&self.index_column)
        );
        debug!("{} (offset {})", sql, self.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let index_position = names
            .iter()
            .position(|n| n == &self.index_column)
            .ok_or_else(|| Error::MissingColumn(self.index_column.clone()))?;

        let mut index: Vec<RowId> = Vec::new();
        let mut columns: Vec<Column> = vec![Vec::new(); names.len()];
        let mut rows = stmt.query(params![
            self.chunk_size.get() as i64,
            self.offset as i64
        ])?;

        while let Some(row) = rows.next()? {
            for (i, column) in columns.iter_mut().enumerate() {
                let value = match row.get_ref(i)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(v) => Value::Int(v),
                    ValueRef::Real(v) => Value::Float(v),
                    ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
                    ValueRef::Blob(_) => {
                        return Err(Error::ColumnType {
                            column: names[i].clone(),
                            expected: "integer, real, text or null",
                            got: "blob",
                        })
                    }
                };

                if i == index_position {
                    let id = value.as_int().ok_or_else(|| Error::ColumnType {
                        column: self.index_column.clone(),
                        expected: "integer",
                        got: value.type_name(),
                    })?;
                    index.push(id);
                } else {
                    column.push(value);
                }
            }
        }

        if index.is_empty() {
            return Ok(None);
        }
        self.offset += index.len();

        let mut batch = Batch::new(index);
        for (i, (name, column)) in names.into_iter().zip(columns).enumerate() {
            if i != index_position {
                batch.set_column(name, column)?;
            }
        }
        Ok(Some(batch))
    }
}

impl<'conn> Iterator for ChunkReader<'conn> {
    type Item = Result<Batch, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_chunk() {
            Ok(Some(batch)) => Some(Ok(batch)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Declared type of a column, from its first non-null value.
///
/// Columns without any value are left untyped, so that SQLite stores later values as given.
fn declared_type(column: &Column) -> Option<&'static str> {
    match column.iter().find(|v| **v != Value::Null)? {
        Value::Int(_) => Some("INTEGER"),
        Value::Float(_) => Some("REAL"),
        _ => Some("TEXT"),
    }
}

/// Appends batches to a table, creating it on the first non-empty batch.
///
/// The batch index is written to the `"index"` column.
/// Column types come from the first non-null value of that batch.
pub struct TableWriter<'conn> {
    conn: &'conn Connection,
    table: String,
    created: bool,
}

impl<'conn> TableWriter<'conn> {
    pub fn new(conn: &'conn Connection, table: impl Into<String>) -> Self {
        Self {
            conn,
            table: table.into(),
            created: false,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn create(&self, batch: &Batch) -> Result<(), Error> {
        let mut fields = vec![format!("{} INTEGER", quote(INDEX_COLUMN))];
        fields.extend(batch.columns().map(|(name, column)| match declared_type(column) {
            Some(ty) => format!("{} {}", quote(name), ty),
            None => quote(name),
        }));
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            quote(&self.table),
            fields.join(", ")
        );
        debug!("{}", sql);
        self.conn.execute_batch(&sql)?;
        Ok(())
    }
}

impl<'conn> Save for TableWriter<'conn> {
    fn name(&self) -> &str {
        "save_table"
    }

    fn save(&mut self, batch: Batch) -> Result<(), Error> {
        if batch.has_column(INDEX_COLUMN) {
            return Err(Error::DuplicateColumn(INDEX_COLUMN.to_string()));
        }
        if batch.is_empty() {
            debug!("nothing to append to {}", self.table);
            return Ok(());
        }
        if !self.created {
            self.create(&batch)?;
            self.created = true;
        }

        let names: Vec<String> = std::iter::once(INDEX_COLUMN)
            .chain(batch.column_names())
            .map(quote)
            .collect();
        let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote(&self.table),
            names.join(", "),
            placeholders.join(", ")
        );

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for (position, id) in batch.index().iter().enumerate() {
                let mut values: Vec<&dyn ToSql> = Vec::with_capacity(names.len());
                values.push(id);
                values.extend(batch.row(position).map(|v| v as &dyn ToSql));
                stmt.execute(values.as_slice())?;
            }
        }
        tx.commit()?;
        debug!("appended {} rows to {}", batch.len(), self.table);
        Ok(())
    }
}
