/*!
# IO utilities

Batch loading and saving.

Currently only SQLite tables are supported, see [sqlite].
!*/
pub mod sqlite;

pub use sqlite::{remove_table, ChunkReader, TableWriter};
