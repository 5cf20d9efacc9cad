//! Corpus-level window extraction.
//!
//! Applies [windows] to every document of a batch and builds a batch of window rows:
//!
//! | ngram | sent_id | metadata... |
//! |-------|---------|-------------|
//!
//! Rows are ordered by document, then by window. The resulting batch has a dense `0..n` index.
use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::windows;
use crate::annotation::Doc;
use crate::batch::{Batch, Column, RowId, Value};
use crate::error::Error;
use crate::filtering::PosFilter;
use crate::pipelines::Extract;

pub const NGRAM_COLUMN: &str = "ngram";
pub const SENT_ID_COLUMN: &str = "sent_id";

/// Window shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowOptions {
    pub half_width: usize,
    pub pad_token: String,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            half_width: 2,
            pad_token: "inv".to_string(),
        }
    }
}

/// Which positions of each document are used as window centers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    /// Positions whose tag is in the filter.
    Pos(PosFilter),
    /// Explicit positions, one list per document in batch order.
    Indices(Vec<Vec<usize>>),
}

/// Source columns copied onto each window row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IncludeMetadata {
    #[default]
    None,
    /// Every column but the document one.
    All,
    Columns(Vec<String>),
}

impl IncludeMetadata {
    /// Resolve to a list of column names of `batch`.
    fn columns(&self, batch: &Batch, document_column: &str) -> Result<Vec<String>, Error> {
        match self {
            IncludeMetadata::None => Ok(Vec::new()),
            IncludeMetadata::All => Ok(batch
                .column_names()
                .filter(|c| *c != document_column)
                .map(String::from)
                .collect()),
            IncludeMetadata::Columns(cols) => {
                for c in cols {
                    batch.column(c)?;
                }
                Ok(cols.clone())
            }
        }
    }
}

impl Serialize for IncludeMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IncludeMetadata::None => serializer.serialize_bool(false),
            IncludeMetadata::All => serializer.serialize_bool(true),
            IncludeMetadata::Columns(c) => c.serialize(serializer),
        }
    }
}

/// `true`, `false` or a list of column names.
impl<'de> Deserialize<'de> for IncludeMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetadataVisitor;

        impl<'de> serde::de::Visitor<'de> for MetadataVisitor {
            type Value = IncludeMetadata;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("`include_metadata` as a boolean or a list of column names")
            }

            fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(if v {
                    IncludeMetadata::All
                } else {
                    IncludeMetadata::None
                })
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> Result<Self::Value, A::Error> {
                let mut cols = Vec::new();
                while let Some(c) = seq.next_element::<String>()? {
                    cols.push(c);
                }
                Ok(IncludeMetadata::Columns(cols))
            }
        }

        deserializer.deserialize_any(MetadataVisitor)
    }
}

fn doc_at<'b>(column: &'b Column, document_column: &str, pos: usize) -> Result<&'b Doc, Error> {
    column[pos].as_doc().ok_or_else(|| Error::ColumnType {
        column: document_column.to_string(),
        expected: "document",
        got: column[pos].type_name(),
    })
}

/// Extract windows from every document of `batch[document_column]`.
///
/// Fails if the document column is missing or holds something else than documents,
/// if an index filter does not have one entry per row or points outside of its document,
/// and if metadata is requested while row identifiers are not unique.
pub fn extract_corpus_windows(
    batch: &Batch,
    document_column: &str,
    window: &WindowOptions,
    selection: &Selection,
    metadata: &IncludeMetadata,
) -> Result<Batch, Error> {
    let docs = batch.column(document_column)?;

    if let Selection::Indices(filters) = selection {
        if filters.len() != batch.len() {
            return Err(Error::config(
                "index_filter",
                format!(
                    "got {} index lists for a batch of {} documents",
                    filters.len(),
                    batch.len()
                ),
            ));
        }
    }

    let mut ngrams: Column = Vec::new();
    let mut sent_ids: Vec<RowId> = Vec::new();

    for (pos, sent_id) in batch.index().iter().enumerate() {
        let doc = doc_at(docs, document_column, pos)?;

        let pos_indices;
        let filter = match selection {
            Selection::All => None,
            Selection::Pos(f) => {
                pos_indices = f.indices(doc);
                Some(pos_indices.as_slice())
            }
            Selection::Indices(filters) => Some(filters[pos].as_slice()),
        };

        for w in windows(doc, window.half_width, &window.pad_token, filter) {
            ngrams.push(Value::Text(w?));
            sent_ids.push(*sent_id);
        }
    }

    debug!(
        "extracted {} windows from {} documents",
        ngrams.len(),
        batch.len()
    );

    let mut result = Batch::with_len(ngrams.len());
    let metadata_columns = metadata.columns(batch, document_column)?;
    let metadata_values = if metadata_columns.is_empty() {
        Vec::new()
    } else {
        join_metadata(batch, &metadata_columns, &sent_ids)?
    };

    result.set_column(NGRAM_COLUMN, ngrams)?;
    result.set_column(
        SENT_ID_COLUMN,
        sent_ids.iter().map(|id| Value::Int(*id)).collect(),
    )?;
    for (name, values) in metadata_columns.into_iter().zip(metadata_values) {
        if result.has_column(&name) {
            return Err(Error::DuplicateColumn(name));
        }
        result.set_column(name, values)?;
    }

    Ok(result)
}

/// Copy `columns` of `source` for each identifier of `sent_ids`.
fn join_metadata(
    source: &Batch,
    columns: &[String],
    sent_ids: &[RowId],
) -> Result<Vec<Column>, Error> {
    let positions: HashMap<RowId, usize> = source.row_positions()?;
    let rows: Vec<usize> = sent_ids
        .iter()
        .map(|id| {
            positions
                .get(id)
                .copied()
                .ok_or_else(|| Error::Custom(format!("sent_id {} not found in source batch", id)))
        })
        .collect::<Result<_, _>>()?;

    columns
        .iter()
        .map(|name| {
            let column = source.column(name)?;
            Ok(rows.iter().map(|r| column[*r].clone()).collect())
        })
        .collect()
}

/// [Extract] implementation running [extract_corpus_windows] on each sub-batch.
#[derive(Debug, Clone)]
pub struct CorpusNgrams {
    document_column: String,
    window: WindowOptions,
    selection: Selection,
    metadata: IncludeMetadata,
}

impl CorpusNgrams {
    pub fn new(
        document_column: String,
        window: WindowOptions,
        selection: Selection,
        metadata: IncludeMetadata,
    ) -> Self {
        Self {
            document_column,
            window,
            selection,
            metadata,
        }
    }

    pub fn document_column(&self) -> &str {
        &self.document_column
    }
}

impl Extract for CorpusNgrams {
    fn name(&self) -> &str {
        "generate_corpus_ngrams"
    }

    fn extract(&self, batch: Batch) -> Result<Batch, Error> {
        extract_corpus_windows(
            &batch,
            &self.document_column,
            &self.window,
            &self.selection,
            &self.metadata,
        )
    }
}
