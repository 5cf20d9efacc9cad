//! Annotators turn raw texts into [Doc]s.
//!
//! Annotators are constructed explicitly and handed to the pipeline,
//! which only relies on the [Annotate] trait.
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use super::{Doc, Token};
use crate::error::Error;

/// Annotation returns one [Doc] per input text, in input order.
pub trait Annotate: Send + Sync {
    fn name(&self) -> &str;
    fn annotate(&self, texts: &[&str]) -> Result<Vec<Doc>, Error>;
}

/// Throughput settings handed to the annotator.
///
/// These are recorded in the run log but not interpreted by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorSettings {
    pub batch_size: usize,
    pub n_threads: usize,
}

impl Default for AnnotatorSettings {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            n_threads: 2,
        }
    }
}

/// word -> part-of-speech tag lookup table.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, String>,
}

impl Lexicon {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Read `word<delimiter>tag` records. There is no header line.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .flexible(false)
            .from_reader(reader);

        let mut entries = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            match (record.get(0), record.get(1)) {
                (Some(word), Some(tag)) => {
                    entries.insert(word.to_string(), tag.to_string());
                }
                _ => {
                    return Err(Error::Custom(format!(
                        "lexicon record {:?} does not have a word and a tag",
                        record
                    )))
                }
            }
        }

        Ok(Self { entries })
    }

    /// Tab-separated for `.tsv` files, comma-separated otherwise.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some("tsv") => b'\t',
            _ => b',',
        };
        let f = std::fs::File::open(path)?;
        let lexicon = Self::from_reader(f, delimiter)?;
        debug!("loaded {} lexicon entries from {:?}", lexicon.len(), path);
        Ok(lexicon)
    }

    /// Exact match first, then lowercase.
    pub fn tag(&self, word: &str) -> Option<&str> {
        self.entries
            .get(word)
            .or_else(|| self.entries.get(&word.to_lowercase()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits on unicode word boundaries, dropping whitespace,
/// and tags tokens from an optional [Lexicon].
#[derive(Debug, Clone, Default)]
pub struct WordAnnotator {
    lexicon: Option<Lexicon>,
    settings: AnnotatorSettings,
}

impl WordAnnotator {
    pub fn new(lexicon: Option<Lexicon>, settings: AnnotatorSettings) -> Self {
        Self { lexicon, settings }
    }

    pub fn settings(&self) -> &AnnotatorSettings {
        &self.settings
    }

    fn annotate_one(&self, text: &str) -> Doc {
        let tokens = text
            .split_word_bounds()
            .filter(|segment| !segment.trim().is_empty())
            .map(|segment| {
                let tag = self
                    .lexicon
                    .as_ref()
                    .and_then(|l| l.tag(segment))
                    .map(String::from);
                Token::new(segment.to_string(), tag)
            })
            .collect();
        Doc::new(tokens)
    }
}

impl Annotate for WordAnnotator {
    fn name(&self) -> &str {
        "word_annotator"
    }

    fn annotate(&self, texts: &[&str]) -> Result<Vec<Doc>, Error> {
        Ok(texts.iter().map(|t| self.annotate_one(t)).collect())
    }
}
