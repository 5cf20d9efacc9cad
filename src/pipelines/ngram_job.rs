/*! End-to-end ngram job on a SQLite table.

1. Drops the output table,
1. Reads the input table in chunks,
1. Normalizes the text column (see [TextStep]),
1. Annotates it with a [WordAnnotator],
1. Extracts windows with [CorpusNgrams],
1. Appends windows to the output table,
1. Writes the run log, if a log path is set.

The job always annotates, so `use_annotation` has no effect here.
A `pos_filter` needs a lexicon to tag tokens, and `index_filter` is rejected
since its per-document lists can't follow rows across chunks.
!*/
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};
use rusqlite::Connection;
use serde_json::{json, Map};

use super::{FeaturePipeline, Pipeline, PipelineSettings, RunSummary};
use crate::annotation::{Lexicon, WordAnnotator};
use crate::config::NgramConfig;
use crate::error::Error;
use crate::io::sqlite::{remove_table, table_exists, ChunkReader, TableWriter, INDEX_COLUMN};
use crate::ngrams::{CorpusNgrams, NGRAM_COLUMN};
use crate::runlog::RunLog;
use crate::transformers::TextStep;

#[derive(Debug, Clone)]
pub struct NgramJob {
    pub database: PathBuf,
    pub table: String,
    pub text_column: String,
    pub index_column: String,
    /// Rows read per batch.
    pub chunk_size: usize,
    pub steps: Vec<TextStep>,
    pub lexicon: Option<PathBuf>,
    pub output_table: Option<String>,
    pub config: NgramConfig,
}

impl NgramJob {
    /// Create a new job with default steps, reading 1000 rows at a time.
    ///
    /// Fails if `config` is invalid.
    pub fn new(
        database: PathBuf,
        table: String,
        text_column: String,
        config: NgramConfig,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            database,
            table,
            text_column,
            index_column: INDEX_COLUMN.to_string(),
            chunk_size: 1000,
            steps: TextStep::defaults(),
            lexicon: None,
            output_table: None,
            config,
        })
    }

    /// Output table name, defaulting to `<table>_n=<half_width>[_pos-filter]`.
    pub fn output_table(&self) -> String {
        match &self.output_table {
            Some(name) => name.clone(),
            None => {
                let mut name = format!("{}_n={}", self.table, self.config.half_width);
                if self.config.pos_filter.is_some() {
                    name.push_str("_pos-filter");
                }
                name
            }
        }
    }

    /// Run log entry name, defaulting to the output table name.
    pub fn run_name(&self) -> String {
        self.config
            .run_name
            .clone()
            .unwrap_or_else(|| self.output_table())
    }

    fn run_log(&self, log_path: PathBuf, output_table: &str) -> Result<RunLog, Error> {
        let mut settings = Map::new();
        settings.insert(
            "Pipeline Input".to_string(),
            json!({
                "Database Path": self.database.display().to_string(),
                "Table Name": self.table,
                "Include PoS Filtering": self.config.pos_filter.is_some(),
            }),
        );
        settings.insert("ngram Size".to_string(), json!(self.config.half_width));
        settings.insert(
            "Pipeline Output".to_string(),
            json!({ "Table Name": output_table }),
        );
        settings.insert("config".to_string(), serde_json::to_value(&self.config)?);
        settings.insert("steps".to_string(), serde_json::to_value(&self.steps)?);
        Ok(RunLog::new(log_path, self.run_name(), settings))
    }
}

impl Pipeline<RunSummary> for NgramJob {
    fn run(&self) -> Result<RunSummary, Error> {
        self.config.validate()?;
        if self.config.pos_filter.is_some() && self.lexicon.is_none() {
            return Err(Error::config("pos_filter", "requires a lexicon to tag tokens"));
        }
        if self.config.index_filter.is_some() {
            return Err(Error::config(
                "index_filter",
                "not supported when reading a table in chunks",
            ));
        }
        let chunk_size = NonZeroUsize::new(self.chunk_size)
            .ok_or_else(|| Error::config("chunk_size", "must be at least 1"))?;
        let output_table = self.output_table();
        if output_table == self.table {
            return Err(Error::config(
                "output_table",
                "must differ from the input table",
            ));
        }

        let conn = Connection::open(&self.database)?;
        debug!("opened database {:?}", self.database);
        if !table_exists(&conn, &self.table)? {
            return Err(Error::config(
                "table",
                format!("table {} does not exist", self.table),
            ));
        }
        remove_table(&conn, &output_table)?;

        let lexicon = match &self.lexicon {
            Some(path) => Some(Lexicon::from_path(path)?),
            None => None,
        };
        let annotator = WordAnnotator::new(lexicon, self.config.annotator.clone());

        let settings = PipelineSettings {
            text_column: self.text_column.clone(),
            feature_column: NGRAM_COLUMN.to_string(),
            batch_size: self.config.batch_size(),
            num_processes: self.config.num_processes,
            use_annotation: true,
        };
        let extraction = CorpusNgrams::new(
            settings.document_column(),
            self.config.window(),
            self.config.selection(),
            self.config.include_metadata.clone(),
        );
        let writer = TableWriter::new(&conn, output_table.clone());

        let mut pipeline = FeaturePipeline::new(settings, Box::new(extraction), Box::new(writer));
        for step in &self.steps {
            pipeline.add_pre_extraction(step.transform());
        }
        pipeline.with_annotator(Arc::new(annotator));
        if let Some(log_path) = &self.config.log_path {
            pipeline.with_run_log(self.run_log(log_path.clone(), &output_table)?);
        }

        info!(
            "extracting ngrams (n={}) from {} into {}",
            self.config.half_width, self.table, output_table
        );
        let reader = ChunkReader::new(
            &conn,
            self.table.clone(),
            self.index_column.clone(),
            chunk_size,
        );
        let summary = pipeline.start(reader, Vec::new())?;
        info!(
            "wrote {} ngrams from {} rows ({} batches)",
            summary.output_rows, summary.input_rows, summary.batches
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen_job(config: NgramConfig) -> NgramJob {
        NgramJob::new(
            PathBuf::from("corpus.db"),
            "reviews".to_string(),
            "text".to_string(),
            config,
        )
        .unwrap()
    }

    #[test]
    fn test_output_table() {
        let job = gen_job(NgramConfig::default());
        assert_eq!(job.output_table(), "reviews_n=2");
        assert_eq!(job.run_name(), "reviews_n=2");

        let job = gen_job(NgramConfig {
            half_width: 3,
            pos_filter: Some(["NOUN".to_string()].into_iter().collect()),
            run_name: Some("nouns".to_string()),
            ..Default::default()
        });
        assert_eq!(job.output_table(), "reviews_n=3_pos-filter");
        assert_eq!(job.run_name(), "nouns");
    }

    #[test]
    fn test_invalid_config() {
        let res = NgramJob::new(
            PathBuf::from("corpus.db"),
            "reviews".to_string(),
            "text".to_string(),
            NgramConfig {
                num_processes: 0,
                ..Default::default()
            },
        );
        assert!(matches!(
            res,
            Err(Error::Config {
                option: "num_processes",
                ..
            })
        ));
    }

    #[test]
    fn test_pos_filter_needs_lexicon() {
        let job = gen_job(NgramConfig {
            pos_filter: Some(["NOUN".to_string()].into_iter().collect()),
            ..Default::default()
        });
        assert!(matches!(
            job.run(),
            Err(Error::Config {
                option: "pos_filter",
                ..
            })
        ));
    }

    #[test]
    fn test_index_filter_rejected() {
        let job = gen_job(NgramConfig {
            index_filter: Some(vec![vec![0]]),
            ..Default::default()
        });
        assert!(matches!(
            job.run(),
            Err(Error::Config {
                option: "index_filter",
                ..
            })
        ));
    }

    #[test]
    fn test_same_input_output() {
        let mut job = gen_job(NgramConfig::default());
        job.output_table = Some("reviews".to_string());
        assert!(matches!(
            job.run(),
            Err(Error::Config {
                option: "output_table",
                ..
            })
        ));
    }
}
