//! Batch feature-extraction pipeline.
//!
//! For each batch pulled from the primary source:
//! 1. One batch is pulled from each auxiliary source and joined onto it by row identifier.
//! 1. Pre-extraction transforms are applied, in order, on the text column.
//! 1. If enabled, the text column is annotated into a document column (`<text_column>_docs`).
//! 1. The batch is split into sub-batches,
//!    and the extraction runs on each of them in a worker pool.
//!    Results are gathered in submission order, concatenated and reindexed.
//! 1. Post-extraction transforms are applied, in order, on the feature column.
//! 1. The result is saved.
//!
//! Any failure stops the run. The failing stage and function are logged,
//! and the batch is not saved.
//! The run log is only written once the primary source is exhausted.
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info};
use rayon::prelude::*;
use serde::Serialize;

use super::{Extract, Save};
use crate::annotation::Annotate;
use crate::batch::{Batch, Value};
use crate::error::{Error, Stage};
use crate::processing::split;
use crate::runlog::{Functions, RunLog};
use crate::transformers::ColumnTransform;

/// Stream of batches.
pub type BatchSource<'a> = Box<dyn Iterator<Item = Result<Batch, Error>> + 'a>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSettings {
    /// Column pre-extraction transforms (and annotation) work on.
    pub text_column: String,
    /// Column post-extraction transforms work on.
    pub feature_column: String,
    pub batch_size: Option<NonZeroUsize>,
    pub num_processes: usize,
    pub use_annotation: bool,
}

impl PipelineSettings {
    pub fn new(text_column: impl Into<String>) -> Self {
        Self {
            text_column: text_column.into(),
            feature_column: crate::ngrams::NGRAM_COLUMN.to_string(),
            batch_size: None,
            num_processes: 1,
            use_annotation: false,
        }
    }

    /// Name of the column annotated documents are stored in.
    pub fn document_column(&self) -> String {
        format!("{}_docs", self.text_column)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: usize,
    pub input_rows: usize,
    pub output_rows: usize,
}

pub struct FeaturePipeline<'a> {
    settings: PipelineSettings,
    pre_extraction: Vec<Box<dyn ColumnTransform + 'a>>,
    extraction: Box<dyn Extract + 'a>,
    post_extraction: Vec<Box<dyn ColumnTransform + 'a>>,
    save: Box<dyn Save + 'a>,
    annotator: Option<Arc<dyn Annotate + 'a>>,
    run_log: Option<RunLog>,
}

fn apply_transform(
    batch: &mut Batch,
    column: &str,
    transform: &dyn ColumnTransform,
    stage: Stage,
) -> Result<(), Error> {
    batch
        .map_column(column, |c| transform.apply(c))
        .map_err(|e| {
            error!(
                "{} function {} failed with an unexpected error: {}",
                stage,
                transform.name(),
                e
            );
            e.in_stage(stage, transform.name())
        })
}

impl<'a> FeaturePipeline<'a> {
    pub fn new(
        settings: PipelineSettings,
        extraction: Box<dyn Extract + 'a>,
        save: Box<dyn Save + 'a>,
    ) -> Self {
        Self {
            settings,
            pre_extraction: Vec::new(),
            extraction,
            post_extraction: Vec::new(),
            save,
            annotator: None,
            run_log: None,
        }
    }

    pub fn add_pre_extraction(&mut self, transform: Box<dyn ColumnTransform + 'a>) -> &mut Self {
        self.pre_extraction.push(transform);
        self
    }

    pub fn add_post_extraction(&mut self, transform: Box<dyn ColumnTransform + 'a>) -> &mut Self {
        self.post_extraction.push(transform);
        self
    }

    pub fn with_annotator(&mut self, annotator: Arc<dyn Annotate + 'a>) -> &mut Self {
        self.annotator = Some(annotator);
        self
    }

    pub fn with_run_log(&mut self, run_log: RunLog) -> &mut Self {
        self.run_log = Some(run_log);
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Names of every function of the pipeline.
    pub fn functions(&self) -> Functions {
        Functions {
            annotator: self.annotator.as_ref().map(|a| a.name().to_string()),
            pre_extraction: self
                .pre_extraction
                .iter()
                .map(|t| t.name().to_string())
                .collect(),
            feature_extraction: self.extraction.name().to_string(),
            post_extraction: self
                .post_extraction
                .iter()
                .map(|t| t.name().to_string())
                .collect(),
            save: self.save.name().to_string(),
        }
    }

    fn annotate(&self, annotator: &dyn Annotate, mut batch: Batch) -> Result<Batch, Error> {
        let text_column = &self.settings.text_column;
        let column = batch.column(text_column)?;
        let texts = column
            .iter()
            .map(|v| match v {
                Value::Text(s) => Ok(s.as_str()),
                Value::Null => Ok(""),
                other => Err(Error::ColumnType {
                    column: text_column.clone(),
                    expected: "text",
                    got: other.type_name(),
                }),
            })
            .collect::<Result<Vec<&str>, Error>>()?;

        let docs = annotator.annotate(&texts)?;
        batch.set_column(
            self.settings.document_column(),
            docs.into_iter().map(Value::Doc).collect(),
        )?;
        Ok(batch)
    }

    /// Run every step but saving on a single batch.
    fn process(&self, pool: &rayon::ThreadPool, mut batch: Batch) -> Result<Batch, Error> {
        info!(
            "Processing batch with shape: ({}, {})",
            batch.len(),
            batch.width()
        );

        for transform in &self.pre_extraction {
            apply_transform(
                &mut batch,
                &self.settings.text_column,
                transform.as_ref(),
                Stage::PreExtraction,
            )?;
        }

        if self.settings.use_annotation {
            if let Some(annotator) = &self.annotator {
                batch = self.annotate(annotator.as_ref(), batch).map_err(|e| {
                    error!(
                        "Annotator {} failed with an unexpected error: {}",
                        annotator.name(),
                        e
                    );
                    e.in_stage(Stage::Annotation, annotator.name())
                })?;
            }
        }

        let parts = split(batch, self.settings.batch_size);
        debug!("dispatching {} sub-batches", parts.len());

        let extraction = self.extraction.as_ref();
        let results: Result<Vec<Batch>, Error> = pool.install(|| {
            parts
                .into_par_iter()
                .map(|part| extraction.extract(part))
                .collect()
        });
        let results = results.map_err(|e| {
            error!(
                "Feature extraction function {} failed with an unexpected error: {}",
                extraction.name(),
                e
            );
            e.in_stage(Stage::Extraction, extraction.name())
        })?;

        let mut batch = Batch::concat(results);
        batch.reindex();

        for transform in &self.post_extraction {
            apply_transform(
                &mut batch,
                &self.settings.feature_column,
                transform.as_ref(),
                Stage::PostExtraction,
            )?;
        }

        Ok(batch)
    }

    /// Run the pipeline until `primary` is exhausted.
    ///
    /// Each auxiliary source must yield at least as many batches as `primary`.
    pub fn start<P>(
        mut self,
        primary: P,
        mut auxiliaries: Vec<BatchSource<'a>>,
    ) -> Result<RunSummary, Error>
    where
        P: IntoIterator<Item = Result<Batch, Error>>,
    {
        if self.settings.num_processes == 0 {
            return Err(Error::config("num_processes", "must be at least 1"));
        }
        if self.settings.use_annotation && self.annotator.is_none() {
            return Err(Error::config(
                "use_annotation",
                "annotation is enabled but no annotator was provided",
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.num_processes)
            .build()?;

        let functions = self.functions();
        let settings = serde_json::to_value(&self.settings)?;
        if let Some(run_log) = &mut self.run_log {
            if let serde_json::Value::Object(settings) = settings {
                run_log.extend_settings(settings);
            }
            run_log.set_functions(functions);
        }

        let mut summary = RunSummary::default();
        for (step, batch) in primary.into_iter().enumerate() {
            let clock = Instant::now();
            let mut batch = batch?;

            for (source, auxiliary) in auxiliaries.iter_mut().enumerate() {
                let other = auxiliary
                    .next()
                    .ok_or(Error::SourceExhausted { source, step })??;
                let missing = batch.missing_in(&other);
                if !missing.is_empty() {
                    debug!(
                        "auxiliary source {} lacks {} rows of step {}, dropping them",
                        source,
                        missing.len(),
                        step
                    );
                }
                batch = batch.join_inner(&other)?;
            }

            let input_rows = batch.len();
            let processed = self.process(&pool, batch)?;
            let output_rows = processed.len();

            if let Err(e) = self.save.save(processed) {
                let name = self.save.name().to_string();
                error!("Save function {} failed with an unexpected error: {}", name, e);
                return Err(e.in_stage(Stage::Save, &name));
            }

            info!("Pipeline step {} complete.", step);
            if let Some(run_log) = &mut self.run_log {
                run_log.step_complete(step, input_rows, output_rows, clock.elapsed().as_secs_f64());
            }

            summary.batches += 1;
            summary.input_rows += input_rows;
            summary.output_rows += output_rows;
        }

        info!("Pipeline complete.");
        if let Some(run_log) = self.run_log.take() {
            run_log.flush()?;
        }

        Ok(summary)
    }
}
