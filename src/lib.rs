/*! # ngram-pipeline

Fixed-width token window (ngram) extraction, and the batch pipeline running it.

- [ngrams] builds windows from tokenized documents,
- [pipelines] streams batches through transforms, annotation, parallel extraction and saving,
- [io] reads and writes SQLite tables.
!*/
pub mod annotation;
pub mod batch;
pub mod config;
pub mod error;
pub mod filtering;
pub mod io;
pub mod ngrams;
pub mod pipelines;
pub mod processing;
pub mod runlog;
pub mod transformers;
