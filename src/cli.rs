//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use ngram_pipeline::config::NgramConfig;
use ngram_pipeline::error::Error;
use ngram_pipeline::ngrams::IncludeMetadata;
use ngram_pipeline::pipelines::NgramJob;
use ngram_pipeline::transformers::TextStep;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "ngram-pipeline", about = "ngram window extraction tool.")]
/// Holds every command that is callable by the `ngram-pipeline` command.
pub enum NgramPipeline {
    #[structopt(about = "Extract ngram windows from a SQLite table")]
    Run(Run),
}

#[derive(Debug, StructOpt)]
/// Run command and parameters.
///
/// Options given here override the ones of the configuration file.
///
/// ```sh
/// ngram-pipeline run corpus.db reviews --text-column body -n 3 --pos-filter NOUN,ADJ -p 4 --batch-size 500
/// ```
pub struct Run {
    #[structopt(parse(from_os_str), help = "SQLite database location")]
    pub database: PathBuf,
    #[structopt(help = "input table")]
    pub table: String,
    #[structopt(
        long = "text-column",
        default_value = "text",
        help = "column to extract windows from"
    )]
    pub text_column: String,
    #[structopt(
        long = "index-column",
        default_value = "index",
        help = "integer row identifier column"
    )]
    pub index_column: String,
    #[structopt(
        long = "chunk-size",
        default_value = "1000",
        help = "number of rows read per batch"
    )]
    pub chunk_size: usize,
    #[structopt(parse(from_os_str), long = "config", help = "JSON configuration file")]
    pub config: Option<PathBuf>,
    #[structopt(
        short = "n",
        long = "half-width",
        help = "number of tokens on each side of the center. Default is 2."
    )]
    pub half_width: Option<usize>,
    #[structopt(long = "pad-token", help = "padding token. Default is \"inv\".")]
    pub pad_token: Option<String>,
    #[structopt(long = "batch-size", help = "sub-batch size for parallel extraction")]
    pub batch_size: Option<usize>,
    #[structopt(
        short = "p",
        long = "processes",
        help = "number of worker threads. Default is 1."
    )]
    pub processes: Option<usize>,
    #[structopt(
        long = "pos-filter",
        use_delimiter = true,
        help = "UPOS tags allowed as window centers (comma separated)"
    )]
    pub pos_filter: Vec<String>,
    #[structopt(
        long = "metadata",
        use_delimiter = true,
        help = "source columns to copy onto each window (comma separated)"
    )]
    pub metadata: Vec<String>,
    #[structopt(long = "all-metadata", help = "copy every source column onto each window")]
    pub all_metadata: bool,
    #[structopt(
        parse(from_os_str),
        long = "lexicon",
        help = "word,tag lexicon (.csv or .tsv)"
    )]
    pub lexicon: Option<PathBuf>,
    #[structopt(
        long = "steps",
        use_delimiter = true,
        help = "text normalization steps (comma separated). Default is remove_punctuation,lowercase,normalize_spacing"
    )]
    pub steps: Vec<TextStep>,
    #[structopt(
        long = "output-table",
        help = "output table. Default is <table>_n=<half-width>"
    )]
    pub output_table: Option<String>,
    #[structopt(
        parse(from_os_str),
        long = "log-path",
        help = "JSON run log location"
    )]
    pub log_path: Option<PathBuf>,
    #[structopt(
        long = "run-name",
        help = "run log entry name. Default is the output table"
    )]
    pub run_name: Option<String>,
}

impl Run {
    /// Build the job, layering command line options over the configuration file.
    pub fn into_job(self) -> Result<NgramJob, Error> {
        let mut config = match &self.config {
            Some(path) => NgramConfig::from_path(path)?,
            None => NgramConfig::default(),
        };

        if let Some(half_width) = self.half_width {
            config.half_width = half_width;
        }
        if let Some(pad_token) = self.pad_token {
            config.pad_token = pad_token;
        }
        if self.batch_size.is_some() {
            config.batch_size = self.batch_size;
        }
        if let Some(processes) = self.processes {
            config.num_processes = processes;
        }
        if !self.pos_filter.is_empty() {
            config.pos_filter = Some(self.pos_filter.into_iter().collect());
        }
        if self.all_metadata {
            config.include_metadata = IncludeMetadata::All;
        } else if !self.metadata.is_empty() {
            config.include_metadata = IncludeMetadata::Columns(self.metadata);
        }
        if self.log_path.is_some() {
            config.log_path = self.log_path;
        }
        if self.run_name.is_some() {
            config.run_name = self.run_name;
        }

        let mut job = NgramJob::new(self.database, self.table, self.text_column, config)?;
        job.index_column = self.index_column;
        job.chunk_size = self.chunk_size;
        job.lexicon = self.lexicon;
        job.output_table = self.output_table;
        if !self.steps.is_empty() {
            job.steps = self.steps;
        }
        Ok(job)
    }
}
