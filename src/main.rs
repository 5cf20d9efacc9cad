//! # ngram-pipeline
//!
//! Extracts fixed-width token windows (ngrams) centered on each token of a corpus
//! stored in a SQLite table, and writes them to a new table.
//!
//! ## Getting started
//!
//! ```sh
//! ngram-pipeline 0.1.0
//! ngram window extraction tool.
//!
//! USAGE:
//!     ngram-pipeline <SUBCOMMAND>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! SUBCOMMANDS:
//!     help    Prints this message or the help of the given subcommand(s)
//!     run     Extract ngram windows from a SQLite table
//! ```
//!
//! Set `RUST_LOG=info` to follow progress.
use ngram_pipeline::error::Error;
use ngram_pipeline::pipelines::Pipeline;
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::NgramPipeline::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::NgramPipeline::Run(r) => {
            let job = r.into_job()?;
            let summary = job.run()?;
            info!(
                "done: {} batches, {} rows in, {} windows out",
                summary.batches, summary.input_rows, summary.output_rows
            );
        }
    };

    Ok(())
}
