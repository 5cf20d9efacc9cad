/*! ngram (window) generation

- [window] builds windows for a single document,
- [corpus] runs window generation over a whole batch of documents, optionally filtering centers
  by part-of-speech or by explicit indices, and joining source metadata onto the results.
!*/
pub mod corpus;
pub mod window;

pub use corpus::{
    extract_corpus_windows, CorpusNgrams, IncludeMetadata, Selection, WindowOptions, NGRAM_COLUMN,
    SENT_ID_COLUMN,
};
pub use window::{window_at, windows, Windows};
