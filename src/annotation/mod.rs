/*! Tokenization and tagging

Documents are consumed through [TokenSequence], and produced by any [Annotate] implementation.
!*/
mod annotator;
mod document;

pub use annotator::{Annotate, AnnotatorSettings, Lexicon, WordAnnotator};
pub use document::{Doc, Token, TokenSequence};
