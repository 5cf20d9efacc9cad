//! Tokenized documents.
//!
//! The window generator only needs positional access to token texts and tags,
//! so it is written against [TokenSequence] rather than a concrete type.
//! [Doc] is the owned representation produced by annotators and stored in batches.
use serde::{Deserialize, Serialize};

/// Positional access to a tokenized document.
pub trait TokenSequence {
    fn len(&self) -> usize;
    fn token_text(&self, i: usize) -> &str;
    fn token_tag(&self, i: usize) -> Option<&str>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    text: String,
    tag: Option<String>,
}

impl Token {
    pub fn new(text: String, tag: Option<String>) -> Self {
        Self { text, tag }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Part-of-speech tag, if the annotator assigned one.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// An annotated document: an ordered, immutable sequence of [Token].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doc {
    tokens: Vec<Token>,
}

impl Doc {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Build an untagged document from token texts.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: words
                .into_iter()
                .map(|w| Token::new(w.into(), None))
                .collect(),
        }
    }

    /// Build a tagged document from `(text, tag)` pairs.
    pub fn from_tagged<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            tokens: pairs
                .into_iter()
                .map(|(w, t)| Token::new(w.into(), Some(t.into())))
                .collect(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tags of every token, in order.
    pub fn tags(&self) -> impl Iterator<Item = Option<&str>> {
        self.tokens.iter().map(Token::tag)
    }
}

impl TokenSequence for Doc {
    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn token_text(&self, i: usize) -> &str {
        self.tokens[i].text()
    }

    fn token_tag(&self, i: usize) -> Option<&str> {
        self.tokens[i].tag()
    }
}

/// Plain word lists are untagged documents.
impl<S: AsRef<str>> TokenSequence for [S] {
    fn len(&self) -> usize {
        <[S]>::len(self)
    }

    fn token_text(&self, i: usize) -> &str {
        self[i].as_ref()
    }

    fn token_tag(&self, _i: usize) -> Option<&str> {
        None
    }
}
