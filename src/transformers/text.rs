//! Text normalization.
//!
//! Each transform maps the text values of a column, keeping nulls as is.
//! Any other value type is an error.
use std::collections::HashSet;
use std::str::FromStr;

use itertools::Itertools;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::ColumnTransform;
use crate::batch::{Column, Value};
use crate::error::Error;

lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
        "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
        "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
        "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
        "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself",
        "me", "more", "most", "my", "myself", "no", "nor", "not", "of", "off", "on", "once",
        "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
        "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
        "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
        "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
        "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
        "yourself", "yourselves",
    ]
    .into_iter()
    .collect();
}

fn map_text<F>(name: &str, column: Column, f: F) -> Result<Column, Error>
where
    F: Fn(&str) -> String,
{
    column
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Value::Text(s) => Ok(Value::Text(f(&s))),
            Value::Null => Ok(Value::Null),
            other => Err(Error::Custom(format!(
                "{} expects text values, got a {} value at row {}",
                name,
                other.type_name(),
                row
            ))),
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Lowercase;

impl ColumnTransform for Lowercase {
    fn name(&self) -> &str {
        "lowercase"
    }

    fn apply(&self, column: Column) -> Result<Column, Error> {
        map_text(self.name(), column, str::to_lowercase)
    }
}

/// Removes ASCII punctuation characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct RemovePunctuation;

impl ColumnTransform for RemovePunctuation {
    fn name(&self) -> &str {
        "remove_punctuation"
    }

    fn apply(&self, column: Column) -> Result<Column, Error> {
        map_text(self.name(), column, |s| {
            s.chars().filter(|c| !c.is_ascii_punctuation()).collect()
        })
    }
}

/// Collapses whitespace runs into single spaces and trims.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizeSpacing;

impl ColumnTransform for NormalizeSpacing {
    fn name(&self) -> &str {
        "normalize_spacing"
    }

    fn apply(&self, column: Column) -> Result<Column, Error> {
        map_text(self.name(), column, |s| s.split_whitespace().join(" "))
    }
}

/// Drops whitespace-separated words that are (case-sensitive) English stopwords.
#[derive(Debug, Default, Clone, Copy)]
pub struct RemoveStopwords;

impl ColumnTransform for RemoveStopwords {
    fn name(&self) -> &str {
        "remove_stopwords"
    }

    fn apply(&self, column: Column) -> Result<Column, Error> {
        map_text(self.name(), column, |s| {
            s.split_whitespace()
                .filter(|w| !STOPWORDS.contains(*w))
                .join(" ")
        })
    }
}

/// Built-in text transforms, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStep {
    Lowercase,
    RemovePunctuation,
    NormalizeSpacing,
    RemoveStopwords,
}

impl TextStep {
    pub fn transform(self) -> Box<dyn ColumnTransform> {
        match self {
            TextStep::Lowercase => Box::new(Lowercase),
            TextStep::RemovePunctuation => Box::new(RemovePunctuation),
            TextStep::NormalizeSpacing => Box::new(NormalizeSpacing),
            TextStep::RemoveStopwords => Box::new(RemoveStopwords),
        }
    }

    /// Default normalization: punctuation, case, then spacing.
    pub fn defaults() -> Vec<TextStep> {
        vec![
            TextStep::RemovePunctuation,
            TextStep::Lowercase,
            TextStep::NormalizeSpacing,
        ]
    }
}

impl FromStr for TextStep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lowercase" => Ok(TextStep::Lowercase),
            "remove_punctuation" => Ok(TextStep::RemovePunctuation),
            "normalize_spacing" => Ok(TextStep::NormalizeSpacing),
            "remove_stopwords" => Ok(TextStep::RemoveStopwords),
            other => Err(Error::config(
                "steps",
                format!("unknown text step `{}`", other),
            )),
        }
    }
}
