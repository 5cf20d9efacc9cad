//! Pipeline configuration.
//!
//! [NgramConfig] lists every recognized option along with its default value.
//! It can be read from a JSON file, where missing fields take their default value:
//!
//! ```json
//! {
//!     "half_width": 3,
//!     "batch_size": 500,
//!     "num_processes": 4,
//!     "use_annotation": true,
//!     "pos_filter": ["NOUN", "VERB"],
//!     "include_metadata": ["article_id"],
//!     "log_path": "logs.json"
//! }
//! ```
use std::collections::{BTreeSet, HashSet};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::annotation::AnnotatorSettings;
use crate::error::Error;
use crate::filtering::PosFilter;
use crate::ngrams::{IncludeMetadata, Selection, WindowOptions};

lazy_static! {
    /// Universal Dependencies part-of-speech tags.
    pub static ref UPOS_TAGS: HashSet<&'static str> = [
        "ADJ", "ADP", "ADV", "AUX", "CCONJ", "DET", "INTJ", "NOUN", "NUM", "PART", "PRON",
        "PROPN", "PUNCT", "SCONJ", "SYM", "VERB", "X",
    ]
    .into_iter()
    .collect();
}

/// Largest accepted `half_width`.
pub const MAX_HALF_WIDTH: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NgramConfig {
    /// Number of tokens on each side of the window center.
    pub half_width: usize,
    pub pad_token: String,
    /// Sub-batch size for parallel dispatch. `None` disables splitting.
    pub batch_size: Option<usize>,
    /// Worker pool size.
    pub num_processes: usize,
    pub use_annotation: bool,
    pub pos_filter: Option<BTreeSet<String>>,
    pub index_filter: Option<Vec<Vec<usize>>>,
    pub include_metadata: IncludeMetadata,
    pub log_path: Option<PathBuf>,
    pub run_name: Option<String>,
    pub annotator: AnnotatorSettings,
}

impl Default for NgramConfig {
    fn default() -> Self {
        Self {
            half_width: 2,
            pad_token: "inv".to_string(),
            batch_size: None,
            num_processes: 1,
            use_annotation: false,
            pos_filter: None,
            index_filter: None,
            include_metadata: IncludeMetadata::None,
            log_path: None,
            run_name: None,
            annotator: AnnotatorSettings::default(),
        }
    }
}

/// Check that every tag of `tags` is a UPOS tag.
pub fn validate_pos_tags<'a, I>(tags: I) -> Result<(), Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let invalid: BTreeSet<&str> = tags
        .into_iter()
        .filter(|t| !UPOS_TAGS.contains(*t))
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(Error::config(
            "pos_filter",
            format!("invalid part-of-speech provided: {:?}", invalid),
        ))
    }
}

impl NgramConfig {
    /// Read and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let f = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(f))?;
        debug!("loaded configuration from {:?}: {:?}", path, config);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.half_width > MAX_HALF_WIDTH {
            return Err(Error::config(
                "half_width",
                format!("must be at most {}", MAX_HALF_WIDTH),
            ));
        }
        if self.batch_size == Some(0) {
            return Err(Error::config("batch_size", "must be at least 1"));
        }
        if self.num_processes == 0 {
            return Err(Error::config("num_processes", "must be at least 1"));
        }
        if self.pad_token.is_empty() || self.pad_token.chars().any(char::is_whitespace) {
            return Err(Error::config(
                "pad_token",
                "must be a non-empty string without whitespace",
            ));
        }
        if self.pos_filter.is_some() && self.index_filter.is_some() {
            return Err(Error::config(
                "pos_filter",
                "cannot be combined with index_filter",
            ));
        }
        if let Some(tags) = &self.pos_filter {
            validate_pos_tags(tags.iter().map(String::as_str))?;
        }
        Ok(())
    }

    pub fn batch_size(&self) -> Option<NonZeroUsize> {
        self.batch_size.and_then(NonZeroUsize::new)
    }

    pub fn window(&self) -> WindowOptions {
        WindowOptions {
            half_width: self.half_width,
            pad_token: self.pad_token.clone(),
        }
    }

    pub fn selection(&self) -> Selection {
        match (&self.pos_filter, &self.index_filter) {
            (Some(tags), _) => Selection::Pos(PosFilter::new(tags.iter().cloned())),
            (None, Some(indices)) => Selection::Indices(indices.clone()),
            (None, None) => Selection::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = NgramConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.window(), WindowOptions::default());
        assert_eq!(c.selection(), Selection::All);
        assert_eq!(c.batch_size(), None);

        let from_empty: NgramConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(from_empty, c);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(
            &path,
            r#"{"half_width": 3, "batch_size": 10, "pos_filter": ["NOUN", "ADJ"], "include_metadata": true}"#,
        )
        .unwrap();

        let c = NgramConfig::from_path(&path).unwrap();
        assert_eq!(c.half_width, 3);
        assert_eq!(c.batch_size(), NonZeroUsize::new(10));
        assert_eq!(c.include_metadata, IncludeMetadata::All);
        assert_eq!(c.selection(), Selection::Pos(PosFilter::new(["ADJ", "NOUN"])));
    }

    #[test]
    fn test_invalid_values() {
        let cases: Vec<(NgramConfig, &str)> = vec![
            (
                NgramConfig {
                    half_width: usize::MAX,
                    ..Default::default()
                },
                "half_width",
            ),
            (
                NgramConfig {
                    batch_size: Some(0),
                    ..Default::default()
                },
                "batch_size",
            ),
            (
                NgramConfig {
                    num_processes: 0,
                    ..Default::default()
                },
                "num_processes",
            ),
            (
                NgramConfig {
                    pad_token: "a b".to_string(),
                    ..Default::default()
                },
                "pad_token",
            ),
            (
                NgramConfig {
                    pos_filter: Some(["NOUN".to_string()].into_iter().collect()),
                    index_filter: Some(vec![vec![0]]),
                    ..Default::default()
                },
                "pos_filter",
            ),
            (
                NgramConfig {
                    pos_filter: Some(
                        ["NOUN".to_string(), "NOUNS".to_string()]
                            .into_iter()
                            .collect(),
                    ),
                    ..Default::default()
                },
                "pos_filter",
            ),
        ];

        let widest = NgramConfig {
            half_width: MAX_HALF_WIDTH,
            ..Default::default()
        };
        assert!(widest.validate().is_ok());

        for (config, expected) in cases {
            match config.validate() {
                Err(Error::Config { option, .. }) => assert_eq!(option, expected),
                other => panic!("expected a config error on {}, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_include_metadata_type() {
        let err = serde_json::from_str::<NgramConfig>(r#"{"include_metadata": "article_id"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("include_metadata"));
    }

    #[test]
    fn test_unknown_field() {
        assert!(serde_json::from_str::<NgramConfig>(r#"{"window": 2}"#).is_err());
    }

    #[test]
    fn test_validate_pos_tags() {
        assert!(validate_pos_tags(["NOUN", "VERB", "PROPN"]).is_ok());
        // any UPOS tag, not only content words
        assert!(validate_pos_tags(["DET", "NUM"]).is_ok());
        assert!(validate_pos_tags(["noun"]).is_err());
    }
}
